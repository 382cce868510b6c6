//! 命中/未命中统计
//!
//! 计数器按请求的起始扇区（不是条目的起始扇区）分别累计，仅用于诊断。

use alloc::collections::BTreeMap;

/// 缓存统计信息快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// 字节读取请求次数
    pub reads: u64,
    /// 命中次数（含部分命中）
    pub hits: u64,
    /// 未命中次数
    pub misses: u64,
    /// 下游读取次数（实际设备操作）
    pub downstream_reads: u64,
    /// 下游读取的字节数
    pub downstream_bytes: u64,
    /// 当前条目数量
    pub entries: usize,
    /// 缓存容量
    pub capacity: usize,
    /// 累计驱逐次数
    pub evictions: u64,
}

impl CacheStats {
    /// 计算命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// 按起始扇区统计命中/未命中
#[derive(Debug, Clone, Default)]
pub struct StatsCollector {
    hits: BTreeMap<u64, u64>,
    misses: BTreeMap<u64, u64>,
}

impl StatsCollector {
    /// 创建空的计数器
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次命中
    pub fn record_hit(&mut self, sector: u64) {
        *self.hits.entry(sector).or_insert(0) += 1;
    }

    /// 记录一次未命中
    pub fn record_miss(&mut self, sector: u64) {
        *self.misses.entry(sector).or_insert(0) += 1;
    }

    /// 某起始扇区的命中次数
    pub fn hits(&self, sector: u64) -> u64 {
        self.hits.get(&sector).copied().unwrap_or(0)
    }

    /// 某起始扇区的未命中次数
    pub fn misses(&self, sector: u64) -> u64 {
        self.misses.get(&sector).copied().unwrap_or(0)
    }

    /// 命中总数
    pub fn total_hits(&self) -> u64 {
        self.hits.values().sum()
    }

    /// 未命中总数
    pub fn total_misses(&self) -> u64 {
        self.misses.values().sum()
    }

    /// 按扇区升序遍历命中计数
    pub fn iter_hits(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.hits.iter().map(|(s, c)| (*s, *c))
    }

    /// 按扇区升序遍历未命中计数
    pub fn iter_misses(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.misses.iter().map(|(s, c)| (*s, *c))
    }

    /// 清零
    pub fn clear(&mut self) {
        self.hits.clear();
        self.misses.clear();
    }
}

/// 诊断输出接口
///
/// 通过 [`crate::SectorCacheBuilder::stats_sink`] 注入；缓存关闭时调用一次 `flush`。
/// 未注入时缓存改为通过 `log` 输出汇总。
pub trait StatsSink {
    /// 输出统计信息
    fn flush(&mut self, summary: &CacheStats, counters: &StatsCollector);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_per_sector_counters() {
        let mut stats = StatsCollector::new();
        stats.record_miss(0);
        stats.record_hit(0);
        stats.record_hit(0);
        stats.record_hit(7);

        assert_eq!(stats.hits(0), 2);
        assert_eq!(stats.misses(0), 1);
        assert_eq!(stats.hits(7), 1);
        assert_eq!(stats.misses(7), 0);
        assert_eq!(stats.total_hits(), 3);
        assert_eq!(stats.total_misses(), 1);

        let hits: Vec<(u64, u64)> = stats.iter_hits().collect();
        assert_eq!(hits, alloc::vec![(0, 2), (7, 1)]);
    }

    #[test]
    fn test_clear() {
        let mut stats = StatsCollector::new();
        stats.record_hit(1);
        stats.record_miss(2);
        stats.clear();

        assert_eq!(stats.total_hits(), 0);
        assert_eq!(stats.total_misses(), 0);
    }

    #[test]
    fn test_hit_rate() {
        let mut summary = CacheStats::default();
        assert_eq!(summary.hit_rate(), 0.0);

        summary.hits = 1;
        summary.misses = 1;
        assert_eq!(summary.hit_rate(), 0.5);
    }
}
