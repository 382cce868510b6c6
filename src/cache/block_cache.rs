//! 有界 LRU 条目存储（基于 lru crate）
//!
//! # 结构
//!
//! ```text
//! struct BlockCache {
//!     cache: LruCache<SectorRange, CacheEntry>,  // O(1)，自动LRU
//!     evictions: u64,                            // 驱逐计数
//! }
//! ```
//!
//! - `peek` 查找但不改变访问顺序
//! - `promote` 把条目移到最近使用端
//! - `push` 插入新条目，满时自动驱逐最久未使用的条目并返回它
//! - `iter` 从最近使用到最久未使用遍历
//!
//! 条目只会被整个驱逐，从不拆分或合并。

use super::entry::CacheEntry;
use crate::types::SectorRange;
use alloc::vec::Vec;
use core::num::NonZeroUsize;
use lru::LruCache;

/// 有界 LRU 块缓存
///
/// 按扇区范围索引条目，条目数超过容量时驱逐最久未使用的一个。
pub struct BlockCache {
    /// LRU缓存核心：范围 -> 条目，自动管理访问顺序
    cache: LruCache<SectorRange, CacheEntry>,

    /// 累计驱逐次数
    evictions: u64,
}

impl BlockCache {
    /// 创建新的块缓存
    ///
    /// # 参数
    ///
    /// * `capacity` - 最大条目数
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: LruCache::new(capacity),
            evictions: 0,
        }
    }

    /// 查找条目（不更新 LRU 顺序）
    pub fn lookup(&self, range: &SectorRange) -> Option<&CacheEntry> {
        self.cache.peek(range)
    }

    /// 按最近使用到最久未使用的顺序遍历所有条目
    pub fn iter_recent(&self) -> impl Iterator<Item = (SectorRange, &CacheEntry)> + '_ {
        self.cache.iter().map(|(range, entry)| (*range, entry))
    }

    /// 按最近使用顺序列出所有范围
    pub fn ranges_recent(&self) -> Vec<SectorRange> {
        self.cache.iter().map(|(range, _)| *range).collect()
    }

    /// 插入新条目并标记为最近使用
    ///
    /// 相同范围的旧条目会被替换。超出容量时驱逐最久未使用的条目。
    ///
    /// # 返回
    ///
    /// 被驱逐的范围（如果有）
    pub fn insert(&mut self, range: SectorRange, data: Vec<u8>) -> Option<SectorRange> {
        // push 在键已存在时返回被替换的旧值，在缓存满时返回被驱逐的 LRU 条目
        match self.cache.push(range, CacheEntry::new(range, data)) {
            Some((old, _)) if old == range => {
                log::debug!("[SCACHE] replaced entry {:?}", range);
                None
            }
            Some((evicted, _)) => {
                self.evictions += 1;
                log::debug!(
                    "[SCACHE] evicted {:?}, cache={}/{}",
                    evicted,
                    self.cache.len(),
                    self.cache.cap()
                );
                Some(evicted)
            }
            None => None,
        }
    }

    /// 将已存在的条目标记为最近使用
    ///
    /// # 返回
    ///
    /// 条目存在返回 true
    pub fn touch(&mut self, range: &SectorRange) -> bool {
        if !self.cache.contains(range) {
            return false;
        }
        self.cache.promote(range);
        log::trace!("[SCACHE] touch {:?}", range);
        true
    }

    /// 是否缓存了该范围
    pub fn contains(&self, range: &SectorRange) -> bool {
        self.cache.contains(range)
    }

    /// 获取缓存容量
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    /// 获取当前条目数量
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// 检查缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// 累计驱逐次数
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// 清空缓存
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl core::fmt::Debug for BlockCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockCache")
            .field("capacity", &self.cache.cap())
            .field("len", &self.cache.len())
            .field("evictions", &self.evictions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> BlockCache {
        BlockCache::new(NonZeroUsize::new(capacity).unwrap())
    }

    fn range(first: u64) -> SectorRange {
        SectorRange::from_start_count(first, 4)
    }

    fn fill(first: u64) -> Vec<u8> {
        alloc::vec![first as u8; 4 * 16]
    }

    #[test]
    fn test_cache_creation() {
        let cache = cache(8);
        assert_eq!(cache.capacity(), 8);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.evictions(), 0);
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut cache = cache(8);

        assert_eq!(cache.insert(range(0), fill(0)), None);
        assert_eq!(cache.len(), 1);

        let entry = cache.lookup(&range(0)).unwrap();
        assert_eq!(entry.range(), range(0));
        assert_eq!(entry.data(), &fill(0)[..]);
        assert!(cache.lookup(&range(4)).is_none());
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = cache(4);

        // 填满缓存
        for i in 0..4 {
            cache.insert(range(i * 4), fill(i * 4));
        }
        assert_eq!(cache.len(), 4);

        // 访问第一个条目，使其成为MRU
        assert!(cache.touch(&range(0)));

        // 插入新条目，应该驱逐 range(4)（最早插入且未再访问）
        let evicted = cache.insert(range(40), fill(40));
        assert_eq!(evicted, Some(range(4)));
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.evictions(), 1);

        assert!(cache.contains(&range(0)));
        assert!(!cache.contains(&range(4)));
        assert!(cache.contains(&range(40)));
    }

    #[test]
    fn test_recency_order() {
        let mut cache = cache(8);
        cache.insert(range(0), fill(0));
        cache.insert(range(4), fill(4));
        cache.insert(range(8), fill(8));
        cache.touch(&range(0));

        assert_eq!(cache.ranges_recent(), alloc::vec![range(0), range(8), range(4)]);

        let scanned: Vec<SectorRange> = cache.iter_recent().map(|(r, _)| r).collect();
        assert_eq!(scanned, cache.ranges_recent());
    }

    #[test]
    fn test_lookup_does_not_touch() {
        let mut cache = cache(2);
        cache.insert(range(0), fill(0));
        cache.insert(range(4), fill(4));

        assert!(cache.lookup(&range(0)).is_some());
        assert_eq!(cache.insert(range(8), fill(8)), Some(range(0)));
    }

    #[test]
    fn test_touch_missing() {
        let mut cache = cache(2);
        assert!(!cache.touch(&range(0)));
    }

    #[test]
    fn test_replace_same_range() {
        let mut cache = cache(2);
        cache.insert(range(0), fill(0));
        cache.insert(range(4), fill(4));

        // 缓存已满，替换同一范围不算驱逐
        assert_eq!(cache.insert(range(0), fill(1)), None);
        assert_eq!(cache.evictions(), 0);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.ranges_recent(), alloc::vec![range(0), range(4)]);
        assert_eq!(cache.lookup(&range(0)).unwrap().data(), &fill(1)[..]);
    }

    #[test]
    fn test_clear() {
        let mut cache = cache(4);
        cache.insert(range(0), fill(0));
        cache.insert(range(4), fill(4));
        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.ranges_recent().is_empty());
    }
}
