//! 缓存条目
//!
//! 一个条目持有恰好一个扇区范围的下游数据，插入后只读。

use crate::types::SectorRange;
use alloc::boxed::Box;
use alloc::vec::Vec;

/// 缓存条目
///
/// # 字段说明
///
/// - `range`: 条目覆盖的扇区范围
/// - `data`: 该范围的全部字节，长度恒为 `range.sector_count() * block_size`
///
/// 访问顺序由 [`super::BlockCache`] 内部的 `LruCache` 维护，条目本身不记录。
pub struct CacheEntry {
    range: SectorRange,
    data: Box<[u8]>,
}

impl core::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("range", &self.range)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl CacheEntry {
    /// 创建条目，接管一次下游读取得到的完整缓冲区
    pub fn new(range: SectorRange, data: Vec<u8>) -> Self {
        Self {
            range,
            data: data.into_boxed_slice(),
        }
    }

    /// 条目覆盖的扇区范围
    pub fn range(&self) -> SectorRange {
        self.range
    }

    /// 条目全部数据
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 取出 `[first, last]` 这些扇区对应的字节
    ///
    /// 调用者保证子范围落在条目范围内。
    pub fn sectors(&self, sub: SectorRange, block_size: u32) -> &[u8] {
        debug_assert!(self.range.covers(&sub));
        let bs = block_size as usize;
        let start = (sub.first - self.range.first) as usize * bs;
        let end = start + sub.sector_count() as usize * bs;
        &self.data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(SectorRange::new(4, 7), alloc::vec![0u8; 4 * 512]);
        assert_eq!(entry.range(), SectorRange::new(4, 7));
        assert_eq!(entry.data().len(), 2048);
    }

    #[test]
    fn test_entry_sub_sectors() {
        let data: Vec<u8> = (0..4u8).flat_map(|s| core::iter::repeat(s).take(16)).collect();
        let entry = CacheEntry::new(SectorRange::new(8, 11), data);

        let mid = entry.sectors(SectorRange::new(9, 10), 16);
        assert_eq!(mid.len(), 32);
        assert!(mid[..16].iter().all(|&b| b == 1));
        assert!(mid[16..].iter().all(|&b| b == 2));

        assert_eq!(entry.sectors(SectorRange::new(8, 11), 16), entry.data());
    }
}
