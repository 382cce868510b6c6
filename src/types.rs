//! 数据结构定义
//!
//! - [`SectorRange`] - 闭区间扇区范围，缓存条目的键
//! - [`DeviceGeometry`] - 下游设备几何信息（扇区大小、总字节数）

use core::fmt;

/// 闭区间扇区范围 `[first, last]`
///
/// 对应字节范围 `[first * block_size, (last + 1) * block_size)`。
/// 可哈希，直接作为 `LruCache` 的键；排序先按 `first` 再按 `last`。
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectorRange {
    /// 第一个扇区
    pub first: u64,
    /// 最后一个扇区（包含）
    pub last: u64,
}

impl SectorRange {
    /// 创建范围，要求 `first <= last`
    pub const fn new(first: u64, last: u64) -> Self {
        debug_assert!(first <= last);
        Self { first, last }
    }

    /// 由起始扇区和扇区数创建范围（`count` 必须大于 0）
    pub const fn from_start_count(start: u64, count: u64) -> Self {
        debug_assert!(count > 0);
        Self::new(start, start + count - 1)
    }

    /// 扇区数
    pub const fn sector_count(&self) -> u64 {
        self.last - self.first + 1
    }

    /// 是否包含某个扇区
    pub const fn contains_sector(&self, sector: u64) -> bool {
        self.first <= sector && sector <= self.last
    }

    /// 是否完整覆盖另一个范围
    pub const fn covers(&self, other: &SectorRange) -> bool {
        self.first <= other.first && other.last <= self.last
    }

    /// 起始字节偏移
    pub const fn byte_offset(&self, block_size: u32) -> u64 {
        self.first * block_size as u64
    }

    /// 字节长度
    pub const fn byte_len(&self, block_size: u32) -> u64 {
        self.sector_count() * block_size as u64
    }
}

impl fmt::Debug for SectorRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.first, self.last)
    }
}

/// 下游设备几何信息
///
/// `block_size` 在构造时读取一次；`total_size` 首次使用时才向设备查询，之后记住。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceGeometry {
    /// 每扇区字节数
    pub block_size: u32,
    /// 设备总字节数（尚未查询时为 None）
    pub total_size: Option<u64>,
}

impl DeviceGeometry {
    /// 创建几何信息，总大小待查询
    pub const fn new(block_size: u32) -> Self {
        Self {
            block_size,
            total_size: None,
        }
    }

    /// 字节偏移所在扇区
    pub const fn sector_of(&self, byte_offset: u64) -> u64 {
        byte_offset / self.block_size as u64
    }

    /// 字节偏移在扇区内的偏移
    pub const fn offset_in_sector(&self, byte_offset: u64) -> usize {
        (byte_offset % self.block_size as u64) as usize
    }
}
