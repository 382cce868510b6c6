//! 常量定义

/// 默认缓存条目数量上限
pub const DEFAULT_CAPACITY: usize = 100;

/// 默认对齐粒度（扇区数）
///
/// 每个缓存条目的起始扇区和长度都是它的整数倍。
pub const DEFAULT_MIN_ENTRY_SECTORS: u64 = 32;

/// 常见的扇区大小
pub const DEFAULT_SECTOR_SIZE: u32 = 512;
