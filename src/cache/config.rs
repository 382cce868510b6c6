//! 缓存配置

use crate::consts::{DEFAULT_CAPACITY, DEFAULT_MIN_ENTRY_SECTORS};
use crate::error::{Error, ErrorKind, Result};

/// 扇区缓存配置
///
/// 构造时校验一次，之后在缓存生命周期内不变。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// 最大条目数
    pub capacity: usize,
    /// 对齐粒度（扇区数），每个条目的起始和长度都是它的整数倍
    pub min_entry_sectors: u64,
    /// 是否按起始扇区记录命中/未命中
    pub track_stats: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            min_entry_sectors: DEFAULT_MIN_ENTRY_SECTORS,
            track_stats: true,
        }
    }
}

impl CacheConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::new(
                ErrorKind::InvalidConfig,
                "cache capacity must be non-zero",
            ));
        }
        if self.min_entry_sectors == 0 {
            return Err(Error::new(
                ErrorKind::InvalidConfig,
                "min_entry_sectors must be non-zero",
            ));
        }
        Ok(())
    }
}
