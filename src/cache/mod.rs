//! 扇区缓存模块
//!
//! 透明地位于调用者与下游块设备之间的只读缓存。
//!
//! # 主要组件
//!
//! - [`CacheEntry`] - 单个缓存条目，持有一个扇区范围的数据
//! - [`BlockCache`] - 有界 LRU 条目存储
//! - [`SectorCache`] - 缓存门面，实现 [`crate::BlockDevice`]，可替换下游设备
//! - [`StatsCollector`] / [`CacheStats`] - 诊断计数
//! - [`CacheConfig`] - 容量与对齐粒度配置
//!
//! # 读取流程
//!
//! ```text
//! read(offset, len)
//!   -> 截断到设备末尾，换算为扇区范围
//!   -> read_sectors(start, count)
//!        按最近使用顺序扫描条目：完全包含 / 左重叠 / 右重叠
//!        都不匹配：entry_range() 对齐后一次下游读取，插入缓存（可能驱逐）
//!   -> 切出请求的字节
//! ```
//!
//! # 对齐
//!
//! 未命中时总是按 `min_entry_sectors` 扇区为单位抓取和缓存，
//! 把零散的小读取合并为较少的大块下游读取。
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use sector_cache::SectorCache;
//!
//! let mut cache = SectorCache::builder()
//!     .device(image)
//!     .capacity(2)
//!     .min_entry_sectors(4)
//!     .build()?;
//!
//! cache.read(0, 100)?;      // 未命中，抓取扇区 [0, 3]
//! cache.read(2000, 100)?;   // [0, 3] 左重叠 + 抓取 [4, 7]
//!
//! let stats = cache.stats();
//! println!("hits={} misses={}", stats.hits, stats.misses);
//! ```

mod block_cache;
mod config;
mod entry;
mod resolver;
mod sector_cache;
mod stats;

#[cfg(feature = "std")]
mod shared;

#[cfg(test)]
mod mock;

pub use block_cache::BlockCache;
pub use config::CacheConfig;
pub use entry::CacheEntry;
pub use resolver::{entry_range, Resolution};
pub use sector_cache::{SectorCache, SectorCacheBuilder};
pub use stats::{CacheStats, StatsCollector, StatsSink};

#[cfg(feature = "std")]
pub use shared::SharedSectorCache;
