//! sector_cache: 块设备的扇区级只读缓存
//!
//! 透明地位于调用者与下游块设备之间：
//! - 把任意字节范围读取换算为对齐的扇区范围
//! - 从有界 LRU 缓存中提供数据，合并跨越多个已缓存范围的读取
//! - 只在数据未缓存时访问下游设备，并按对齐粒度批量抓取
//!
//! # 示例
//!
//! ```rust,ignore
//! use sector_cache::{BlockDevice, SectorCache, Result};
//!
//! // 实现 BlockDevice trait
//! struct MyDevice {
//!     // ...
//! }
//!
//! impl BlockDevice for MyDevice {
//!     // 实现必要的方法
//!     // ...
//! }
//!
//! fn main() -> Result<()> {
//!     let mut cache = SectorCache::with_defaults(MyDevice::new())?;
//!
//!     // 读取字节
//!     let data = cache.read(1024, 4096)?;
//!
//!     cache.close()?;
//!     Ok(())
//! }
//! ```
//!
//! # 模块结构
//!
//! - [`error`] - 错误类型定义
//! - [`block`] - 下游设备接口
//! - [`consts`] - 常量定义
//! - [`types`] - 扇区范围与设备几何
//! - [`cache`] - 缓存实现

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

// ===== 核心模块 =====

/// 错误处理
pub mod error;

/// 下游设备抽象
pub mod block;

/// 常量定义
pub mod consts;

/// 数据结构定义
pub mod types;

/// 扇区缓存
pub mod cache;

// ===== 公共导出 =====

// 错误处理
pub use error::{Error, ErrorKind, Result};

// 下游设备
pub use block::BlockDevice;

// 数据结构
pub use types::{DeviceGeometry, SectorRange};

// 缓存
pub use cache::{
    entry_range, BlockCache, CacheConfig, CacheEntry, CacheStats, Resolution, SectorCache,
    SectorCacheBuilder, StatsCollector, StatsSink,
};

#[cfg(feature = "std")]
pub use cache::SharedSectorCache;
