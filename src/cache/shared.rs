//! 多线程共享的扇区缓存
//!
//! 整个读取（查找、下游抓取、插入）在同一把 `Mutex` 内完成，
//! 保证每次未命中至多一次下游读取并立即填充缓存。

use super::sector_cache::SectorCache;
use super::stats::CacheStats;
use crate::block::BlockDevice;
use crate::error::{Error, ErrorKind, Result};
use alloc::vec::Vec;
use std::sync::{Mutex, MutexGuard};

/// 加锁的扇区缓存
///
/// ```rust,ignore
/// let shared = Arc::new(SharedSectorCache::new(cache));
/// let data = shared.read(4096, 512)?;
/// ```
pub struct SharedSectorCache<D> {
    inner: Mutex<SectorCache<D>>,
}

impl<D: BlockDevice> SharedSectorCache<D> {
    /// 包装一个扇区缓存
    pub fn new(cache: SectorCache<D>) -> Self {
        Self {
            inner: Mutex::new(cache),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SectorCache<D>>> {
        self.inner
            .lock()
            .map_err(|_| Error::new(ErrorKind::InvalidState, "sector cache lock poisoned"))
    }

    /// 读取字节，持锁完成整个操作
    pub fn read(&self, offset: u64, len: u64) -> Result<Vec<u8>> {
        self.lock()?.read(offset, len)
    }

    /// 获取缓存统计信息
    pub fn stats(&self) -> Result<CacheStats> {
        Ok(self.lock()?.stats())
    }

    /// 在锁内访问扇区缓存
    pub fn with<R>(&self, f: impl FnOnce(&mut SectorCache<D>) -> R) -> Result<R> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    /// 输出诊断计数并关闭底层设备
    pub fn close(&self) -> Result<()> {
        self.lock()?.close()
    }

    /// 取回内部的扇区缓存
    pub fn into_inner(self) -> Result<SectorCache<D>> {
        self.inner
            .into_inner()
            .map_err(|_| Error::new(ErrorKind::InvalidState, "sector cache lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::config::CacheConfig;
    use crate::cache::mock::{expected, MockDevice};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_concurrent_reads() {
        let cache = SectorCache::new(
            MockDevice::new(512, 1 << 20),
            CacheConfig {
                capacity: 16,
                min_entry_sectors: 8,
                track_stats: true,
            },
        )
        .unwrap();
        let shared = Arc::new(SharedSectorCache::new(cache));

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..50u64 {
                        let offset = (t * 7919 + i * 1031) % (1 << 19);
                        let data = shared.read(offset, 700).unwrap();
                        assert_eq!(data, expected(offset, 700));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = shared.stats().unwrap();
        assert_eq!(stats.reads, 200);
        assert!(stats.entries <= 16);
    }

    #[test]
    fn test_with_and_close() {
        let cache = SectorCache::with_defaults(MockDevice::new(512, 1 << 20)).unwrap();
        let shared = SharedSectorCache::new(cache);

        shared.read(0, 10).unwrap();
        let fetches = shared.with(|c| c.device().fetches.len()).unwrap();
        assert_eq!(fetches, 1);

        shared.close().unwrap();
        let cache = shared.into_inner().unwrap();
        assert!(cache.device().closed);
    }
}
