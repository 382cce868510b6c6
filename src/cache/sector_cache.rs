//! 扇区缓存门面
//!
//! [`SectorCache`] 持有下游设备并实现 [`BlockDevice`]，可以直接替换它所包装的设备：
//! 字节读取经过缓存，其余操作原样转发给下游设备。

use super::block_cache::BlockCache;
use super::config::CacheConfig;
use super::resolver::Resolution;
use super::stats::{CacheStats, StatsCollector, StatsSink};
use crate::block::BlockDevice;
use crate::error::{Error, ErrorKind, Result};
use crate::types::DeviceGeometry;
use alloc::boxed::Box;
use core::num::NonZeroUsize;

/// 只读扇区缓存
///
/// # 并发使用
///
/// SectorCache 本身不包含内部锁，在单线程环境中可以直接使用。
/// 多线程环境请使用 `SharedSectorCache`（需要 `std` feature），
/// 它把整个读取过程放在同一把锁内，查找与插入不会被其他调用者打断。
///
/// # 示例
///
/// ```rust,ignore
/// let mut cache = SectorCache::builder()
///     .device(image)
///     .capacity(64)
///     .min_entry_sectors(8)
///     .build()?;
///
/// let header = cache.read(0, 512)?;
/// cache.close()?;
/// ```
pub struct SectorCache<D> {
    /// 下游设备
    pub(super) device: D,
    /// 设备几何信息
    pub(super) geometry: DeviceGeometry,
    /// 配置
    pub(super) config: CacheConfig,
    /// 条目存储
    pub(super) cache: BlockCache,
    /// 按起始扇区的命中/未命中计数
    pub(super) counters: StatsCollector,
    /// 诊断输出（可选）
    sink: Option<Box<dyn StatsSink + Send>>,
    /// 字节读取请求次数
    pub(super) read_count: u64,
    /// 下游读取次数（实际设备操作）
    pub(super) downstream_reads: u64,
    /// 下游读取字节数
    pub(super) downstream_bytes: u64,
    /// 最近一次读取走过的解析路径
    pub(super) last_resolution: Resolution,
}

impl<D: BlockDevice> SectorCache<D> {
    /// 创建扇区缓存
    ///
    /// # 参数
    ///
    /// * `device` - 下游设备
    /// * `config` - 缓存配置，构造时校验
    pub fn new(device: D, config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let block_size = device.block_size();
        if block_size == 0 {
            return Err(Error::new(
                ErrorKind::InvalidConfig,
                "device block size must be non-zero",
            ));
        }

        let capacity = NonZeroUsize::new(config.capacity).ok_or(Error::new(
            ErrorKind::InvalidConfig,
            "cache capacity must be non-zero",
        ))?;

        log::debug!(
            "[SCACHE] new cache: block_size={}, capacity={}, min_entry_sectors={}",
            block_size,
            config.capacity,
            config.min_entry_sectors
        );

        Ok(Self {
            device,
            geometry: DeviceGeometry::new(block_size),
            config,
            cache: BlockCache::new(capacity),
            counters: StatsCollector::new(),
            sink: None,
            read_count: 0,
            downstream_reads: 0,
            downstream_bytes: 0,
            last_resolution: Resolution::empty(),
        })
    }

    /// 使用默认配置创建扇区缓存
    pub fn with_defaults(device: D) -> Result<Self> {
        Self::new(device, CacheConfig::default())
    }

    /// 创建构造器
    pub fn builder() -> SectorCacheBuilder<D> {
        SectorCacheBuilder::new()
    }

    /// 获取底层设备的引用
    pub fn device(&self) -> &D {
        &self.device
    }

    /// 获取底层设备的可变引用
    ///
    /// 通过它读取的数据不会进入缓存。
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// 取回底层设备，丢弃缓存内容
    pub fn into_inner(self) -> D {
        self.device
    }

    /// 获取配置
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// 获取设备几何信息
    pub fn geometry(&self) -> DeviceGeometry {
        self.geometry
    }

    /// 获取条目存储
    pub fn block_cache(&self) -> &BlockCache {
        &self.cache
    }

    /// 设备总字节数
    ///
    /// 首次调用时向下游查询，之后返回记住的值。
    pub fn total_size(&mut self) -> Result<u64> {
        if let Some(size) = self.geometry.total_size {
            return Ok(size);
        }
        let size = self.device.size()?;
        log::debug!("[SCACHE] device size={} bytes", size);
        self.geometry.total_size = Some(size);
        Ok(size)
    }

    /// 最近一次 `read`/`read_sectors` 的解析路径
    pub fn last_resolution(&self) -> Resolution {
        self.last_resolution
    }

    /// 按起始扇区的命中/未命中计数
    pub fn counters(&self) -> &StatsCollector {
        &self.counters
    }

    /// 获取缓存统计信息
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            reads: self.read_count,
            hits: self.counters.total_hits(),
            misses: self.counters.total_misses(),
            downstream_reads: self.downstream_reads,
            downstream_bytes: self.downstream_bytes,
            entries: self.cache.len(),
            capacity: self.cache.capacity(),
            evictions: self.cache.evictions(),
        }
    }

    /// 清零所有计数（不影响缓存内容）
    pub fn reset_stats(&mut self) {
        self.counters.clear();
        self.read_count = 0;
        self.downstream_reads = 0;
        self.downstream_bytes = 0;
    }

    /// 输出诊断计数
    ///
    /// 有注入的 [`StatsSink`] 时交给它，否则通过 `log` 输出汇总。
    pub fn flush_stats(&mut self) {
        let summary = self.stats();
        match self.sink.as_mut() {
            Some(sink) => sink.flush(&summary, &self.counters),
            None => log::info!(
                "[SCACHE] reads={} hits={} misses={} hit_rate={:.3} downstream_reads={} downstream_bytes={} entries={}/{} evictions={}",
                summary.reads,
                summary.hits,
                summary.misses,
                summary.hit_rate(),
                summary.downstream_reads,
                summary.downstream_bytes,
                summary.entries,
                summary.capacity,
                summary.evictions
            ),
        }
    }

    /// 关闭缓存
    ///
    /// 先输出诊断计数，然后关闭底层设备。缓存内容保留，直到缓存被丢弃。
    pub fn close(&mut self) -> Result<()> {
        self.flush_stats();
        self.device.close()
    }

    pub(super) fn record_hit(&mut self, sector: u64) {
        if self.config.track_stats {
            self.counters.record_hit(sector);
        }
    }

    pub(super) fn record_miss(&mut self, sector: u64) {
        if self.config.track_stats {
            self.counters.record_miss(sector);
        }
    }
}

impl<D> core::fmt::Debug for SectorCache<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SectorCache")
            .field("geometry", &self.geometry)
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("read_count", &self.read_count)
            .field("downstream_reads", &self.downstream_reads)
            .finish()
    }
}

impl<D: BlockDevice> BlockDevice for SectorCache<D> {
    fn block_size(&self) -> u32 {
        self.geometry.block_size
    }

    fn size(&mut self) -> Result<u64> {
        self.total_size()
    }

    /// 经缓存读取；越过设备末尾的部分不填充，返回实际读取的字节数
    fn read_bytes(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let data = self.read(offset, buf.len() as u64)?;
        buf[..data.len()].copy_from_slice(&data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<()> {
        self.device.flush()
    }

    fn is_read_only(&self) -> bool {
        self.device.is_read_only()
    }

    fn open(&mut self) -> Result<()> {
        self.device.open()
    }

    fn close(&mut self) -> Result<()> {
        SectorCache::close(self)
    }
}

/// 扇区缓存构造器
///
/// 下游设备必须提供，否则 `build` 失败。
pub struct SectorCacheBuilder<D> {
    device: Option<D>,
    config: CacheConfig,
    sink: Option<Box<dyn StatsSink + Send>>,
}

impl<D: BlockDevice> SectorCacheBuilder<D> {
    /// 创建使用默认配置的构造器
    pub fn new() -> Self {
        Self {
            device: None,
            config: CacheConfig::default(),
            sink: None,
        }
    }

    /// 设置下游设备
    pub fn device(mut self, device: D) -> Self {
        self.device = Some(device);
        self
    }

    /// 设置完整配置
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置最大条目数
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// 设置对齐粒度（扇区数）
    pub fn min_entry_sectors(mut self, sectors: u64) -> Self {
        self.config.min_entry_sectors = sectors;
        self
    }

    /// 是否记录命中/未命中计数
    pub fn track_stats(mut self, enabled: bool) -> Self {
        self.config.track_stats = enabled;
        self
    }

    /// 注入诊断输出
    pub fn stats_sink(mut self, sink: Box<dyn StatsSink + Send>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 构造扇区缓存
    pub fn build(self) -> Result<SectorCache<D>> {
        let device = self.device.ok_or(Error::new(
            ErrorKind::InvalidConfig,
            "a downstream device is required",
        ))?;
        let mut cache = SectorCache::new(device, self.config)?;
        cache.sink = self.sink;
        Ok(cache)
    }
}

impl<D: BlockDevice> Default for SectorCacheBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}
