//! 读取解析
//!
//! 把字节范围读取转换为扇区范围，按最近使用顺序扫描缓存条目并取第一个结构匹配：
//!
//! - **完全包含**：条目覆盖整个请求，直接切出字节
//! - **左重叠**：条目包含请求首扇区但不含末扇区，取出前半段后递归读取剩余尾部
//! - **右重叠**：条目包含请求末扇区但不含首扇区，递归读取剩余头部后拼接尾部
//! - **未命中**：按对齐粒度计算抓取范围，一次下游读取后插入缓存
//!
//! 每次递归都严格减少扇区数，递归深度不超过与请求重叠的条目数。

use super::sector_cache::SectorCache;
use crate::block::BlockDevice;
use crate::error::{Error, ErrorKind, Result};
use crate::types::SectorRange;
use alloc::vec;
use alloc::vec::Vec;
use bitflags::bitflags;

bitflags! {
    /// 一次读取经过的解析路径
    ///
    /// 一次读取可能同时包含部分命中和未命中。
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Resolution: u8 {
        /// 条目完全包含请求
        const FULL_HIT      = 0x01;
        /// 条目覆盖请求头部
        const LEFT_OVERLAP  = 0x02;
        /// 条目覆盖请求尾部
        const RIGHT_OVERLAP = 0x04;
        /// 从下游抓取
        const MISS          = 0x08;
    }
}

impl Resolution {
    /// 是否完全由缓存满足
    pub fn is_cached(&self) -> bool {
        !self.is_empty() && !self.contains(Resolution::MISS)
    }
}

/// 条目与请求的重叠方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlap {
    Full,
    Left,
    Right,
}

/// 计算未命中时的抓取范围
///
/// 起始扇区向下对齐到 `min_entry_sectors`，长度向上取整到 `min_entry_sectors` 的整数倍，
/// 结果完整覆盖 `[start, start + count - 1]`。
pub fn entry_range(start: u64, count: u64, min_entry_sectors: u64) -> SectorRange {
    debug_assert!(count > 0 && min_entry_sectors > 0);
    let aligned_start = start / min_entry_sectors * min_entry_sectors;
    let span = start + count - aligned_start;
    let aligned_count = (span + min_entry_sectors - 1) / min_entry_sectors * min_entry_sectors;
    SectorRange::from_start_count(aligned_start, aligned_count)
}

/// 字节数转换为 `usize`
///
/// 32 位目标上超出地址空间的请求返回 `InvalidInput`，不做截断。
fn byte_count(bytes: u64) -> Result<usize> {
    usize::try_from(bytes).map_err(|_| {
        Error::new(
            ErrorKind::InvalidInput,
            "byte count exceeds addressable memory",
        )
    })
}

impl<D: BlockDevice> SectorCache<D> {
    /// 读取字节
    ///
    /// # 参数
    ///
    /// * `offset` - 字节偏移量
    /// * `len` - 字节数
    ///
    /// # 返回
    ///
    /// 请求的字节。越过设备末尾的部分被截掉；`offset` 位于设备末尾或之后时返回空。
    ///
    /// # 示例
    ///
    /// ```rust,ignore
    /// let data = cache.read(1024, 100)?;
    /// assert!(data.len() <= 100);
    /// ```
    pub fn read(&mut self, offset: u64, len: u64) -> Result<Vec<u8>> {
        self.read_count += 1;
        self.last_resolution = Resolution::empty();

        let total_size = self.total_size()?;
        if offset >= total_size || len == 0 {
            return Ok(Vec::new());
        }
        let len = len.min(total_size - offset);

        let start_sector = self.geometry.sector_of(offset);
        let start_offset = self.geometry.offset_in_sector(offset);
        let end_sector = self.geometry.sector_of(offset + len - 1);
        let sector_count = end_sector - start_sector + 1;

        let len = byte_count(len)?;
        let mut span = self.read_sectors(start_sector, sector_count)?;
        span.truncate(start_offset + len);
        span.drain(..start_offset);
        Ok(span)
    }

    /// 读取连续扇区
    ///
    /// 返回 `sector_count * block_size` 字节，位于设备末尾之后的部分为 0。
    pub fn read_sectors(&mut self, start_sector: u64, sector_count: u64) -> Result<Vec<u8>> {
        if sector_count == 0 {
            return Ok(Vec::new());
        }
        let request = SectorRange::from_start_count(start_sector, sector_count);

        let Some((overlap, range, bytes)) = self.find_overlap(&request) else {
            return self.fetch(&request);
        };

        self.record_hit(start_sector);
        self.cache.touch(&range);

        match overlap {
            Overlap::Full => {
                log::trace!("[SCACHE] hit {:?} in {:?}", request, range);
                self.last_resolution |= Resolution::FULL_HIT;
                Ok(bytes)
            }
            Overlap::Left => {
                let consumed = range.last - start_sector + 1;
                debug_assert!(consumed < sector_count);
                log::trace!("[SCACHE] head of {:?} in {:?}", request, range);
                self.last_resolution |= Resolution::LEFT_OVERLAP;

                let mut out = bytes;
                let tail = self.read_sectors(range.last + 1, sector_count - consumed)?;
                out.extend_from_slice(&tail);
                Ok(out)
            }
            Overlap::Right => {
                let consumed = request.last + 1 - range.first;
                debug_assert!(consumed < sector_count);
                log::trace!("[SCACHE] tail of {:?} in {:?}", request, range);
                self.last_resolution |= Resolution::RIGHT_OVERLAP;

                let mut out = self.read_sectors(start_sector, sector_count - consumed)?;
                out.extend_from_slice(&bytes);
                Ok(out)
            }
        }
    }

    /// 按最近使用顺序找到第一个与请求结构匹配的条目，并复制出重叠部分的字节
    ///
    /// 字节必须在递归前复制出来：递归中的未命中可能驱逐该条目。
    fn find_overlap(&self, request: &SectorRange) -> Option<(Overlap, SectorRange, Vec<u8>)> {
        let block_size = self.geometry.block_size;

        for (range, entry) in self.cache.iter_recent() {
            let has_first = range.contains_sector(request.first);
            let has_last = range.contains_sector(request.last);

            let (overlap, part) = match (has_first, has_last) {
                (true, true) => (Overlap::Full, *request),
                (true, false) => (Overlap::Left, SectorRange::new(request.first, range.last)),
                (false, true) => (Overlap::Right, SectorRange::new(range.first, request.last)),
                (false, false) => continue,
            };
            return Some((overlap, range, entry.sectors(part, block_size).to_vec()));
        }
        None
    }

    /// 未命中：一次下游读取对齐后的范围，插入缓存，返回请求部分
    ///
    /// 下游失败时不插入任何条目。
    fn fetch(&mut self, request: &SectorRange) -> Result<Vec<u8>> {
        let block_size = self.geometry.block_size;
        let total_size = self.total_size()?;
        let fetch = entry_range(
            request.first,
            request.sector_count(),
            self.config.min_entry_sectors,
        );

        let fetch_offset = fetch.byte_offset(block_size);
        let fetch_len = byte_count(fetch.byte_len(block_size))?;

        // 超出设备末尾的部分保持为 0
        let mut data = vec![0u8; fetch_len];
        if fetch_offset < total_size {
            let available =
                byte_count((total_size - fetch_offset).min(fetch.byte_len(block_size)))?;
            self.downstream_reads += 1;
            let n = self.device.read_bytes(fetch_offset, &mut data[..available])?;
            self.downstream_bytes += n as u64;
            if n < available {
                log::warn!(
                    "[SCACHE] short read at {:#x}: {} of {} bytes",
                    fetch_offset,
                    n,
                    available
                );
                return Err(Error::new(
                    ErrorKind::Io,
                    "short read from downstream device",
                ));
            }
        }

        let start = byte_count((request.first - fetch.first) * block_size as u64)?;
        let end = start + byte_count(request.byte_len(block_size))?;
        let out = data[start..end].to_vec();

        log::debug!(
            "[SCACHE] miss {:?}: fetched {:?}, cache={}/{}",
            request,
            fetch,
            self.cache.len(),
            self.cache.capacity()
        );
        self.cache.insert(fetch, data);
        self.record_miss(request.first);
        self.last_resolution |= Resolution::MISS;

        Ok(out)
    }
}
