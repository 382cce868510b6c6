//! 测试用下游设备

use crate::block::BlockDevice;
use crate::error::{Error, ErrorKind, Result};
use alloc::vec::Vec;

/// 设备上每个字节的内容由偏移决定，无需实际分配存储
pub(crate) fn pattern(offset: u64) -> u8 {
    (offset % 251) as u8
}

/// 直接按图样生成 `[offset, offset + len)` 的字节
pub(crate) fn expected(offset: u64, len: u64) -> Vec<u8> {
    (offset..offset + len).map(pattern).collect()
}

pub(crate) struct MockDevice {
    pub block_size: u32,
    pub total_size: u64,
    /// 每次下游读取的 (偏移, 长度)
    pub fetches: Vec<(u64, usize)>,
    pub size_queries: usize,
    pub fail_reads: bool,
    pub short_reads: bool,
    pub opened: bool,
    pub closed: bool,
    pub flushed: bool,
}

impl MockDevice {
    pub fn new(block_size: u32, total_size: u64) -> Self {
        Self {
            block_size,
            total_size,
            fetches: Vec::new(),
            size_queries: 0,
            fail_reads: false,
            short_reads: false,
            opened: false,
            closed: false,
            flushed: false,
        }
    }
}

impl BlockDevice for MockDevice {
    fn block_size(&self) -> u32 {
        self.block_size
    }

    fn size(&mut self) -> Result<u64> {
        self.size_queries += 1;
        Ok(self.total_size)
    }

    fn read_bytes(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if self.fail_reads {
            return Err(Error::new(ErrorKind::Io, "mock read failure"));
        }
        assert!(offset + buf.len() as u64 <= self.total_size, "read past device end");
        self.fetches.push((offset, buf.len()));
        let n = if self.short_reads { buf.len() / 2 } else { buf.len() };
        for (i, b) in buf[..n].iter_mut().enumerate() {
            *b = pattern(offset + i as u64);
        }
        Ok(n)
    }

    fn flush(&mut self) -> Result<()> {
        self.flushed = true;
        Ok(())
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn open(&mut self) -> Result<()> {
        self.opened = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
