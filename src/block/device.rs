//! 下游设备接口

use crate::error::Result;

/// 下游块设备接口
///
/// 实现此 trait 以向扇区缓存提供底层数据源（磁盘镜像、远程设备等）。
///
/// # 示例
///
/// ```rust,ignore
/// use sector_cache::{BlockDevice, Result};
///
/// struct ImageFile {
///     // ...
/// }
///
/// impl BlockDevice for ImageFile {
///     fn block_size(&self) -> u32 {
///         512
///     }
///
///     fn size(&mut self) -> Result<u64> {
///         Ok(self.len)
///     }
///
///     fn read_bytes(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
///         // 从 offset 处读满 buf
///         Ok(buf.len())
///     }
/// }
/// ```
pub trait BlockDevice {
    /// 扇区大小（字节），设备生命周期内不变
    fn block_size(&self) -> u32;

    /// 设备总字节数
    ///
    /// 缓存只在首次需要时调用一次，之后使用记住的值。
    fn size(&mut self) -> Result<u64>;

    /// 从字节偏移读取
    ///
    /// # 参数
    ///
    /// * `offset` - 字节偏移量
    /// * `buf` - 目标缓冲区，应被完整填满
    ///
    /// # 返回
    ///
    /// 成功返回实际读取的字节数
    fn read_bytes(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// 刷新设备
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// 是否只读
    fn is_read_only(&self) -> bool {
        false
    }

    /// 打开设备
    ///
    /// 默认实现什么都不做，设备可以根据需要覆盖此方法。
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    /// 关闭设备
    ///
    /// 默认实现什么都不做，设备可以根据需要覆盖此方法。
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
