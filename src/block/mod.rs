//! 下游块设备抽象
//!
//! block/device.rs 定义缓存所消费的下游设备接口 [`BlockDevice`]。
//! 缓存门面 [`crate::SectorCache`] 自身也实现该接口，因此可以替换它所包装的设备。

mod device;

pub use device::BlockDevice;
