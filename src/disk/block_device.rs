use crate::disk::types::BlockError;

pub type BlockResult = std::result::Result<(), BlockError>;

pub trait BlockDevice: Send + Sync {
    /// 从 `start` 开始读取 `count` 个块到 `buf`
    fn read_blocks(&self, start: u32, count: u32, buf: &mut [u8]) -> BlockResult;
    /// 将 `buf` 中的 `count` 个块写到 `start` 开始的位置
    fn write_blocks(&self, start: u32, count: u32, buf: &[u8]) -> BlockResult;
    /// 设备容量（块数）
    fn block_count(&self) -> u64;
}
