use std::fmt;

/// 每个逻辑块（Block）的大小：512 字节
/// SD 卡以“块”为最小读写单位。
pub const BLOCK_SIZE: usize = 512;

/// 一次拷贝传输的块数：256 块
pub const CHUNK_BLOCKS: u32 = 256;

/// 一次拷贝传输的字节数：256 * 512 = 128 KiB
pub const CHUNK_BYTES: usize = BLOCK_SIZE * CHUNK_BLOCKS as usize;

/// 块设备返回的错误码，编号沿用 SD 卡驱动；0 表示成功，不会出现在这里
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockError(i32);

impl BlockError {
    pub const PARAMETER: Self = Self(-5003);
    pub const WRITE_PROTECTED: Self = Self(-5006);
    pub const UNUSABLE: Self = Self(-5007);
    pub const NO_RESPONSE: Self = Self(-5008);
    pub const WRITE: Self = Self(-5011);

    pub fn code(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BlockError {}
