pub mod block_device;
pub mod drive;
pub mod file_disk;
#[cfg(test)]
pub mod ram_disk;
pub mod types;

pub use block_device::BlockDevice;
pub use drive::DriveTable;
pub use file_disk::FileDisk;
pub use types::{BlockError, BLOCK_SIZE, CHUNK_BLOCKS, CHUNK_BYTES};

/// 拷贝用的共享传输缓冲区（128 KiB），同一时刻只有一个使用者
pub struct TransferBuffer(Box<[u8]>);

impl TransferBuffer {
    pub fn new() -> Self {
        Self(vec![0u8; CHUNK_BYTES].into_boxed_slice())
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl Default for TransferBuffer {
    fn default() -> Self {
        Self::new()
    }
}
