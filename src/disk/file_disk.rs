use std::{
    fs::{File, OpenOptions},
    io::{Read, Result, Seek, SeekFrom, Write},
    path::Path,
    sync::Mutex,
};

use crate::disk::{
    block_device::{BlockDevice, BlockResult},
    types::{BlockError, BLOCK_SIZE},
};

/// 以磁盘镜像文件模拟 SD 卡
#[derive(Debug)]
pub struct FileDisk {
    file: Mutex<File>,
    blocks: u64,
    read_only: bool,
}

impl FileDisk {
    /// 打开镜像文件；没有写权限时以只读方式打开
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (file, read_only) = match OpenOptions::new().read(true).write(true).open(path) {
            Ok(f) => (f, false),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                (OpenOptions::new().read(true).open(path)?, true)
            }
            Err(e) => return Err(e),
        };

        // 不足一块的尾部字节不可寻址
        let blocks = file.metadata()?.len() / BLOCK_SIZE as u64;

        Ok(Self {
            file: Mutex::new(file),
            blocks,
            read_only,
        })
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn size_bytes(&self) -> u64 {
        self.blocks * BLOCK_SIZE as u64
    }

    fn span(&self, start: u32, count: u32, buf_len: usize) -> std::result::Result<(u64, usize), BlockError> {
        let len = count as usize * BLOCK_SIZE;
        if buf_len < len || start as u64 + count as u64 > self.blocks {
            return Err(BlockError::PARAMETER);
        }
        Ok((start as u64 * BLOCK_SIZE as u64, len))
    }
}

impl BlockDevice for FileDisk {
    fn read_blocks(&self, start: u32, count: u32, buf: &mut [u8]) -> BlockResult {
        let (offset, len) = self.span(start, count, buf.len())?;
        let mut file = self.file.lock().map_err(|_| BlockError::UNUSABLE)?;
        file.seek(SeekFrom::Start(offset))
            .and_then(|_| file.read_exact(&mut buf[..len]))
            .map_err(|_| BlockError::NO_RESPONSE)
    }

    fn write_blocks(&self, start: u32, count: u32, buf: &[u8]) -> BlockResult {
        if self.read_only {
            return Err(BlockError::WRITE_PROTECTED);
        }
        let (offset, len) = self.span(start, count, buf.len())?;
        let mut file = self.file.lock().map_err(|_| BlockError::UNUSABLE)?;
        file.seek(SeekFrom::Start(offset))
            .and_then(|_| file.write_all(&buf[..len]))
            .map_err(|_| BlockError::WRITE)
    }

    fn block_count(&self) -> u64 {
        self.blocks
    }
}
