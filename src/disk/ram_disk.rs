use std::{collections::HashMap, sync::Mutex};

use crate::disk::{
    block_device::{BlockDevice, BlockResult},
    types::{BlockError, BLOCK_SIZE},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Read { start: u32, count: u32 },
    Write { start: u32, count: u32 },
}

/// 内存块设备，记录每次访问，并可在指定起始块上注入错误
#[derive(Debug, Default)]
pub struct RamDisk {
    data: Mutex<Vec<u8>>,
    ops: Mutex<Vec<Op>>,
    read_faults: HashMap<u32, BlockError>,
    write_faults: HashMap<u32, BlockError>,
}

impl RamDisk {
    pub fn new(blocks: usize) -> Self {
        Self {
            data: Mutex::new(vec![0; blocks * BLOCK_SIZE]),
            ..Self::default()
        }
    }

    /// 每个块都填上自己块号的低 8 位
    pub fn patterned(blocks: usize) -> Self {
        let disk = Self::new(blocks);
        for (i, block) in disk.data.lock().unwrap().chunks_mut(BLOCK_SIZE).enumerate() {
            block.fill(i as u8);
        }
        disk
    }

    pub fn fail_read_at(mut self, start: u32, err: BlockError) -> Self {
        self.read_faults.insert(start, err);
        self
    }

    pub fn fail_write_at(mut self, start: u32, err: BlockError) -> Self {
        self.write_faults.insert(start, err);
        self
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn block(&self, index: usize) -> Vec<u8> {
        let data = self.data.lock().unwrap();
        data[index * BLOCK_SIZE..(index + 1) * BLOCK_SIZE].to_vec()
    }
}

impl BlockDevice for RamDisk {
    fn read_blocks(&self, start: u32, count: u32, buf: &mut [u8]) -> BlockResult {
        self.ops.lock().unwrap().push(Op::Read { start, count });
        if let Some(&err) = self.read_faults.get(&start) {
            return Err(err);
        }
        let from = start as usize * BLOCK_SIZE;
        let len = count as usize * BLOCK_SIZE;
        let data = self.data.lock().unwrap();
        let src = data.get(from..from + len).ok_or(BlockError::PARAMETER)?;
        buf[..len].copy_from_slice(src);
        Ok(())
    }

    fn write_blocks(&self, start: u32, count: u32, buf: &[u8]) -> BlockResult {
        self.ops.lock().unwrap().push(Op::Write { start, count });
        if let Some(&err) = self.write_faults.get(&start) {
            return Err(err);
        }
        let from = start as usize * BLOCK_SIZE;
        let len = count as usize * BLOCK_SIZE;
        let mut data = self.data.lock().unwrap();
        let dst = data.get_mut(from..from + len).ok_or(BlockError::PARAMETER)?;
        dst.copy_from_slice(&buf[..len]);
        Ok(())
    }

    fn block_count(&self) -> u64 {
        (self.data.lock().unwrap().len() / BLOCK_SIZE) as u64
    }
}
