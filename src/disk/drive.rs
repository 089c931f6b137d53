use std::{fmt, sync::Arc};

use bitflags::bitflags;
use uuid::Uuid;

use crate::{
    config::DRIVE_COUNT,
    disk::{block_device::BlockDevice, types::BLOCK_SIZE},
    error::{EmuError, Result},
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DriveFlags: u8 {
        const MOUNTED = 1 << 0;
        const READ_ONLY = 1 << 1;
    }
}

/// 一个逻辑驱动器槽位
#[derive(Default)]
pub struct Drive {
    pub flags: DriveFlags,
    pub size: u64,             // 磁盘大小（字节）
    pub label: String,         // 镜像名称，仅用于显示
    pub mount_id: Option<Uuid>,
    device: Option<Arc<dyn BlockDevice>>,
}

impl Drive {
    pub fn is_mounted(&self) -> bool {
        self.flags.contains(DriveFlags::MOUNTED)
    }

    pub fn is_read_only(&self) -> bool {
        self.flags.contains(DriveFlags::READ_ONLY)
    }

    /// 只有已挂载的驱动器才暴露底层设备
    pub fn device(&self) -> Option<&dyn BlockDevice> {
        if self.is_mounted() {
            self.device.as_deref()
        } else {
            None
        }
    }
}

impl fmt::Debug for Drive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drive")
            .field("flags", &self.flags)
            .field("size", &self.size)
            .field("label", &self.label)
            .field("mount_id", &self.mount_id)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct DriveTable {
    drives: [Drive; DRIVE_COUNT],
}

impl DriveTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&Drive> {
        self.drives.get(index)
    }

    #[cfg(test)]
    pub fn is_mounted(&self, index: usize) -> bool {
        self.get(index).is_some_and(Drive::is_mounted)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Drive)> {
        self.drives.iter().enumerate()
    }

    /// 把设备挂到槽位上，替换原有设备，返回新的挂载 ID
    pub fn mount(
        &mut self,
        index: usize,
        device: Arc<dyn BlockDevice>,
        size: u64,
        label: &str,
        read_only: bool,
    ) -> Result<Uuid> {
        let drive = self
            .drives
            .get_mut(index)
            .ok_or_else(|| EmuError::InvalidDrive(index.to_string()))?;

        // 声明的大小不能超过设备容量
        let capacity = device.block_count() * BLOCK_SIZE as u64;
        if size > capacity {
            return Err(EmuError::InvalidArgument(format!(
                "{} bytes exceeds device capacity of {} bytes",
                size, capacity
            )));
        }

        let mut flags = DriveFlags::MOUNTED;
        flags.set(DriveFlags::READ_ONLY, read_only);

        let id = Uuid::new_v4();
        *drive = Drive {
            flags,
            size,
            label: label.to_string(),
            mount_id: Some(id),
            device: Some(device),
        };
        Ok(id)
    }

    pub fn unmount(&mut self, index: usize) -> Result<()> {
        let drive = self
            .drives
            .get_mut(index)
            .ok_or_else(|| EmuError::InvalidDrive(index.to_string()))?;
        if !drive.is_mounted() {
            return Err(EmuError::NotMounted(index));
        }
        *drive = Drive::default();
        Ok(())
    }
}
