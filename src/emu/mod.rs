use std::time::Duration;

use crate::{
    config::DRIVE_COUNT,
    disk::DriveTable,
    error::{EmuError, Result},
};

pub mod host;

pub use host::HostEmulator;

/// shell 委托给模拟器其他部分的服务
pub trait Emulator {
    fn drives(&self) -> &DriveTable;

    /// 无参数读取日期，`ddmmyyyy` 设置日期
    fn date(&mut self, set: Option<&str>) -> Result<String>;

    /// 无参数读取时间，`hhmmss` 设置时间
    fn time(&mut self, set: Option<&str>) -> Result<String>;

    fn uptime(&self) -> Duration;

    fn status(&self) -> String;

    /// 读取或设置 CPU 频率，返回当前 MHz
    fn cpu_freq(&mut self, set: Option<&str>) -> Result<u32>;

    /// 硬复位，不返回
    fn reboot(&mut self) -> !;

    fn mount(&mut self, _drive: usize, _image: &str, _partition: Option<&str>) -> Result<()> {
        Err(EmuError::Unavailable("mount"))
    }

    fn unmount(&mut self, _drive: usize) -> Result<()> {
        Err(EmuError::Unavailable("unmount"))
    }

    fn change_disk(&mut self, _drive: usize, _image: &str) -> Result<()> {
        Err(EmuError::Unavailable("chgdisk"))
    }
}

/// 驱动器盘符：`a`、`B`、`a:` ...
pub fn parse_drive_letter(arg: &str) -> Result<usize> {
    arg.chars()
        .next()
        .filter(char::is_ascii_alphabetic)
        .map(|c| (c.to_ascii_uppercase() as u8 - b'A') as usize)
        .filter(|&d| d < DRIVE_COUNT)
        .ok_or_else(|| EmuError::InvalidDrive(arg.to_string()))
}

pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (days, rem) = (secs / 86_400, secs % 86_400);
    format!(
        "{} days {:02}:{:02}:{:02}",
        days,
        rem / 3600,
        rem % 3600 / 60,
        rem % 60
    )
}
