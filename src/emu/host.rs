use std::{
    path::Path,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::{
    config::{parse_cpu_mhz, Settings},
    disk::{BlockDevice, DriveTable, FileDisk, BLOCK_SIZE},
    emu::{format_uptime, Emulator},
    error::{EmuError, Result},
};

/// 宿主机上运行的模拟器：驱动器由镜像文件提供，RTC 是相对宿主时钟的偏移
#[derive(Debug)]
pub struct HostEmulator {
    drives: DriveTable,
    booted: Instant,
    rtc_offset: TimeDelta,
    cpu_mhz: u32,
}

impl HostEmulator {
    pub fn new(settings: &Settings) -> Self {
        Self {
            drives: DriveTable::new(),
            booted: Instant::now(),
            rtc_offset: TimeDelta::zero(),
            cpu_mhz: settings.cpu_mhz,
        }
    }

    pub fn mount_image(&mut self, drive: usize, path: &Path) -> Result<()> {
        let disk = FileDisk::open(path)?;

        // 先读第 0 块，确认镜像可用
        let mut probe = [0u8; BLOCK_SIZE];
        disk.read_blocks(0, 1, &mut probe)?;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size = disk.size_bytes();
        let read_only = disk.is_read_only();
        self.drives
            .mount(drive, Arc::new(disk), size, &label, read_only)?;
        Ok(())
    }

    fn rtc_now(&self) -> NaiveDateTime {
        Local::now().naive_local() + self.rtc_offset
    }

    fn set_rtc(&mut self, target: NaiveDateTime) {
        self.rtc_offset = target.signed_duration_since(Local::now().naive_local());
    }
}

impl Emulator for HostEmulator {
    fn drives(&self) -> &DriveTable {
        &self.drives
    }

    fn date(&mut self, set: Option<&str>) -> Result<String> {
        if let Some(raw) = set {
            let date = NaiveDate::parse_from_str(raw, "%d%m%Y")
                .map_err(|_| EmuError::InvalidArgument(raw.to_string()))?;
            let time = self.rtc_now().time();
            self.set_rtc(date.and_time(time));
        }
        Ok(self.rtc_now().format("%d/%m/%Y").to_string())
    }

    fn time(&mut self, set: Option<&str>) -> Result<String> {
        if let Some(raw) = set {
            let time = NaiveTime::parse_from_str(raw, "%H%M%S")
                .map_err(|_| EmuError::InvalidArgument(raw.to_string()))?;
            let date = self.rtc_now().date();
            self.set_rtc(date.and_time(time));
        }
        Ok(self.rtc_now().format("%H:%M:%S").to_string())
    }

    fn uptime(&self) -> Duration {
        self.booted.elapsed()
    }

    fn status(&self) -> String {
        let host = whoami::fallible::hostname().unwrap_or_else(|_| "localhost".into());
        let mut out = format!(
            "Atari ST HDC emulator v{}\n  host     {}@{}\n  cpu      {} MHz\n  uptime   {}\n  rtc      {}\n",
            env!("CARGO_PKG_VERSION"),
            whoami::username(),
            host,
            self.cpu_mhz,
            format_uptime(self.uptime()),
            self.rtc_now().format("%d/%m/%Y %H:%M:%S"),
        );

        for (n, drive) in self.drives.iter() {
            match drive.mount_id {
                Some(id) if drive.is_mounted() => out.push_str(&format!(
                    "  drive {}  {} ({} bytes{}) id {}\n",
                    n,
                    drive.label,
                    drive.size,
                    if drive.is_read_only() { ", read only" } else { "" },
                    id
                )),
                _ => out.push_str(&format!("  drive {}  not mounted\n", n)),
            }
        }
        out
    }

    fn cpu_freq(&mut self, set: Option<&str>) -> Result<u32> {
        if let Some(raw) = set {
            self.cpu_mhz =
                parse_cpu_mhz(raw).ok_or_else(|| EmuError::InvalidArgument(raw.to_string()))?;
        }
        Ok(self.cpu_mhz)
    }

    fn reboot(&mut self) -> ! {
        let _ = crossterm::terminal::disable_raw_mode();
        restart_self();
        std::process::exit(0)
    }

    fn mount(&mut self, drive: usize, image: &str, partition: Option<&str>) -> Result<()> {
        if partition.is_some() {
            return Err(EmuError::Unavailable("partition selection"));
        }
        self.mount_image(drive, Path::new(image))
    }

    fn unmount(&mut self, drive: usize) -> Result<()> {
        self.drives.unmount(drive)
    }
}

/// 用同样的参数重新启动自身，成功时不返回
#[cfg(unix)]
fn restart_self() {
    use std::os::unix::process::CommandExt;

    if let Ok(exe) = std::env::current_exe() {
        let err = std::process::Command::new(exe)
            .args(std::env::args_os().skip(1))
            .exec();
        eprintln!("reboot failed: {}", err);
    }
}

#[cfg(not(unix))]
fn restart_self() {}
