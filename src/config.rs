use std::{env, ops::RangeInclusive, path::PathBuf};

use colored::*;

// 命令行缓冲区容量（包含结尾的 NUL），最多可输入 127 个字符
pub const SHELL_CMDBUF: usize = 128;

// 命令名之后最多保留的参数个数
pub const MAX_ARGS: usize = 4;

// 单个参数的存储长度（包含结尾的 NUL）
pub const MAX_ARG_LENGTH: usize = 32;

/// 逻辑驱动器个数（驱动器 0 / 1）
pub const DRIVE_COUNT: usize = 2;

/// 默认 CPU 频率（MHz）及允许范围
pub const DEFAULT_CPU_MHZ: u32 = 125;
pub const CPU_MHZ_RANGE: RangeInclusive<u32> = 48..=250;

const DISK_ENV: [&str; DRIVE_COUNT] = ["EMU_DISK0", "EMU_DISK1"];
const CPU_ENV: &str = "EMU_CPU_MHZ";

/// 启动时从环境变量读取的配置
#[derive(Debug, Clone)]
pub struct Settings {
    pub disk_images: [PathBuf; DRIVE_COUNT],
    pub cpu_mhz: u32,
}

impl Settings {
    pub fn from_env() -> Self {
        let image_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("atari-hdc");

        let disk_images = std::array::from_fn(|n| {
            env::var_os(DISK_ENV[n])
                .map(PathBuf::from)
                .unwrap_or_else(|| image_dir.join(format!("disk{}.img", n)))
        });

        let cpu_mhz = match env::var(CPU_ENV) {
            Ok(raw) => parse_cpu_mhz(&raw).unwrap_or_else(|| {
                println!(
                    "{}",
                    format!(
                        "⚠️  {}={} is not a valid frequency, using {} MHz",
                        CPU_ENV, raw, DEFAULT_CPU_MHZ
                    )
                    .yellow()
                );
                DEFAULT_CPU_MHZ
            }),
            Err(_) => DEFAULT_CPU_MHZ,
        };

        Self {
            disk_images,
            cpu_mhz,
        }
    }
}

/// 解析 CPU 频率（MHz），超出 [`CPU_MHZ_RANGE`] 的值无效
pub fn parse_cpu_mhz(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|mhz| CPU_MHZ_RANGE.contains(mhz))
}
