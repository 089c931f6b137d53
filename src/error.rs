use std::fmt;

use crate::disk::BlockError;

/// 模拟器 shell 错误类型
#[derive(Debug)]
pub enum EmuError {
    Io(std::io::Error),          // 控制台 / 镜像文件 I/O 错误
    Allocation,                  // 命令行副本分配失败
    InvalidDrive(String),        // 无法识别的驱动器标识
    NotMounted(usize),           // 驱动器未挂载
    InvalidArgument(String),     // 参数非法
    Device(BlockError),          // 块设备返回的错误码
    Unavailable(&'static str),   // 功能尚未提供
}

impl From<std::io::Error> for EmuError {
    fn from(e: std::io::Error) -> Self {
        EmuError::Io(e)
    }
}

impl From<BlockError> for EmuError {
    fn from(e: BlockError) -> Self {
        EmuError::Device(e)
    }
}

impl fmt::Display for EmuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Allocation => write!(f, "could not allocate command line copy"),
            Self::InvalidDrive(id) => write!(f, "invalid drive: {}", id),
            Self::NotMounted(drive) => write!(f, "drive {} is not mounted", drive),
            Self::InvalidArgument(arg) => write!(f, "invalid argument: {}", arg),
            Self::Device(e) => write!(f, "device error {}", e.code()),
            Self::Unavailable(what) => write!(f, "{} is not available yet", what),
        }
    }
}

impl std::error::Error for EmuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Device(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EmuError>;
