use std::{fmt, time::Instant};

use colored::*;

use crate::{
    config::DRIVE_COUNT,
    console::Console,
    disk::{BlockDevice, DriveTable, TransferBuffer, CHUNK_BLOCKS, CHUNK_BYTES},
    error::Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Src,
    Dst,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Src => write!(f, "SRC"),
            Role::Dst => write!(f, "DST"),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyStats {
    pub chunks: u32,      // 尝试的块组数
    pub copied: u32,      // 读写都成功的块组数
    pub elapsed_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Cancelled,
    InvalidDrive(String),
    NotMounted { role: Role, drive: usize },
    ReadOnly(usize),
    Completed(CopyStats),
}

/// 驱动器标识只看最后一个字符：0、sd0、disk0、drive0 都指向驱动器 0
pub fn parse_drive_id(id: &str) -> Option<usize> {
    id.chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .map(|d| d as usize)
        .filter(|&d| d < DRIVE_COUNT)
}

/// 操作员确认后，把 `src` 的每个完整 128 KiB 块组拷贝到 `dst`，出错的块组只报告并跳过
pub fn copy_disk<C: Console + ?Sized>(
    console: &mut C,
    drives: &DriveTable,
    buffer: &mut TransferBuffer,
    src: &str,
    dst: &str,
) -> Result<CopyOutcome> {
    let (Some(src_idx), Some(dst_idx)) = (parse_drive_id(src), parse_drive_id(dst)) else {
        let bad = if parse_drive_id(src).is_none() { src } else { dst };
        writeln!(console, "{}", format!("cpdisk: invalid drive {}", bad).red())?;
        return Ok(CopyOutcome::InvalidDrive(bad.to_string()));
    };

    writeln!(console, "SRC disk is {}, DST disk is {}", src, dst)?;
    write!(console, "Is this correct [Y/N] ")?;
    let answer = console.read_byte()?;
    if let Some(b) = answer.filter(u8::is_ascii_graphic) {
        console.write_all(&[b])?;
    }
    writeln!(console)?;

    if !matches!(answer, Some(b'y' | b'Y')) {
        return Ok(CopyOutcome::Cancelled);
    }

    let start = Instant::now();

    let Some(src_dev) = mounted_device(drives, src_idx) else {
        return not_mounted(console, Role::Src, src_idx);
    };
    let Some(dst_dev) = mounted_device(drives, dst_idx) else {
        return not_mounted(console, Role::Dst, dst_idx);
    };
    if drives.get(dst_idx).is_some_and(|d| d.is_read_only()) {
        writeln!(console, "{}", format!("DST disk {} is read only", dst_idx).yellow())?;
        return Ok(CopyOutcome::ReadOnly(dst_idx));
    }

    writeln!(console, "Copying {} to {}", src, dst)?;

    // 整除：不足 128 KiB 的尾部不拷贝
    let size = drives.get(src_idx).map_or(0, |d| d.size);
    let chunks = (size / CHUNK_BYTES as u64).min((u32::MAX / CHUNK_BLOCKS) as u64) as u32;

    let mut stats = CopyStats {
        chunks,
        ..CopyStats::default()
    };
    let buf = buffer.as_mut_slice();

    for n in 0..chunks {
        let block = n * CHUNK_BLOCKS;

        if let Err(e) = src_dev.read_blocks(block, CHUNK_BLOCKS, buf) {
            writeln!(console, "\n{}", format!("cpdisk: read error {}", e).red())?;
            continue;
        }
        if let Err(e) = dst_dev.write_blocks(block, CHUNK_BLOCKS, buf) {
            writeln!(console, "\n{}", format!("cpdisk: write error {}", e).red())?;
            continue;
        }

        stats.copied += 1;
        let pct = (n + 1) as f64 / chunks as f64 * 100.0;
        write!(console, " {:5.1}% complete\r", pct)?;
        console.flush()?;
    }

    stats.elapsed_secs = start.elapsed().as_secs();
    writeln!(console)?;
    writeln!(
        console,
        "{}",
        format!("Copy completed in {} seconds", stats.elapsed_secs).green()
    )?;

    Ok(CopyOutcome::Completed(stats))
}

fn mounted_device(drives: &DriveTable, index: usize) -> Option<&dyn BlockDevice> {
    drives.get(index).and_then(|d| d.device())
}

fn not_mounted<C: Console + ?Sized>(console: &mut C, role: Role, drive: usize) -> Result<CopyOutcome> {
    writeln!(console, "{}", format!("{} disk {} is not mounted", role, drive).yellow())?;
    Ok(CopyOutcome::NotMounted { role, drive })
}
