use std::{io::stdout, process::ExitCode};

use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::Settings,
    console::TerminalConsole,
    emu::HostEmulator,
    shell::Shell,
};

mod config;
mod console;
mod disk;
mod emu;
mod error;
mod shell;

fn main() -> ExitCode {
    let settings = Settings::from_env();
    let mut emulator = HostEmulator::new(&settings);

    mount_drives(&mut emulator, &settings);

    let console = match TerminalConsole::new() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} {}", "❌ Cannot open console:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    if console.is_interactive() {
        let _ = execute!(stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0));
    }
    let _ = execute!(
        stdout(),
        SetForegroundColor(Color::Cyan),
        Print(format!("Atari ST HDC Emulator v{}\r\n", env!("CARGO_PKG_VERSION"))),
        ResetColor,
        Print("Type 'help' for available commands.\r\n")
    );

    let mut shell = Shell::new(console, emulator);
    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            drop(shell);
            eprintln!("{} {}", "❌ Shell stopped:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// 挂载配置里存在的磁盘镜像
fn mount_drives(emulator: &mut HostEmulator, settings: &Settings) {
    println!("{}", "[Emulator Booting...]".bright_yellow().bold());

    let pb = ProgressBar::new(settings.disk_images.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}") {
        pb.set_style(style.progress_chars("=> "));
    }

    for (n, path) in settings.disk_images.iter().enumerate() {
        pb.set_message(format!("drive {}", n));
        if path.exists() {
            if let Err(e) = emulator.mount_image(n, path) {
                pb.println(format!(
                    "{}",
                    format!("⚠️  drive {}: {} ({})", n, e, path.display()).yellow()
                ));
            }
        } else {
            pb.println(format!(
                "{}",
                format!("drive {}: no image at {}", n, path.display()).bright_black()
            ));
        }
        pb.inc(1);
    }
    pb.finish_with_message("✅ Ready!");
}
