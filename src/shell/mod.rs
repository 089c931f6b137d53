pub mod command;
pub mod cpdisk;
pub mod line;
pub mod parse;

use colored::*;

use crate::{
    console::Console,
    disk::TransferBuffer,
    emu::{format_uptime, parse_drive_letter, Emulator},
    error::{EmuError, Result},
    shell::{
        command::{find_help, lookup, CommandId, CommandSpec, COMMANDS},
        cpdisk::{copy_disk, CopyOutcome},
        line::LineEditor,
        parse::{tokenize, Args},
    },
};

const PROMPT: &str = "Emu> ";

/// 一条命令的执行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    Syntax,
    Unavailable,
}

/// 命令执行后 shell 是否继续
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Continue,
    Terminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub outcome: Outcome,
    pub directive: Directive,
}

impl Dispatch {
    fn done(outcome: Outcome) -> Self {
        Self {
            outcome,
            directive: Directive::Continue,
        }
    }

    fn terminate() -> Self {
        Self {
            outcome: Outcome::Success,
            directive: Directive::Terminate,
        }
    }
}

pub struct Shell<C: Console, E: Emulator> {
    console: C,
    emulator: E,
    editor: LineEditor,
    buffer: TransferBuffer,
    tokenizer: fn(&str) -> Result<Args>,
}

impl<C: Console, E: Emulator> Shell<C, E> {
    pub fn new(console: C, emulator: E) -> Self {
        Self {
            console,
            emulator,
            editor: LineEditor::new(),
            buffer: TransferBuffer::new(),
            tokenizer: tokenize,
        }
    }

    #[cfg(test)]
    pub fn console(&self) -> &C {
        &self.console
    }

    #[cfg(test)]
    pub fn emulator(&self) -> &E {
        &self.emulator
    }

    /// 读行、分发，直到 quit/exit 或输入关闭
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.console, "{}", PROMPT)?;

            let Some(line) = self.editor.read_line(&mut self.console)? else {
                writeln!(self.console, "\n{}", "Console closed, leaving shell".yellow())?;
                return Ok(());
            };

            if self.dispatch(&line)?.directive == Directive::Terminate {
                writeln!(self.console, "{}", "👋 Bye!".bright_yellow())?;
                return Ok(());
            }
        }
    }

    pub fn dispatch(&mut self, line: &str) -> Result<Dispatch> {
        let args = match (self.tokenizer)(line) {
            Ok(args) => args,
            Err(EmuError::Allocation) => {
                writeln!(self.console, "{} {}", "❌ Error:".red().bold(), EmuError::Allocation)?;
                return Ok(Dispatch::done(Outcome::Failure));
            }
            Err(e) => return Err(e),
        };

        if args.is_empty() {
            return Ok(Dispatch::done(Outcome::Success));
        }

        match lookup(args.name()) {
            Some(cmd) => self.execute(cmd, &args),
            None => {
                writeln!(
                    self.console,
                    "{}",
                    format!("⚠️  Unknown command '{}'. Type 'help' for command list.", args.name())
                        .yellow()
                )?;
                Ok(Dispatch::done(Outcome::Failure))
            }
        }
    }

    fn execute(&mut self, cmd: &CommandSpec, args: &Args) -> Result<Dispatch> {
        let argc = args.argc();

        let outcome = match cmd.id {
            CommandId::ChgDisk => {
                if argc != 2 {
                    return self.syntax(cmd, args);
                }
                let result = parse_drive_letter(args.get(1).unwrap_or(""))
                    .and_then(|drive| self.emulator.change_disk(drive, args.get(2).unwrap_or("")));
                self.report(result.map(|_| String::new()))?
            }

            CommandId::CpDisk => {
                if argc != 2 {
                    return self.syntax(cmd, args);
                }
                let outcome = copy_disk(
                    &mut self.console,
                    self.emulator.drives(),
                    &mut self.buffer,
                    args.get(1).unwrap_or(""),
                    args.get(2).unwrap_or(""),
                )?;
                match outcome {
                    CopyOutcome::Completed(_) | CopyOutcome::Cancelled => Outcome::Success,
                    _ => Outcome::Failure,
                }
            }

            CommandId::Cpu => {
                if argc > 1 {
                    return self.syntax(cmd, args);
                }
                let result = self
                    .emulator
                    .cpu_freq(args.get(1))
                    .map(|mhz| format!("CPU frequency {} MHz", mhz));
                self.report(result)?
            }

            CommandId::Date | CommandId::Time => {
                if argc > 1 {
                    return self.syntax(cmd, args);
                }
                let result = if cmd.id == CommandId::Date {
                    self.emulator.date(args.get(1))
                } else {
                    self.emulator.time(args.get(1))
                };
                self.report(result)?
            }

            CommandId::Help => {
                if argc > 1 {
                    return self.syntax(cmd, args);
                }
                self.help(args.get(1))?;
                Outcome::Success
            }

            CommandId::Mount => {
                if argc != 2 && argc != 3 {
                    return self.syntax(cmd, args);
                }
                let image = args.get(2).unwrap_or("");
                let result = parse_drive_letter(args.get(1).unwrap_or("")).and_then(|drive| {
                    self.emulator
                        .mount(drive, image, args.get(3))
                        .map(|_| format!("{} mounted", image))
                });
                self.report(result)?
            }

            CommandId::Quit | CommandId::Exit => return Ok(Dispatch::terminate()),

            CommandId::Reboot => {
                writeln!(self.console, "{}", "Rebooting...".bright_yellow())?;
                self.console.flush()?;
                self.emulator.reboot()
            }

            CommandId::Status => {
                let status = self.emulator.status();
                write!(self.console, "{}", status)?;
                Outcome::Success
            }

            CommandId::Unmount => {
                if argc < 1 {
                    return self.syntax(cmd, args);
                }
                let arg = args.get(1).unwrap_or("");
                let result = parse_drive_letter(arg).and_then(|drive| {
                    self.emulator
                        .unmount(drive)
                        .map(|_| format!("drive {} unmounted", arg))
                });
                self.report(result)?
            }

            CommandId::Uptime => {
                let uptime = format_uptime(self.emulator.uptime());
                writeln!(self.console, "up {}", uptime)?;
                Outcome::Success
            }
        };

        Ok(Dispatch::done(outcome))
    }

    /// 把委托调用的结果打印出来并换算成 `Outcome`
    fn report(&mut self, result: Result<String>) -> Result<Outcome> {
        match result {
            Ok(msg) => {
                if !msg.is_empty() {
                    writeln!(self.console, "{}", msg)?;
                }
                Ok(Outcome::Success)
            }
            Err(e @ EmuError::Unavailable(_)) => {
                writeln!(self.console, "{}", format!("⚠️  {}", e).yellow())?;
                Ok(Outcome::Unavailable)
            }
            Err(e) => {
                writeln!(self.console, "{} {}", "❌ Error:".red().bold(), e)?;
                Ok(Outcome::Failure)
            }
        }
    }

    fn syntax(&mut self, cmd: &CommandSpec, args: &Args) -> Result<Dispatch> {
        let usage = cmd.detail.and_then(|d| d.lines().next()).unwrap_or("");
        writeln!(
            self.console,
            "{}",
            format!("syntax error: {} {}", args.name(), usage).red()
        )?;
        Ok(Dispatch::done(Outcome::Syntax))
    }

    fn help(&mut self, topic: Option<&str>) -> Result<()> {
        let Some(topic) = topic else {
            writeln!(self.console, "{}", "📘 Emulator Commands".bright_cyan().bold())?;
            for cmd in COMMANDS {
                writeln!(self.console, " {:<10}  {}", cmd.name, cmd.doc)?;
            }
            return Ok(());
        };

        match find_help(topic) {
            Some(cmd) => writeln!(
                self.console,
                " {:<10}  {}",
                cmd.name,
                cmd.detail.unwrap_or(cmd.doc)
            )?,
            None => writeln!(self.console, "{}", format!("nothing found for '{}'", topic).bright_black())?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::{
        console::memory::MemoryConsole,
        shell::parse::tokenize_reserving,
        disk::{
            ram_disk::{Op, RamDisk},
            DriveTable, CHUNK_BYTES,
        },
    };

    #[derive(Default)]
    struct FakeEmulator {
        drives: DriveTable,
        calls: Vec<String>,
    }

    impl Emulator for FakeEmulator {
        fn drives(&self) -> &DriveTable {
            &self.drives
        }

        fn date(&mut self, set: Option<&str>) -> Result<String> {
            self.calls.push(format!("date {:?}", set));
            Ok("01/11/2022".into())
        }

        fn time(&mut self, set: Option<&str>) -> Result<String> {
            self.calls.push(format!("time {:?}", set));
            match set {
                Some("999999") => Err(EmuError::InvalidArgument("999999".into())),
                _ => Ok("12:00:00".into()),
            }
        }

        fn uptime(&self) -> Duration {
            Duration::from_secs(61)
        }

        fn status(&self) -> String {
            "all good\n".into()
        }

        fn cpu_freq(&mut self, set: Option<&str>) -> Result<u32> {
            self.calls.push(format!("cpu {:?}", set));
            Ok(set.and_then(|s| s.parse().ok()).unwrap_or(125))
        }

        fn reboot(&mut self) -> ! {
            panic!("reboot requested")
        }

        fn mount(&mut self, drive: usize, image: &str, partition: Option<&str>) -> Result<()> {
            self.calls
                .push(format!("mount {} {} {:?}", drive, image, partition));
            Ok(())
        }
    }

    fn shell(input: &str) -> Shell<MemoryConsole, FakeEmulator> {
        Shell::new(MemoryConsole::new(input), FakeEmulator::default())
    }

    fn out_of_memory(line: &str) -> Result<Args> {
        tokenize_reserving(line, usize::MAX)
    }

    fn dispatch(line: &str) -> (Dispatch, Shell<MemoryConsole, FakeEmulator>) {
        let mut sh = shell("");
        let d = sh.dispatch(line).unwrap();
        (d, sh)
    }

    #[test]
    fn quit_and_exit_terminate() {
        for line in ["quit", "exit", "quitnow", "exit 1 2"] {
            let (d, _) = dispatch(line);
            assert_eq!(d, Dispatch::terminate(), "{}", line);
        }
    }

    #[test]
    fn valid_commands_keep_the_shell_running() {
        for line in ["status", "uptime", "cpu", "cpu 133", "date", "time 120000", "help", "help date"] {
            let (d, _) = dispatch(line);
            assert_eq!(d.outcome, Outcome::Success, "{}", line);
            assert_eq!(d.directive, Directive::Continue, "{}", line);
        }
    }

    #[test]
    fn failures_do_not_end_the_shell() {
        let (d, sh) = dispatch("time 999999");
        assert_eq!(d, Dispatch::done(Outcome::Failure));
        assert!(sh.console().output().contains("invalid argument: 999999"));

        let (d, sh) = dispatch("frobnicate");
        assert_eq!(d, Dispatch::done(Outcome::Failure));
        assert!(sh.console().output().contains("Unknown command 'frobnicate'"));
    }

    #[test]
    fn allocation_failure_is_reported_as_failure() {
        let mut sh = shell("");
        sh.tokenizer = out_of_memory;

        let d = sh.dispatch("status").unwrap();
        assert_eq!(d, Dispatch::done(Outcome::Failure));
        let out = sh.console().output();
        assert!(out.contains("could not allocate command line copy"));
        assert!(!out.contains("all good"));
    }

    #[test]
    fn run_continues_after_allocation_failure() {
        let mut sh = shell("status\rstatus\r");
        sh.tokenizer = out_of_memory;
        sh.run().unwrap();

        let out = sh.console().output();
        assert_eq!(out.matches("could not allocate").count(), 2);
        assert_eq!(out.matches(PROMPT).count(), 3);
        assert!(out.contains("Console closed"));
    }

    #[test]
    fn empty_line_is_ignored() {
        let (d, sh) = dispatch("   ");
        assert_eq!(d, Dispatch::done(Outcome::Success));
        assert!(sh.console().output().is_empty());
    }

    #[test]
    fn wrong_argument_count_is_a_syntax_error() {
        for line in ["cpu 1 2", "date 1 2", "chgdisk a", "mount a", "mount a b c d", "unmount", "cpdisk 0", "help a b"] {
            let (d, sh) = dispatch(line);
            assert_eq!(d.outcome, Outcome::Syntax, "{}", line);
            assert!(sh.emulator().calls.is_empty(), "{}", line);
            let name = line.split(' ').next().unwrap();
            assert!(sh.console().output().contains(&format!("syntax error: {}", name)));
        }
    }

    #[test]
    fn arguments_reach_the_delegates() {
        let (_, sh) = dispatch("mount a image 1");
        assert_eq!(sh.emulator().calls, ["mount 0 image Some(\"1\")"]);

        let (_, sh) = dispatch("date 01112022");
        assert_eq!(sh.emulator().calls, ["date Some(\"01112022\")"]);

        let (_, sh) = dispatch("cpu 200");
        assert!(sh.console().output().contains("CPU frequency 200 MHz"));
    }

    #[test]
    fn unimplemented_delegates_are_unavailable() {
        let (d, sh) = dispatch("chgdisk a: image");
        assert_eq!(d, Dispatch::done(Outcome::Unavailable));
        assert!(sh.console().output().contains("chgdisk is not available yet"));

        let (d, _) = dispatch("unmount a");
        assert_eq!(d.outcome, Outcome::Unavailable);
    }

    #[test]
    fn bad_drive_letter_fails() {
        let (d, sh) = dispatch("mount z image");
        assert_eq!(d.outcome, Outcome::Failure);
        assert!(sh.emulator().calls.is_empty());
    }

    #[test]
    fn help_matches_on_substring() {
        let (_, sh) = dispatch("help chg");
        let out = sh.console().output();
        assert!(out.contains("chgdisk"));
        assert!(out.contains("<drive> must be a mounted drive"));

        let (_, sh) = dispatch("help quit");
        assert!(sh.console().output().contains("Exit shell"));

        let (_, sh) = dispatch("help zzz");
        assert!(sh.console().output().contains("nothing found for 'zzz'"));
    }

    #[test]
    fn help_without_topic_lists_every_command() {
        let (_, sh) = dispatch("help");
        let out = sh.console().output();
        for cmd in COMMANDS {
            assert!(out.contains(cmd.name), "{}", cmd.name);
        }
    }

    #[test]
    fn uptime_and_status_are_printed() {
        let (_, sh) = dispatch("uptime");
        assert!(sh.console().output().contains("up 0 days 00:01:01"));

        let (_, sh) = dispatch("status");
        assert_eq!(sh.console().output(), "all good\n");
    }

    #[test]
    #[should_panic(expected = "reboot requested")]
    fn reboot_hands_over_to_the_emulator() {
        let _ = dispatch("reboot");
    }

    #[test]
    fn run_stops_after_quit() {
        let mut sh = shell("status\rquit\rstatus\r");
        sh.run().unwrap();

        let out = sh.console().output();
        assert_eq!(out.matches("all good").count(), 1);
        assert!(out.starts_with("Emu> status\r\n"));
        assert!(out.contains("Bye!"));
        assert_eq!(sh.console().remaining_input(), "status\r".len());
    }

    #[test]
    fn run_survives_failures_and_ends_when_input_closes() {
        let mut sh = shell("bogus\rcpu 1 2\rtime 999999\r");
        sh.run().unwrap();

        let out = sh.console().output();
        assert_eq!(out.matches(PROMPT).count(), 4);
        assert!(out.contains("Console closed"));
    }

    #[test]
    fn ctrl_c_discards_the_line_and_keeps_running() {
        let mut sh = shell("stat\x03status\rquit\r");
        sh.run().unwrap();

        let out = sh.console().output();
        assert!(out.contains("Emu> stat^C\r\nEmu> status\r\n"));
        assert_eq!(out.matches("all good").count(), 1);
        assert!(out.contains("Bye!"));
    }

    #[test]
    fn run_edits_the_line_before_dispatch() {
        let mut sh = shell("upx\x08time\rexit\r");
        sh.run().unwrap();
        assert!(sh.console().output().contains("up 0 days 00:01:01"));
    }

    #[test]
    fn cpdisk_reads_confirmation_from_the_console() {
        let size = 2 * CHUNK_BYTES as u64;
        let src = Arc::new(RamDisk::patterned(512));
        let dst = Arc::new(RamDisk::new(512));

        let mut emu = FakeEmulator::default();
        emu.drives.mount(0, src.clone(), size, "src", false).unwrap();
        emu.drives.mount(1, dst.clone(), size, "dst", false).unwrap();

        let mut sh = Shell::new(MemoryConsole::new("cpdisk sd0 sd1\rYquit\r"), emu);
        sh.run().unwrap();

        assert_eq!(
            dst.ops(),
            [
                Op::Write { start: 0, count: 256 },
                Op::Write { start: 256, count: 256 }
            ]
        );
        let out = sh.console().output();
        assert!(out.contains("Copy completed"));
        assert!(out.contains("Bye!"));
    }

    #[test]
    fn cpdisk_on_unmounted_drives_fails() {
        let mut sh = shell("Y");
        let d = sh.dispatch("cpdisk 0 1").unwrap();
        assert_eq!(d, Dispatch::done(Outcome::Failure));
        assert!(sh.console().output().contains("SRC disk 0 is not mounted"));
    }
}
