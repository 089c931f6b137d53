use std::io::{self, IsTerminal, Read, Stdin, Stdout, Write};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};

use crate::console::{Console, BS, CR, DEL, ETX, LF};

/// 宿主终端控制台：TTY 用 raw 模式逐键读取，管道和脚本输入逐字节读取
pub struct TerminalConsole {
    raw: bool,
    stdin: Stdin,
    stdout: Stdout,
}

impl TerminalConsole {
    pub fn new() -> io::Result<Self> {
        let raw = io::stdin().is_terminal();
        if raw {
            terminal::enable_raw_mode()?;
        }
        Ok(Self {
            raw,
            stdin: io::stdin(),
            stdout: io::stdout(),
        })
    }

    pub fn is_interactive(&self) -> bool {
        self.raw
    }

    fn read_key(&mut self) -> io::Result<Option<u8>> {
        loop {
            let Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) = event::read()?
            else {
                continue;
            };
            if kind == KeyEventKind::Release {
                continue;
            }

            let byte = match code {
                KeyCode::Enter => CR,
                KeyCode::Backspace => BS,
                KeyCode::Delete => DEL,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => ETX,
                KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(None),
                KeyCode::Char(c) if c.is_ascii() => c as u8,
                _ => continue,
            };
            return Ok(Some(byte));
        }
    }
}

impl Drop for TerminalConsole {
    fn drop(&mut self) {
        if self.raw {
            let _ = terminal::disable_raw_mode();
        }
    }
}

impl Console for TerminalConsole {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.stdout.flush()?;
        if self.raw {
            return self.read_key();
        }

        let mut byte = [0u8; 1];
        match self.stdin.read(&mut byte)? {
            0 => Ok(None),
            // 管道输入按行结束，统一成回车
            _ if byte[0] == LF => Ok(Some(CR)),
            _ => Ok(Some(byte[0])),
        }
    }
}

impl Write for TerminalConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.raw {
            return self.stdout.write(buf);
        }

        // raw 模式下换行不会回到行首
        for chunk in buf.split_inclusive(|&b| b == LF) {
            match chunk.strip_suffix(&[LF]) {
                Some(line) => {
                    self.stdout.write_all(line)?;
                    self.stdout.write_all(b"\r\n")?;
                }
                None => self.stdout.write_all(chunk)?,
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}
