use std::io::{self, Write};

use crate::{
    config::SHELL_CMDBUF,
    console::{Console, BEL, BS, CR, DEL, ETX, SPACE},
    error::Result,
};

/// 一次按键处理后的状态
#[derive(Debug, PartialEq, Eq)]
pub enum Feed {
    Pending,
    Done(String),
    Cancelled,
}

/// 支持退格的行编辑器，回显始终与缓冲区一致，光标位置即 `buffer().len()`
#[derive(Debug)]
pub struct LineEditor {
    buf: String,
    cap: usize,
}

impl LineEditor {
    pub fn new() -> Self {
        // 留一个位置给结尾的 NUL
        Self::with_capacity(SHELL_CMDBUF - 1)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: String::with_capacity(cap),
            cap,
        }
    }

    #[cfg(test)]
    pub fn buffer(&self) -> &str {
        &self.buf
    }

    pub fn feed<W: Write + ?Sized>(&mut self, byte: u8, out: &mut W) -> io::Result<Feed> {
        match byte {
            CR => {
                out.write_all(b"\r\n")?;
                Ok(Feed::Done(std::mem::take(&mut self.buf)))
            }
            BS | DEL => {
                // 行首退格什么也不做
                if self.buf.pop().is_some() {
                    out.write_all(&[BS, SPACE, BS])?;
                }
                Ok(Feed::Pending)
            }
            ETX => {
                self.buf.clear();
                out.write_all(b"^C\r\n")?;
                Ok(Feed::Cancelled)
            }
            b if b == SPACE || b.is_ascii_graphic() => {
                if self.buf.len() >= self.cap {
                    out.write_all(&[BEL])?;
                } else {
                    self.buf.push(b as char);
                    out.write_all(&[b])?;
                }
                Ok(Feed::Pending)
            }
            _ => Ok(Feed::Pending),
        }
    }

    /// 读取一整行；输入关闭时返回 `None`，Ctrl-C 返回空行
    pub fn read_line<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<Option<String>> {
        loop {
            let Some(byte) = console.read_byte()? else {
                return Ok(None);
            };
            match self.feed(byte, console)? {
                Feed::Pending => continue,
                Feed::Done(line) => return Ok(Some(line)),
                Feed::Cancelled => return Ok(Some(String::new())),
            }
        }
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}
