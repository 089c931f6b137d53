use std::io;

#[cfg(test)]
pub mod memory;
pub mod terminal;

pub use terminal::TerminalConsole;

pub const ETX: u8 = 0x03; // Ctrl-C
pub const BEL: u8 = 0x07;
pub const BS: u8 = 0x08;
pub const LF: u8 = 0x0A;
pub const CR: u8 = 0x0D;
pub const SPACE: u8 = 0x20;
pub const DEL: u8 = 0x7F;

/// 串口控制台：逐字节阻塞读取，输出走 `io::Write`
pub trait Console: io::Write {
    /// 读取一个字节；输入关闭时返回 `None`
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}
