use std::{
    collections::VecDeque,
    io::{self, Write},
};

use crate::console::Console;

/// 测试用控制台：预置输入字节，收集全部输出
#[derive(Debug, Default)]
pub struct MemoryConsole {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl MemoryConsole {
    pub fn new(input: impl AsRef<[u8]>) -> Self {
        Self {
            input: input.as_ref().iter().copied().collect(),
            output: Vec::new(),
        }
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn raw_output(&self) -> &[u8] {
        &self.output
    }

    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for MemoryConsole {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.input.pop_front())
    }
}

impl Write for MemoryConsole {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
