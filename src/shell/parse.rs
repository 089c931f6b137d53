use crate::{
    config::{MAX_ARGS, MAX_ARG_LENGTH},
    error::{EmuError, Result},
};

const DELIMITERS: [char; 3] = [' ', '\r', '\0'];

/// 参数向量：`argv[0]` 是命令名，之后最多 `MAX_ARGS` 个参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    argv: Vec<String>,
}

impl Args {
    pub fn name(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or("")
    }

    /// 参数个数，不含命令名
    pub fn argc(&self) -> usize {
        self.argv.len().saturating_sub(1)
    }

    /// 第 `n` 个参数（从 1 开始，与 argv 下标一致）
    pub fn get(&self, n: usize) -> Option<&str> {
        if n == 0 {
            return None;
        }
        self.argv.get(n).map(String::as_str)
    }

    #[cfg(test)]
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.argv.is_empty()
    }
}

pub fn tokenize(line: &str) -> Result<Args> {
    tokenize_reserving(line, line.len())
}

/// 先为副本预留 `reserve` 字节再切分，预留失败时返回 [`EmuError::Allocation`]
pub fn tokenize_reserving(line: &str, reserve: usize) -> Result<Args> {
    // 在副本上切分，原始命令行保持不变
    let mut copy = String::new();
    copy.try_reserve_exact(reserve.max(line.len()))
        .map_err(|_| EmuError::Allocation)?;
    copy.push_str(line);

    let argv = copy
        .split(&DELIMITERS[..])
        .filter(|token| !token.is_empty())
        .take(MAX_ARGS + 1)
        .map(|token| token.chars().take(MAX_ARG_LENGTH - 1).collect::<String>())
        .collect();

    Ok(Args { argv })
}
