use std::io::{self, BufRead, Write};

use crate::error::{AppError, AppResult};

/// 交互确认能力
pub trait Confirm {
    /// 向操作者提问，返回是否同意
    fn confirm(&mut self, message: &str) -> AppResult<bool>;
}

/// `y` / `yes`（不区分大小写）视为同意，其余一律拒绝
pub fn parse_answer(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

/// 基于行输入的确认，默认接标准输入输出
pub struct LineConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LineConfirm<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<R, W> {
    fn confirm(&mut self, message: &str) -> AppResult<bool> {
        write!(self.output, "  {} [y/N]: ", message).map_err(prompt_error)?;
        self.output.flush().map_err(prompt_error)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(prompt_error)?;
        if read == 0 {
            // EOF 等同于拒绝
            writeln!(self.output).map_err(prompt_error)?;
            return Ok(false);
        }
        Ok(parse_answer(&line))
    }
}

fn prompt_error(e: io::Error) -> AppError {
    AppError::Prompt {
        message: e.to_string(),
    }
}

/// `--yes` 时使用，总是同意
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, message: &str) -> AppResult<bool> {
        tracing::info!(%message, "auto-confirmed");
        Ok(true)
    }
}

/// 预先设定答案的确认器，答案用尽后返回默认值
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FixedAnswer {
    answers: std::collections::VecDeque<bool>,
    fallback: bool,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl FixedAnswer {
    pub fn always(answer: bool) -> Self {
        Self {
            answers: Default::default(),
            fallback: answer,
            asked: Vec::new(),
        }
    }

    pub fn sequence(answers: &[bool], fallback: bool) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            fallback,
            asked: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Confirm for FixedAnswer {
    fn confirm(&mut self, message: &str) -> AppResult<bool> {
        self.asked.push(message.to_string());
        Ok(self.answers.pop_front().unwrap_or(self.fallback))
    }
}
