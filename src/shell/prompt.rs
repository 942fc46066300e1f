//! 交互式输入
//!
//! 读取一行输入；输入流结束时返回 `None`，调用方据此退出。

use std::io::Write;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::error::Result;

pub struct Prompter<R> {
    lines: Lines<R>,
    hide_secrets: bool,
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            hide_secrets: false,
        }
    }

    /// 密码字段改为从终端读取且不回显
    pub fn hide_secrets(mut self) -> Self {
        self.hide_secrets = true;
        self
    }

    /// 显示提示并读取一行（已去除首尾空白）
    pub async fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        let _ = std::io::stdout().flush();
        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim().to_string()))
    }

    /// 表单字段，空输入返回空字符串
    pub async fn field(&mut self, label: &str) -> Result<Option<String>> {
        self.read_line(&format!("  {}: ", label)).await
    }

    /// 密码字段，保留首尾空白，只去掉换行符
    pub async fn secret(&mut self, label: &str) -> Result<Option<String>> {
        let prompt = format!("  {}: ", label);
        if !self.hide_secrets {
            print!("{}", prompt);
            let _ = std::io::stdout().flush();
            return Ok(self.lines.next_line().await?);
        }

        let read = tokio::task::spawn_blocking(move || rpassword::prompt_password(prompt))
            .await
            .map_err(std::io::Error::other)?;
        match read {
            Ok(secret) => Ok(Some(secret)),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 必填字段，空输入时重复询问
    pub async fn required(&mut self, label: &str) -> Result<Option<String>> {
        loop {
            match self.field(label).await? {
                None => return Ok(None),
                Some(value) if value.is_empty() => {
                    println!(
                        "    {}",
                        "This field is required.".if_supports_color(Stdout, |t| t.yellow()),
                    );
                }
                Some(value) => return Ok(Some(value)),
            }
        }
    }

    /// 数字字段，无法解析时重复询问
    pub async fn number<T: std::str::FromStr>(&mut self, label: &str) -> Result<Option<T>> {
        loop {
            let Some(value) = self.required(label).await? else {
                return Ok(None);
            };
            match value.parse::<T>() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => println!(
                    "    {}",
                    "Please enter a number.".if_supports_color(Stdout, |t| t.yellow()),
                ),
            }
        }
    }

    /// 若命令已带参数则直接使用，否则询问
    pub async fn number_or<T: std::str::FromStr>(
        &mut self,
        given: Option<T>,
        label: &str,
    ) -> Result<Option<T>> {
        match given {
            Some(value) => Ok(Some(value)),
            None => self.number(label).await,
        }
    }

    /// 是/否确认，默认否
    pub async fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self
            .read_line(&format!(
                "{} {} ",
                question.if_supports_color(Stdout, |t| t.yellow()),
                "[y/N]".if_supports_color(Stdout, |t| t.dimmed()),
            ))
            .await?;
        Ok(is_yes(answer.as_deref().unwrap_or("")))
    }
}

pub(crate) fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
