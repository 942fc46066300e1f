//! 启动配置
//!
//! 配置文件是三行纯文本：账户名、密钥、数据库名。
//! 账户名用于 SSH 隧道与数据库登录，密钥只用于数据库登录；
//! 隧道的认证由 ssh 自己在终端上完成。

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Result, TrackerError};

const CONFIG_LAYOUT_HINT: &str =
    "Make sure it exists and has 3 lines:\nusername\npassword\ndbname";

#[derive(Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub account: String,
    pub secret: String,
    pub database: String,
}

// 避免密钥出现在日志中
impl fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("account", &self.account)
            .field("secret", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl TrackerConfig {
    /// 读取并解析配置文件
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TrackerError::config(format!(
                "Could not read {}: {}.\n{}",
                path.display(),
                e,
                CONFIG_LAYOUT_HINT
            ))
        })?;
        let config = Self::parse(&content).map_err(|_| {
            TrackerError::config(format!(
                "Could not read {}.\n{}",
                path.display(),
                CONFIG_LAYOUT_HINT
            ))
        })?;
        log::debug!("已加载配置文件: {}", path.display());
        Ok(config)
    }

    /// 解析三行配置内容，每行去除首尾空白，多余的行被忽略
    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines().map(str::trim);
        let mut next = || {
            lines
                .next()
                .map(str::to_string)
                .ok_or_else(|| TrackerError::config(CONFIG_LAYOUT_HINT))
        };

        Ok(Self {
            account: next()?,
            secret: next()?,
            database: next()?,
        })
    }
}
