//! 统一错误类型
//!
//! 所有数据库错误在服务层被转换为用户可读的消息；
//! 违反唯一约束的错误通过 [`DbErr::sql_err`] 识别，而不是匹配错误文本。

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// 整个应用使用的 Result 别名
pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// 配置文件缺失或格式错误
    #[error("Config error: {0}")]
    Config(String),

    /// SSH 隧道启动失败
    #[error("Tunnel error: {0}")]
    Tunnel(String),

    /// 无法连接数据库
    #[error("Connection failed: {0}")]
    Connection(String),

    /// 输入校验失败（消息直接展示给用户）
    #[error("{0}")]
    Validation(String),

    #[error("Invalid username or password.")]
    InvalidCredentials,

    /// 违反唯一约束等冲突
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// 合集中没有游戏
    #[error("The collection '{0}' has no games in it.")]
    EmptyCollection(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn tunnel(msg: impl Into<String>) -> Self {
        Self::Tunnel(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// 是否为用户可以直接修正的错误（输入、冲突、不存在）
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidCredentials
                | Self::Conflict(_)
                | Self::NotFound(_)
                | Self::EmptyCollection(_)
        )
    }
}

/// 将唯一约束冲突转换为友好提示，其它错误原样保留
pub(crate) fn on_unique_violation(err: DbErr, message: impl Into<String>) -> TrackerError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            log::debug!("唯一约束冲突: {}", detail);
            TrackerError::Conflict(message.into())
        }
        _ => TrackerError::Database(err),
    }
}

/// 将外键约束冲突转换为“不存在”提示
pub(crate) fn on_foreign_key_violation(err: DbErr, message: impl Into<String>) -> TrackerError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            log::debug!("外键约束冲突: {}", detail);
            TrackerError::NotFound(message.into())
        }
        _ => TrackerError::Database(err),
    }
}
