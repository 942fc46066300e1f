pub mod crypto;
pub mod format;
pub mod logs;
pub mod tunnel;
