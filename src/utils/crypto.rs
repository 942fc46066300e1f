//! 密码哈希
//!
//! 存储格式为 `hex(salt):hex(hash)`，哈希算法为 PBKDF2-HMAC-SHA256，
//! 与外部数据库中已有账户的格式保持一致。

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;
const ROUNDS: u32 = 100_000;

fn derive(password: &str, salt: &[u8]) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, ROUNDS, &mut out);
    out
}

/// 使用随机盐对密码进行哈希
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    let hash = derive(password, &salt);
    format!("{}:{}", hex::encode(salt), hex::encode(hash))
}

/// 校验密码
///
/// 存储值格式不正确（缺少分隔符、非十六进制）时视为校验失败。
pub fn check_password(stored: &str, provided: &str) -> bool {
    let Some((salt_hex, hash_hex)) = stored.split_once(':') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(hash_hex)) else {
        return false;
    };

    let actual = derive(provided, &salt);
    constant_time_eq(&actual, &expected)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
