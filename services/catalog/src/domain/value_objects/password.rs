//! 密码哈希
//!
//! 明文密码只在注册和登录的调用栈里出现，落库的永远是 Argon2 PHC 字符串。

use std::fmt;
use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use ecom_errors::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// 哈希后的密码
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// 校验长度后用 Argon2 哈希明文密码
    pub fn from_plain(plain_password: &str) -> Result<Self, PasswordError> {
        let len = plain_password.chars().count();
        if len < MIN_PASSWORD_LEN {
            return Err(PasswordError::TooShort(MIN_PASSWORD_LEN));
        }
        if len > MAX_PASSWORD_LEN {
            return Err(PasswordError::TooLong(MAX_PASSWORD_LEN));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
            .to_string();

        Ok(Self(password_hash))
    }

    /// 验证明文密码是否匹配；哈希无法解析时视为不匹配
    pub fn verify(&self, plain_password: &str) -> bool {
        match PasswordHash::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// 从已有的哈希字符串创建
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// 获取字符串引用
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 邮箱不存在时用于比对的固定哈希，使两条失败路径耗时相近
    pub fn dummy() -> &'static HashedPassword {
        static DUMMY: LazyLock<HashedPassword> = LazyLock::new(|| {
            HashedPassword::from_plain("dummy-password-for-timing")
                .unwrap_or_else(|_| HashedPassword::from_hash(String::new()))
        });
        &DUMMY
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([REDACTED])")
    }
}

impl fmt::Display for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

/// Password 错误
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password is too short (minimum {0} characters)")]
    TooShort(usize),

    #[error("Password is too long (maximum {0} characters)")]
    TooLong(usize),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::HashingFailed(_) => AppError::internal(err.to_string()),
            _ => AppError::invalid_input("password", err.to_string()),
        }
    }
}
