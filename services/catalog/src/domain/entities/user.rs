//! 用户实体

use chrono::{DateTime, Utc};
use ecom_auth_core::Role;

use crate::domain::value_objects::{Email, HashedPassword, UserId};

/// 用户
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn verify_password(&self, plain_password: &str) -> bool {
        self.password_hash.verify(plain_password)
    }
}

/// 待创建的用户，密码已经哈希
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub role: Role,
}

impl NewUser {
    pub fn into_user(self, id: UserId, now: DateTime<Utc>) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            created_at: now,
        }
    }
}
