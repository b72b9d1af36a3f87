//! 业务操作的输入和输出

use chrono::{DateTime, Utc};
use ecom_auth_core::Role;

use crate::domain::entities::User;

/// 注册用户
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub name: String,
    pub email: String,
    pub password: String,
    /// 不指定时为普通用户
    pub role: Option<Role>,
}

/// 登录
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// 登录成功后的会话
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}
