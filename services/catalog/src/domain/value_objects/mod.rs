//! 值对象模块

mod email;
mod ids;
mod password;

pub use email::{Email, EmailError};
pub use ids::{ProductId, UserId};
pub use password::{HashedPassword, PasswordError, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN};
