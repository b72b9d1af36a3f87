//! ecom-adapter-postgres - PostgreSQL 适配器
//!
//! 连接池管理和 sqlx 错误到统一错误分类的映射。具体表结构由各服务自己维护。

mod connection;
mod error;

pub use connection::*;
pub use error::*;
