//! ecom-bootstrap - 统一服务启动骨架
//!
//! HTTP 和 gRPC 两个入口复用的启动逻辑

mod error;
mod health;
mod infrastructure;
mod runtime;
mod starter;

pub use error::*;
pub use health::*;
pub use infrastructure::*;
pub use runtime::*;
pub use starter::*;
