//! 应用层
//!
//! 与传输无关的业务操作；HTTP 和 gRPC 适配器都只调用这里。

mod commands;
mod service;

pub use commands::*;
pub use service::*;
