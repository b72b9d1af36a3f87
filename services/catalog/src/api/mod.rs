//! 传输层适配器
//!
//! 只做协议编解码和错误映射，业务逻辑全部在 `application` 中。

pub mod edge;
pub mod grpc;
pub mod http;
