//! 传输层公共逻辑
//!
//! HTTP 和 gRPC 适配器共用这里的请求上下文构造、只读重试、指标记录和价格
//! 转换，保证两种协议对同一请求给出相同结果。

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use ecom_auth_core::Role;
use ecom_common::{RequestContext, RetryConfig, with_conditional_retry};
use ecom_errors::{AppError, AppResult, ErrorKind};
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

/// 只读操作重试前的等待时间
pub const READ_RETRY_DELAY: Duration = Duration::from_millis(50);

/// 为一次入站请求创建上下文
pub fn request_context(timeout: Duration, request_id: Option<&str>) -> RequestContext {
    let ctx = RequestContext::with_timeout(timeout);
    match request_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => ctx.with_request_id(id),
        None => ctx,
    }
}

/// 执行只读操作，`Unavailable` 时再试一次
///
/// 写操作不能走这里。
pub async fn read_with_retry<T, F, Fut>(operation: &'static str, op: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    with_conditional_retry(
        &RetryConfig::once(READ_RETRY_DELAY),
        operation,
        op,
        AppError::is_retryable,
    )
    .await
}

/// 记录请求结果（指标 + 日志）
pub fn observe<T>(transport: &'static str, operation: &'static str, result: &AppResult<T>) {
    let err = match result {
        Ok(_) => {
            ecom_telemetry::record_request(transport, operation, "ok");
            return;
        }
        Err(err) => err,
    };

    ecom_telemetry::record_request(transport, operation, err.kind().as_str());
    match err.kind() {
        ErrorKind::Internal => error!(transport, operation, error = %err, "Request failed"),
        ErrorKind::Unavailable | ErrorKind::Cancelled => {
            warn!(transport, operation, error = %err, "Request failed")
        }
        _ => debug!(transport, operation, error = %err, "Request rejected"),
    }
}

/// 线上价格（浮点）转为十进制
///
/// 先按最短十进制表示转字符串，避免二进制误差（9.99 不会变成 9.9900000000000002）。
pub fn price_from_wire(value: f64) -> AppResult<Decimal> {
    if !value.is_finite() {
        return Err(AppError::invalid_input("price", "must be a finite number"));
    }
    Decimal::from_str(&value.to_string())
        .map_err(|_| AppError::invalid_input("price", format!("{value} is out of range")))
}

/// 十进制价格转为线上浮点，与 [`price_from_wire`] 对称
pub fn price_to_wire(value: Decimal) -> f64 {
    value.normalize().to_string().parse().unwrap_or_default()
}

/// 解析可选角色；空字符串视为未指定
pub fn parse_role(raw: Option<&str>) -> AppResult<Option<Role>> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(role) => Role::from_str(role).map(Some),
        None => Ok(None),
    }
}
