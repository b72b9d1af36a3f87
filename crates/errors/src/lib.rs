//! ecom-errors - 统一错误处理
//!
//! 错误分类在存储层、业务层和传输层之间共享；只有传输适配器会把它翻译成
//! HTTP 状态码或 gRPC 状态码。问题详情格式基于 RFC 7807。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid input for field `{field}`: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Request cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// 错误类别，供调用方分支判断（不关心消息内容）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Forbidden,
    Unauthorized,
    Unavailable,
    InvalidInput,
    Cancelled,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Forbidden => "forbidden",
            Self::Unauthorized => "unauthorized",
            Self::Unavailable => "unavailable",
            Self::InvalidInput => "invalid_input",
            Self::Cancelled => "cancelled",
            Self::Internal => "internal",
        }
    }
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn invalid_input(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: msg.into(),
        }
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// 出错字段（仅 InvalidInput 有）
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }

    /// 是否值得在传输边界重试一次
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Forbidden(_) => 403,
            Self::Unauthorized(_) => 401,
            Self::Unavailable(_) => 503,
            Self::InvalidInput { .. } => 400,
            // nginx 约定的 "client closed request"
            Self::Cancelled(_) => 499,
            Self::Internal(_) => 500,
        }
    }

    /// 转换为 gRPC 状态码
    pub fn grpc_code(&self) -> tonic::Code {
        match self {
            Self::NotFound(_) => tonic::Code::NotFound,
            Self::Conflict(_) => tonic::Code::AlreadyExists,
            Self::Forbidden(_) => tonic::Code::PermissionDenied,
            Self::Unauthorized(_) => tonic::Code::Unauthenticated,
            Self::Unavailable(_) => tonic::Code::Unavailable,
            Self::InvalidInput { .. } => tonic::Code::InvalidArgument,
            Self::Cancelled(_) => tonic::Code::Cancelled,
            Self::Internal(_) => tonic::Code::Internal,
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: format!("https://api.ecom.dev/problems/{}", self.problem_slug()),
            title: self.problem_title().to_string(),
            status: self.status_code(),
            detail: self.public_detail(),
            field: self.field().map(str::to_string),
            instance: None,
        }
    }

    fn problem_slug(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not-found",
            Self::Conflict(_) => "conflict",
            Self::Forbidden(_) => "forbidden",
            Self::Unauthorized(_) => "unauthorized",
            Self::Unavailable(_) => "unavailable",
            Self::InvalidInput { .. } => "invalid-input",
            Self::Cancelled(_) => "cancelled",
            Self::Internal(_) => "internal",
        }
    }

    fn problem_title(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Resource Not Found",
            Self::Conflict(_) => "Conflict",
            Self::Forbidden(_) => "Forbidden",
            Self::Unauthorized(_) => "Unauthorized",
            Self::Unavailable(_) => "Service Unavailable",
            Self::InvalidInput { .. } => "Invalid Input",
            Self::Cancelled(_) => "Request Cancelled",
            Self::Internal(_) => "Internal Server Error",
        }
    }

    /// 对外可见的错误描述；内部错误不暴露细节
    pub fn public_detail(&self) -> String {
        match self {
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<AppError> for tonic::Status {
    fn from(err: AppError) -> Self {
        tonic::Status::new(err.grpc_code(), err.public_detail())
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    /// 校验失败的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_and_grpc_codes_agree() {
        let cases = [
            (AppError::not_found("x"), 404, tonic::Code::NotFound),
            (AppError::forbidden("x"), 403, tonic::Code::PermissionDenied),
            (AppError::unauthorized("x"), 401, tonic::Code::Unauthenticated),
            (AppError::conflict("x"), 409, tonic::Code::AlreadyExists),
            (AppError::unavailable("x"), 503, tonic::Code::Unavailable),
            (AppError::invalid_input("price", "x"), 400, tonic::Code::InvalidArgument),
            (AppError::cancelled("x"), 499, tonic::Code::Cancelled),
            (AppError::internal("x"), 500, tonic::Code::Internal),
        ];

        for (err, http, grpc) in cases {
            assert_eq!(err.status_code(), http, "{err:?}");
            assert_eq!(err.grpc_code(), grpc, "{err:?}");
        }
    }

    #[test]
    fn test_problem_details_carries_field() {
        let problem = AppError::invalid_input("price", "must not be negative").to_problem_details();
        assert_eq!(problem.status, 400);
        assert_eq!(problem.field.as_deref(), Some("price"));
        assert!(problem.detail.contains("must not be negative"));

        let json = serde_json::to_value(&problem).unwrap();
        assert!(json.get("instance").is_none());
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = AppError::internal("connection string postgres://secret");
        assert!(!err.to_problem_details().detail.contains("secret"));

        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::Internal);
        assert!(!status.message().contains("secret"));
    }

    #[test]
    fn test_only_unavailable_is_retryable() {
        assert!(AppError::unavailable("pool timed out").is_retryable());
        assert!(!AppError::not_found("product 1").is_retryable());
        assert!(!AppError::internal("boom").is_retryable());
    }
}
