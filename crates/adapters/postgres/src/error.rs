//! sqlx 错误映射
//!
//! 存储层只返回统一错误分类，驱动错误不会泄漏到业务层。

use ecom_common::is_retryable_error;
use ecom_errors::AppError;
use tracing::{error, warn};

// PostgreSQL 错误码
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const NOT_NULL_VIOLATION: &str = "23502";

/// 判断 sqlx 错误是否属于暂时性故障
pub fn is_sqlx_retryable(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Io(_) => true,
        sqlx::Error::Tls(_) => true,
        sqlx::Error::PoolTimedOut => true,
        sqlx::Error::PoolClosed => true,
        sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db_err) => {
            // 40001: serialization_failure
            // 40P01: deadlock_detected
            // 57P01..57P03: 服务端关闭或未就绪
            // 08xxx: connection_exception
            if let Some(code) = db_err.code() {
                let code = code.as_ref();
                matches!(code, "40001" | "40P01" | "57P01" | "57P02" | "57P03")
                    || code.starts_with("08")
            } else {
                is_retryable_error(db_err.message())
            }
        }
        _ => false,
    }
}

/// 把 sqlx 错误映射为统一错误
///
/// `entity` 用于拼接面向调用方的描述，例如 "product 42"。驱动原文只写日志，
/// 返回给调用方的都是固定文本。
pub fn map_sqlx_error(err: sqlx::Error, entity: &str) -> AppError {
    if let sqlx::Error::RowNotFound = err {
        return AppError::not_found(format!("{entity} not found"));
    }

    if is_sqlx_retryable(&err) {
        warn!(error = %err, entity, "Database unavailable");
        return AppError::unavailable("database unavailable");
    }

    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                return AppError::conflict(format!("{entity} already exists"));
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return AppError::conflict(format!("{entity} references a missing record"));
            }
            Some(CHECK_VIOLATION) | Some(NOT_NULL_VIOLATION) => {
                let field = db_err.constraint().unwrap_or("input").to_string();
                warn!(error = %err, entity, field = %field, "Database constraint violated");
                return AppError::invalid_input(field, "violates a storage constraint");
            }
            _ => {}
        }
    }

    error!(error = %err, entity, "Unexpected database error");
    AppError::internal(format!("Database error: {}", err))
}
