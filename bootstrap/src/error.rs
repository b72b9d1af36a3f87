//! 启动期错误

use ecom_auth_core::TokenConfigError;
use ecom_config::ConfigError;
use ecom_errors::AppError;
use thiserror::Error;

/// 启动失败的原因；都会导致进程退出
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Token(#[from] TokenConfigError),

    #[error("Infrastructure error: {0}")]
    Infrastructure(#[from] AppError),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("gRPC server error: {0}")]
    Transport(#[from] tonic::transport::Error),
}
