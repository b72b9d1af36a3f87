//! 基础设施资源管理
//!
//! 进程级共享资源：配置、PostgreSQL 连接池和令牌服务。

use std::sync::Arc;
use std::time::Duration;

use ecom_adapter_postgres::{PostgresConfig, create_pool_with_retry};
use ecom_auth_core::{TokenConfigError, TokenService};
use ecom_common::RetryConfig;
use ecom_config::{AppConfig, DatabaseConfig, JwtConfig};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use crate::BootstrapError;

/// 基础设施资源容器
#[derive(Clone)]
pub struct Infrastructure {
    config: Arc<AppConfig>,
    postgres_pool: PgPool,
    token_service: Arc<TokenService>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    ///
    /// 令牌服务先于连接池创建：密钥不合法时不必等待数据库重试。
    pub async fn from_config(config: AppConfig) -> Result<Self, BootstrapError> {
        let token_service = token_service_from_config(&config.jwt)?;

        // 数据库容器可能比服务晚启动
        let retry = RetryConfig::new(5, Duration::from_millis(500), Duration::from_secs(5));
        let postgres_pool =
            create_pool_with_retry(&postgres_config(&config.database), &retry).await?;

        Ok(Self::new(config, postgres_pool, token_service))
    }

    pub fn new(config: AppConfig, postgres_pool: PgPool, token_service: TokenService) -> Self {
        Self {
            config: Arc::new(config),
            postgres_pool,
            token_service: Arc::new(token_service),
        }
    }

    /// 按配置执行内嵌迁移
    pub async fn run_migrations(&self, migrator: &Migrator) -> Result<(), BootstrapError> {
        if !self.config.database.run_migrations {
            info!("Migrations disabled, skipping");
            return Ok(());
        }
        migrator.run(&self.postgres_pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// 获取应用配置
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取 PostgreSQL 连接池
    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    /// 获取 Token 服务
    pub fn token_service(&self) -> Arc<TokenService> {
        self.token_service.clone()
    }
}

/// 由数据库配置构造连接池配置
pub fn postgres_config(database: &DatabaseConfig) -> PostgresConfig {
    PostgresConfig::new(database.url())
        .with_max_connections(database.max_connections)
        .with_min_connections(database.min_connections)
        .with_acquire_timeout(database.acquire_timeout())
}

/// 由 JWT 配置构造令牌服务
pub fn token_service_from_config(jwt: &JwtConfig) -> Result<TokenService, TokenConfigError> {
    let expires_in = i64::try_from(jwt.expires_in).unwrap_or(i64::MAX);
    TokenService::new(
        jwt.secret.expose_secret(),
        expires_in,
        jwt.issuer.clone(),
        jwt.audience.clone(),
    )
}
