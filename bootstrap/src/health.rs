//! 健康检查模块
//!
//! 提供 /health、/ready 和 /metrics 端点

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use ecom_adapter_postgres::{check_connection, pool_status};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use sqlx::PgPool;
use tracing::warn;

/// 健康检查状态
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub checks: Vec<ComponentHealth>,
}

/// 组件健康状态
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            checks: vec![],
        }
    }

    pub fn add_check(&mut self, check: ComponentHealth) {
        if check.status != "healthy" {
            self.status = "unhealthy".to_string();
        }
        self.checks.push(check);
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "healthy".to_string(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "unhealthy".to_string(),
            message: Some(message.into()),
        }
    }
}

/// 健康检查端点共享的状态
#[derive(Clone, Default)]
pub struct HealthState {
    pool: Option<PgPool>,
    metrics: Option<PrometheusHandle>,
}

impl HealthState {
    pub fn new(pool: Option<PgPool>, metrics: Option<PrometheusHandle>) -> Self {
        Self { pool, metrics }
    }

    /// 存活检查：进程在运行即可
    pub fn liveness(&self) -> HealthStatus {
        HealthStatus::healthy()
    }

    /// 就绪检查：数据库可以应答，附带连接池占用
    pub async fn readiness(&self) -> HealthStatus {
        let mut status = HealthStatus::healthy();
        let check = match &self.pool {
            Some(pool) => match check_connection(pool).await {
                Ok(()) => {
                    let pool = pool_status(pool);
                    ComponentHealth::healthy("postgres").with_message(format!(
                        "pool size={} idle={} active={}",
                        pool.size, pool.idle, pool.active
                    ))
                }
                Err(e) => {
                    warn!(error = %e, "Readiness check failed");
                    ComponentHealth::unhealthy("postgres", e.to_string())
                }
            },
            None => ComponentHealth::unhealthy("postgres", "Not initialized"),
        };
        status.add_check(check);
        status
    }
}

/// 健康检查路由，可合并进业务路由或单独监听
pub fn health_routes(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.liveness()))
}

async fn ready_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let status = state.readiness().await;
    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

async fn metrics_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let body = state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default();
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        body,
    )
}
