//! 服务启动器
//!
//! 两个入口共用的启动流程：
//! 1. 加载配置
//! 2. 初始化运行时（日志）
//! 3. 安装 Prometheus recorder
//! 4. 创建基础设施资源（令牌服务、带重试的连接池）
//! 5. 调用方构建业务路由或 gRPC 服务
//! 6. 监听并处理 graceful shutdown

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use ecom_config::AppConfig;
use ecom_telemetry::init_metrics;
use tonic::transport::Server;
use tracing::{error, info};

use crate::health::{HealthState, health_routes};
use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};
use crate::BootstrapError;

/// gRPC 入口的健康检查端口偏移（gRPC 端口 + 1000）
pub const HEALTH_PORT_OFFSET: u16 = 1000;

async fn prepare(config_dir: &str) -> Result<(Infrastructure, HealthState), BootstrapError> {
    let config = AppConfig::load(config_dir)?;
    init_runtime(&config);
    info!("Starting {} service", config.app_name);

    let metrics = init_metrics()?;
    let infra = Infrastructure::from_config(config).await?;
    let health = HealthState::new(Some(infra.postgres_pool()), Some(metrics));
    Ok((infra, health))
}

/// 运行 HTTP 服务
///
/// 健康检查路由和业务路由挂在同一个监听地址上。
pub async fn run_http<F, Fut>(config_dir: &str, router_builder: F) -> Result<(), BootstrapError>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = Result<Router, BootstrapError>>,
{
    let (infra, health) = prepare(config_dir).await?;
    let addr = infra.config().server.http_socket_addr()?;

    let app = router_builder(infra).await?.merge(health_routes(health));
    serve_http(addr, app).await?;

    info!("Service stopped");
    Ok(())
}

/// 运行 gRPC 服务
///
/// 健康检查 HTTP 服务监听在 gRPC 端口 + 1000。
pub async fn run_grpc<F, Fut, S>(config_dir: &str, service_builder: F) -> Result<(), BootstrapError>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = Result<S, BootstrapError>>,
    S: tonic::codegen::Service<
            http::Request<tonic::body::Body>,
            Response = http::Response<tonic::body::Body>,
            Error = Infallible,
        > + tonic::server::NamedService
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    let (infra, health) = prepare(config_dir).await?;
    let addr = infra.config().server.grpc_socket_addr()?;
    let health_addr = health_addr_for(addr);

    let health_handle = tokio::spawn(async move {
        if let Err(e) = serve_http(health_addr, health_routes(health)).await {
            error!(error = %e, "Health server error");
        }
    });

    let service = service_builder(infra).await?;
    info!(%addr, "gRPC server starting");

    Server::builder()
        .add_service(service)
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    health_handle.abort();
    info!("Service stopped");
    Ok(())
}

/// 在指定地址上提供 HTTP 服务，直到收到关闭信号
pub async fn serve_http(addr: SocketAddr, app: Router) -> Result<(), BootstrapError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// gRPC 入口的健康检查地址
pub fn health_addr_for(grpc_addr: SocketAddr) -> SocketAddr {
    SocketAddr::new(
        grpc_addr.ip(),
        grpc_addr.port().saturating_add(HEALTH_PORT_OFFSET),
    )
}
