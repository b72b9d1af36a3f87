//! ecom-telemetry - 可观测性库
//!
//! 组件只通过 `tracing` 宏写日志，从不持有全局日志句柄。二进制入口在启动时
//! 安装订阅者；测试可以用 [`tracing::subscriber::set_default`] 装一个局部的
//! 订阅者来捕获或丢弃日志。

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// 初始化 tracing
pub fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(log_level))
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// 构造写入指定 writer 的订阅者，不安装为全局默认
pub fn subscriber_with_writer<W>(log_level: &str, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
}

/// 初始化 Prometheus metrics
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// 记录一次传输层请求结果
pub fn record_request(transport: &'static str, operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        "ecom_requests_total",
        "transport" => transport,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
