//! ecom-api - 商品目录 HTTP 入口

use ecom_bootstrap::{Infrastructure, run_http};
use ecom_catalog::api::http::{AppState, router};
use ecom_catalog::startup::catalog_service;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_http("config", |infra: Infrastructure| async move {
        info!("Initializing catalog HTTP API...");

        let service = catalog_service(&infra).await?;
        let state = AppState::new(service, infra.config().server.request_timeout());

        Ok(router(state))
    })
    .await?;

    Ok(())
}
