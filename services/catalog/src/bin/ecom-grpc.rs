//! ecom-grpc - 商品目录 gRPC 入口

use ecom_bootstrap::{Infrastructure, run_grpc};
use ecom_catalog::api::grpc::{CatalogGrpcService, CatalogServer};
use ecom_catalog::startup::catalog_service;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_grpc("config", |infra: Infrastructure| async move {
        info!("Initializing catalog gRPC service...");

        let service = catalog_service(&infra).await?;
        let grpc = CatalogGrpcService::new(service, infra.config().server.request_timeout());

        Ok(CatalogServer::new(grpc))
    })
    .await?;

    Ok(())
}
