//! 两个入口共用的服务装配

use std::sync::Arc;

use ecom_bootstrap::{BootstrapError, Infrastructure};
use ecom_common::RequestContext;
use ecom_config::AppConfig;
use tracing::info;

use crate::MIGRATOR;
use crate::application::CatalogService;
use crate::infrastructure::persistence::PostgresStorer;

/// 执行迁移并创建业务服务；配置了管理员账号时确保它存在
pub async fn catalog_service(infra: &Infrastructure) -> Result<Arc<CatalogService>, BootstrapError> {
    infra.run_migrations(&MIGRATOR).await?;

    let config: &AppConfig = infra.config();
    let store = Arc::new(PostgresStorer::new(infra.postgres_pool()));
    let service = CatalogService::new(
        store,
        infra.token_service(),
        config.catalog.max_page_size,
    );
    info!(max_page_size = service.max_page_size(), "Catalog service initialized");

    if let Some((email, password)) = config.catalog.admin_credentials() {
        let ctx = RequestContext::with_timeout(config.server.request_timeout());
        service.ensure_admin(&ctx, email, password).await?;
    }

    Ok(Arc::new(service))
}
