//! HTTP 适配器（axum）
//!
//! 读接口和注册、登录公开；商品写接口需要 `Authorization: Bearer <token>`。

pub mod dto;
mod error;
mod extract;
mod handlers;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::application::CatalogService;

pub use error::{ApiError, PROBLEM_JSON};
pub use middleware::{AuthClaims, MaybeClaims, auth_middleware};

/// 请求体大小上限
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CatalogService>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(service: Arc<CatalogService>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }
}

/// 构建 `/api/v1` 路由
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/v1/products", post(handlers::create_product))
        .route(
            "/api/v1/products/{id}",
            put(handlers::update_product).delete(handlers::delete_product),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/api/v1/products", get(handlers::list_products))
        .route("/api/v1/products/{id}", get(handlers::get_product))
        .route("/api/v1/users", post(handlers::register_user))
        .route("/api/v1/auth/login", post(handlers::login))
        .merge(protected)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
