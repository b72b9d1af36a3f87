//! 认证中间件和身份提取器

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use ecom_auth_core::{Claims, bearer_token};
use ecom_errors::{AppError, AppResult};
use tracing::{debug, warn};

use super::AppState;
use super::error::ApiError;

/// 解析 `Authorization` 头；没有该头时返回 None
fn claims_from_headers(state: &AppState, headers: &HeaderMap) -> AppResult<Option<Claims>> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let header = value
        .to_str()
        .map_err(|_| AppError::unauthorized("Malformed authorization header"))?;
    let token = bearer_token(header)?;
    state.service.verify_token(token).map(Some)
}

/// JWT 认证中间件
///
/// 验证请求中的 JWT token 并将 claims 注入到请求扩展中
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match claims_from_headers(&state, request.headers()) {
        Ok(Some(claims)) => {
            debug!(user_id = %claims.sub, role = %claims.role, "Token validated");
            request.extensions_mut().insert(claims);
            Ok(next.run(request).await)
        }
        Ok(None) => {
            warn!(path = %request.uri().path(), "Missing authorization header");
            Err(ApiError(AppError::unauthorized("Missing authorization header")))
        }
        Err(e) => {
            warn!(error = %e, "Token validation failed");
            Err(ApiError(e))
        }
    }
}

/// 认证 Claims 提取器
///
/// 用于从请求中获取已验证的 Claims，应该在 auth_middleware 之后使用
pub struct AuthClaims(pub Claims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthClaims)
            .ok_or_else(|| ApiError(AppError::unauthorized("Missing authentication")))
    }
}

/// 可选身份：未携带令牌时为 None，携带了无效令牌则拒绝
pub struct MaybeClaims(pub Option<Claims>);

impl FromRequestParts<AppState> for MaybeClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        claims_from_headers(state, &parts.headers)
            .map(MaybeClaims)
            .map_err(ApiError)
    }
}
