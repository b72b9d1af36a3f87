//! HTTP handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use ecom_common::RequestContext;
use ecom_errors::AppResult;

use crate::api::edge;

use super::AppState;
use super::dto::{
    CreateProductRequest, ListProductsQuery, LoginRequest, LoginResponse, ProductDto,
    ProductPageDto, RegisterUserRequest, UpdateProductRequest, UserDto,
};
use super::error::ApiError;
use super::extract::{JsonBody, ProductPath, QueryParams};
use super::middleware::{AuthClaims, MaybeClaims};

const TRANSPORT: &str = "http";

fn context(state: &AppState, headers: &HeaderMap) -> RequestContext {
    let request_id = headers.get("x-request-id").and_then(|v| v.to_str().ok());
    edge::request_context(state.request_timeout, request_id)
}

fn respond<T>(operation: &'static str, result: AppResult<T>) -> Result<T, ApiError> {
    edge::observe(TRANSPORT, operation, &result);
    result.map_err(ApiError)
}

pub async fn create_product(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    headers: HeaderMap,
    JsonBody(body): JsonBody<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let ctx = context(&state, &headers);

    let result: AppResult<_> = async {
        let product = body.into_new_product()?;
        tracing::debug!(user_id = %claims.sub, "POST /products");
        state.service.create_product(&ctx, product).await
    }
    .await;

    let product = respond("create_product", result)?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

pub async fn get_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    ProductPath(id): ProductPath,
) -> Result<Json<ProductDto>, ApiError> {
    let ctx = context(&state, &headers);

    let result =
        edge::read_with_retry("get_product", || state.service.get_product(&ctx, id)).await;

    let product = respond("get_product", result)?;
    Ok(Json(product.into()))
}

pub async fn list_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    QueryParams(query): QueryParams<ListProductsQuery>,
) -> Result<Json<ProductPageDto>, ApiError> {
    let ctx = context(&state, &headers);
    let (filter, pagination) = query.into_parts();

    let result = edge::read_with_retry("list_products", || {
        state
            .service
            .list_products(&ctx, filter.clone(), pagination)
    })
    .await;

    let page = respond("list_products", result)?;
    Ok(Json(page.into()))
}

pub async fn update_product(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    headers: HeaderMap,
    ProductPath(id): ProductPath,
    JsonBody(body): JsonBody<UpdateProductRequest>,
) -> Result<Json<ProductDto>, ApiError> {
    let ctx = context(&state, &headers);

    let result: AppResult<_> = async {
        let changes = body.into_changes()?;
        state
            .service
            .update_product(&ctx, &claims, id, changes)
            .await
    }
    .await;

    let product = respond("update_product", result)?;
    Ok(Json(product.into()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    headers: HeaderMap,
    ProductPath(id): ProductPath,
) -> Result<StatusCode, ApiError> {
    let ctx = context(&state, &headers);

    let result = state.service.delete_product(&ctx, &claims, id).await;

    respond("delete_product", result)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn register_user(
    State(state): State<AppState>,
    MaybeClaims(claims): MaybeClaims,
    headers: HeaderMap,
    JsonBody(body): JsonBody<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let ctx = context(&state, &headers);

    let result: AppResult<_> = async {
        let cmd = body.into_command()?;
        state
            .service
            .register_user(&ctx, claims.as_ref(), cmd)
            .await
    }
    .await;

    let user = respond("register_user", result)?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let ctx = context(&state, &headers);

    let result = state.service.authenticate(&ctx, body.into()).await;

    let session = respond("login", result)?;
    Ok(Json(session.into()))
}
