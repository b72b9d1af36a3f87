//! 请求提取器
//!
//! 把 axum 自带提取器的拒绝结果统一转成 `InvalidInput`，和 gRPC 解码失败
//! 保持一致。

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use ecom_errors::AppError;
use serde::de::DeserializeOwned;

use crate::domain::value_objects::ProductId;

use super::error::ApiError;

/// JSON 请求体
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection: JsonRejection| {
                ApiError(AppError::invalid_input("body", rejection.body_text()))
            })
    }
}

/// 查询参数
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection: QueryRejection| {
                ApiError(AppError::invalid_input("query", rejection.body_text()))
            })
    }
}

/// 路径中的商品 ID
pub struct ProductPath(pub ProductId);

impl<S> FromRequestParts<S> for ProductPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| {
                ApiError(AppError::invalid_input("id", rejection.body_text()))
            })?;
        raw.parse().map(Self).map_err(ApiError)
    }
}
