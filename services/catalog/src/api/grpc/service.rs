//! gRPC service implementation

use std::sync::Arc;
use std::time::Duration;

use ecom_auth_core::{Claims, bearer_token};
use ecom_common::RequestContext;
use ecom_errors::{AppError, AppResult};
use tonic::metadata::MetadataMap;
use tonic::{Request, Response, Status};

use crate::api::edge;
use crate::application::{CatalogService, RegisterUserCommand};
use crate::domain::entities::NewProduct;
use crate::domain::value_objects::ProductId;

use super::conversions::{list_request, update_request};
use super::proto::catalog_server::Catalog;
use super::proto::*;

const TRANSPORT: &str = "grpc";

pub struct CatalogGrpcService {
    service: Arc<CatalogService>,
    request_timeout: Duration,
}

impl CatalogGrpcService {
    pub fn new(service: Arc<CatalogService>, request_timeout: Duration) -> Self {
        Self {
            service,
            request_timeout,
        }
    }

    fn context(&self, metadata: &MetadataMap) -> RequestContext {
        let request_id = metadata.get("x-request-id").and_then(|v| v.to_str().ok());
        edge::request_context(self.request_timeout, request_id)
    }

    /// 从 `authorization` 元数据中取出并校验令牌
    fn claims(&self, metadata: &MetadataMap) -> AppResult<Claims> {
        self.optional_claims(metadata)?
            .ok_or_else(|| AppError::unauthorized("Missing authorization metadata"))
    }

    /// 没有携带令牌时返回 None；携带了但无效仍然报错
    fn optional_claims(&self, metadata: &MetadataMap) -> AppResult<Option<Claims>> {
        let Some(value) = metadata.get("authorization") else {
            return Ok(None);
        };
        let header = value
            .to_str()
            .map_err(|_| AppError::unauthorized("Malformed authorization metadata"))?;
        let token = bearer_token(header)?;
        self.service.verify_token(token).map(Some)
    }
}

fn respond<T>(operation: &'static str, result: AppResult<T>) -> Result<Response<T>, Status> {
    edge::observe(TRANSPORT, operation, &result);
    result.map(Response::new).map_err(Status::from)
}

#[tonic::async_trait]
impl Catalog for CatalogGrpcService {
    async fn create_product(
        &self,
        request: Request<CreateProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let ctx = self.context(request.metadata());
        let claims = self.claims(request.metadata());

        let result: AppResult<ProductResponse> = async {
            let claims = claims?;
            let product = NewProduct::try_from(request.into_inner())?;
            tracing::debug!(user_id = %claims.sub, "CreateProduct");
            let product = self.service.create_product(&ctx, product).await?;
            Ok(ProductResponse {
                product: Some(product.into()),
            })
        }
        .await;

        respond("create_product", result)
    }

    async fn get_product(
        &self,
        request: Request<GetProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let ctx = self.context(request.metadata());
        let id = ProductId(request.into_inner().id);

        let result = edge::read_with_retry("get_product", || self.service.get_product(&ctx, id))
            .await
            .map(|product| ProductResponse {
                product: Some(product.into()),
            });

        respond("get_product", result)
    }

    async fn list_products(
        &self,
        request: Request<ListProductsRequest>,
    ) -> Result<Response<ListProductsResponse>, Status> {
        let ctx = self.context(request.metadata());
        let (filter, pagination) = list_request(request.into_inner());

        let result = edge::read_with_retry("list_products", || {
            self.service
                .list_products(&ctx, filter.clone(), pagination)
        })
        .await
        .map(ListProductsResponse::from);

        respond("list_products", result)
    }

    async fn update_product(
        &self,
        request: Request<UpdateProductRequest>,
    ) -> Result<Response<ProductResponse>, Status> {
        let ctx = self.context(request.metadata());
        let claims = self.claims(request.metadata());

        let result: AppResult<ProductResponse> = async {
            let claims = claims?;
            let (id, changes) = update_request(request.into_inner())?;
            let product = self
                .service
                .update_product(&ctx, &claims, id, changes)
                .await?;
            Ok(ProductResponse {
                product: Some(product.into()),
            })
        }
        .await;

        respond("update_product", result)
    }

    async fn delete_product(
        &self,
        request: Request<DeleteProductRequest>,
    ) -> Result<Response<DeleteProductResponse>, Status> {
        let ctx = self.context(request.metadata());
        let claims = self.claims(request.metadata());
        let id = ProductId(request.into_inner().id);

        let result: AppResult<DeleteProductResponse> = async {
            let claims = claims?;
            self.service.delete_product(&ctx, &claims, id).await?;
            Ok(DeleteProductResponse {})
        }
        .await;

        respond("delete_product", result)
    }

    async fn register_user(
        &self,
        request: Request<RegisterUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let ctx = self.context(request.metadata());
        let claims = self.optional_claims(request.metadata());

        let result: AppResult<UserResponse> = async {
            let claims = claims?;
            let cmd = RegisterUserCommand::try_from(request.into_inner())?;
            let user = self
                .service
                .register_user(&ctx, claims.as_ref(), cmd)
                .await?;
            Ok(UserResponse {
                user: Some(user.into()),
            })
        }
        .await;

        respond("register_user", result)
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let ctx = self.context(request.metadata());

        let result = self
            .service
            .authenticate(&ctx, request.into_inner().into())
            .await
            .map(LoginResponse::from);

        respond("login", result)
    }
}
