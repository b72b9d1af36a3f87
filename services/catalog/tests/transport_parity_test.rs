//! HTTP 与 gRPC 适配器一致性
//!
//! 同一组请求分别走两个适配器（各自使用全新的内存存储），逐步比较结果类别
//! 和响应内容。时间戳和令牌本身每次都不同，比较前去掉。

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request as HttpRequest, StatusCode};
use ecom_auth_core::TokenService;
use ecom_catalog::api::grpc::CatalogGrpcService;
use ecom_catalog::api::grpc::proto::{self, catalog_server::Catalog};
use ecom_catalog::api::http::{AppState, router};
use ecom_catalog::application::CatalogService;
use ecom_catalog::infrastructure::persistence::InMemoryStorer;
use ecom_common::RequestContext;
use serde_json::{Value, json};
use tonic::{Code, Request, Response, Status};
use tower::ServiceExt;

const SECRET: &str = "parity-test-secret-0123456789abcdefghij";
const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin-password";
const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
struct Outcome {
    kind: &'static str,
    body: Value,
}

#[derive(Debug, Clone)]
struct ProductInput {
    name: &'static str,
    category: &'static str,
    price: f64,
    count_in_stock: i32,
}

const WIDGET: ProductInput = ProductInput {
    name: "Widget",
    category: "Tools",
    price: 9.99,
    count_in_stock: 5,
};

async fn catalog() -> Arc<CatalogService> {
    let tokens = Arc::new(TokenService::new(SECRET, 3600, "ecom", "ecom-api").unwrap());
    let service = CatalogService::new(Arc::new(InMemoryStorer::new()), tokens, 100);
    service
        .ensure_admin(&RequestContext::background(), ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();
    Arc::new(service)
}

/// 去掉每次运行都会变化的字段
fn strip_volatile(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(k, _)| {
                    !matches!(
                        k.as_str(),
                        "created_at" | "updated_at" | "expires_at" | "token"
                    )
                })
                .map(|(k, v)| (k, strip_volatile(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_volatile).collect()),
        other => other,
    }
}

trait Api {
    async fn create_product(&self, token: Option<&str>, input: &ProductInput) -> Outcome;
    async fn get_product(&self, id: i64) -> Outcome;
    async fn list_products(&self, page: u32, page_size: u32, category: &str) -> Outcome;
    async fn update_price(&self, token: Option<&str>, id: i64, price: f64) -> Outcome;
    async fn delete_product(&self, token: Option<&str>, id: i64) -> Outcome;
    async fn register(&self, token: Option<&str>, email: &str, password: &str, role: &str)
    -> Outcome;
    async fn login(&self, email: &str, password: &str) -> (Outcome, Option<String>);
}

// ========== HTTP ==========

struct HttpApi {
    app: Router,
}

impl HttpApi {
    async fn new() -> Self {
        Self {
            app: router(AppState::new(catalog().await, TIMEOUT)),
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Outcome {
        let mut builder = HttpRequest::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let kind = http_kind(response.status());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let body = if kind != "ok" || bytes.is_empty() {
            Value::Null
        } else {
            strip_volatile(serde_json::from_slice(&bytes).unwrap())
        };
        Outcome { kind, body }
    }
}

fn http_kind(status: StatusCode) -> &'static str {
    match status.as_u16() {
        200 | 201 | 204 => "ok",
        400 => "invalid_input",
        401 => "unauthorized",
        403 => "forbidden",
        404 => "not_found",
        409 => "conflict",
        499 => "cancelled",
        503 => "unavailable",
        _ => "internal",
    }
}

impl Api for HttpApi {
    async fn create_product(&self, token: Option<&str>, input: &ProductInput) -> Outcome {
        let body = json!({
            "name": input.name,
            "category": input.category,
            "price": input.price,
            "count_in_stock": input.count_in_stock,
        });
        self.send(Method::POST, "/api/v1/products", token, Some(body))
            .await
    }

    async fn get_product(&self, id: i64) -> Outcome {
        self.send(Method::GET, &format!("/api/v1/products/{id}"), None, None)
            .await
    }

    async fn list_products(&self, page: u32, page_size: u32, category: &str) -> Outcome {
        let uri = format!("/api/v1/products?page={page}&page_size={page_size}&category={category}");
        self.send(Method::GET, &uri, None, None).await
    }

    async fn update_price(&self, token: Option<&str>, id: i64, price: f64) -> Outcome {
        let uri = format!("/api/v1/products/{id}");
        self.send(Method::PUT, &uri, token, Some(json!({ "price": price })))
            .await
    }

    async fn delete_product(&self, token: Option<&str>, id: i64) -> Outcome {
        let uri = format!("/api/v1/products/{id}");
        self.send(Method::DELETE, &uri, token, None).await
    }

    async fn register(
        &self,
        token: Option<&str>,
        email: &str,
        password: &str,
        role: &str,
    ) -> Outcome {
        let body = json!({
            "name": "Ada",
            "email": email,
            "password": password,
            "role": role,
        });
        self.send(Method::POST, "/api/v1/users", token, Some(body))
            .await
    }

    async fn login(&self, email: &str, password: &str) -> (Outcome, Option<String>) {
        let request = HttpRequest::builder()
            .method(Method::POST)
            .uri("/api/v1/auth/login")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "email": email, "password": password }).to_string(),
            ))
            .unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();
        let kind = http_kind(response.status());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        if kind != "ok" {
            return (
                Outcome {
                    kind,
                    body: Value::Null,
                },
                None,
            );
        }

        let value: Value = serde_json::from_slice(&bytes).unwrap();
        let token = value["token"].as_str().map(str::to_string);
        (
            Outcome {
                kind,
                body: strip_volatile(value),
            },
            token,
        )
    }
}

// ========== gRPC ==========

struct GrpcApi {
    service: CatalogGrpcService,
}

impl GrpcApi {
    async fn new() -> Self {
        Self {
            service: CatalogGrpcService::new(catalog().await, TIMEOUT),
        }
    }
}

fn grpc_request<T>(message: T, token: Option<&str>) -> Request<T> {
    let mut request = Request::new(message);
    if let Some(token) = token {
        request
            .metadata_mut()
            .insert("authorization", format!("Bearer {token}").parse().unwrap());
    }
    request
}

fn grpc_kind(code: Code) -> &'static str {
    match code {
        Code::Ok => "ok",
        Code::InvalidArgument => "invalid_input",
        Code::Unauthenticated => "unauthorized",
        Code::PermissionDenied => "forbidden",
        Code::NotFound => "not_found",
        Code::AlreadyExists => "conflict",
        Code::Cancelled => "cancelled",
        Code::Unavailable => "unavailable",
        _ => "internal",
    }
}

fn grpc_outcome<T>(result: Result<Response<T>, Status>, body: impl FnOnce(T) -> Value) -> Outcome {
    match result {
        Ok(response) => Outcome {
            kind: "ok",
            body: strip_volatile(body(response.into_inner())),
        },
        Err(status) => Outcome {
            kind: grpc_kind(status.code()),
            body: Value::Null,
        },
    }
}

fn product_json(product: Option<proto::Product>) -> Value {
    let p = product.unwrap();
    json!({
        "id": p.id,
        "name": p.name,
        "image": p.image,
        "category": p.category,
        "description": p.description,
        "rating": p.rating,
        "num_reviews": p.num_reviews,
        "price": p.price,
        "count_in_stock": p.count_in_stock,
    })
}

fn user_json(user: Option<proto::User>) -> Value {
    let u = user.unwrap();
    json!({
        "id": u.id,
        "name": u.name,
        "email": u.email,
        "role": u.role,
    })
}

impl Api for GrpcApi {
    async fn create_product(&self, token: Option<&str>, input: &ProductInput) -> Outcome {
        let message = proto::CreateProductRequest {
            name: input.name.to_string(),
            category: input.category.to_string(),
            price: input.price,
            count_in_stock: input.count_in_stock,
            ..Default::default()
        };
        let result = self
            .service
            .create_product(grpc_request(message, token))
            .await;
        grpc_outcome(result, |r| product_json(r.product))
    }

    async fn get_product(&self, id: i64) -> Outcome {
        let result = self
            .service
            .get_product(grpc_request(proto::GetProductRequest { id }, None))
            .await;
        grpc_outcome(result, |r| product_json(r.product))
    }

    async fn list_products(&self, page: u32, page_size: u32, category: &str) -> Outcome {
        let message = proto::ListProductsRequest {
            page,
            page_size,
            category: category.to_string(),
            query: String::new(),
        };
        let result = self
            .service
            .list_products(grpc_request(message, None))
            .await;
        grpc_outcome(result, |r| {
            json!({
                "items": r.items.into_iter().map(|p| product_json(Some(p))).collect::<Vec<_>>(),
                "total": r.total,
                "page": r.page,
                "page_size": r.page_size,
                "total_pages": r.total_pages,
            })
        })
    }

    async fn update_price(&self, token: Option<&str>, id: i64, price: f64) -> Outcome {
        let message = proto::UpdateProductRequest {
            id,
            price: Some(price),
            ..Default::default()
        };
        let result = self
            .service
            .update_product(grpc_request(message, token))
            .await;
        grpc_outcome(result, |r| product_json(r.product))
    }

    async fn delete_product(&self, token: Option<&str>, id: i64) -> Outcome {
        let result = self
            .service
            .delete_product(grpc_request(proto::DeleteProductRequest { id }, token))
            .await;
        grpc_outcome(result, |_| Value::Null)
    }

    async fn register(
        &self,
        token: Option<&str>,
        email: &str,
        password: &str,
        role: &str,
    ) -> Outcome {
        let message = proto::RegisterUserRequest {
            name: "Ada".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        };
        let result = self
            .service
            .register_user(grpc_request(message, token))
            .await;
        grpc_outcome(result, |r| user_json(r.user))
    }

    async fn login(&self, email: &str, password: &str) -> (Outcome, Option<String>) {
        let message = proto::LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.service.login(grpc_request(message, None)).await;
        let token = result.as_ref().ok().map(|r| r.get_ref().token.clone());
        let outcome = grpc_outcome(result, |r| {
            json!({
                "token_type": r.token_type,
                "user": user_json(r.user),
            })
        });
        (outcome, token)
    }
}

// ========== 场景 ==========

async fn scenario<A: Api>(api: &A) -> Vec<(&'static str, Outcome)> {
    let mut steps = Vec::new();

    let (outcome, admin) = api.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    steps.push(("admin login", outcome));
    let admin = admin.expect("admin token");

    steps.push((
        "register customer",
        api.register(None, "ada@example.com", "correct horse", "").await,
    ));
    let (outcome, customer) = api.login("ada@example.com", "correct horse").await;
    steps.push(("customer login", outcome));
    let customer = customer.expect("customer token");

    steps.push((
        "register duplicate email",
        api.register(None, "ADA@example.com", "another password", "")
            .await,
    ));
    steps.push((
        "customer creates admin",
        api.register(Some(&customer), "eve@example.com", "correct horse", "admin")
            .await,
    ));
    steps.push((
        "unknown role",
        api.register(None, "eve@example.com", "correct horse", "root")
            .await,
    ));
    steps.push((
        "short password",
        api.register(None, "eve@example.com", "short", "").await,
    ));
    steps.push((
        "wrong password",
        api.login("ada@example.com", "wrong password").await.0,
    ));
    steps.push((
        "unknown email",
        api.login("nobody@example.com", "correct horse").await.0,
    ));

    steps.push(("create anonymous", api.create_product(None, &WIDGET).await));
    steps.push((
        "create with bad token",
        api.create_product(Some("not-a-token"), &WIDGET).await,
    ));
    steps.push((
        "create negative price",
        api.create_product(
            Some(&admin),
            &ProductInput {
                price: -1.0,
                ..WIDGET
            },
        )
        .await,
    ));
    steps.push((
        "create blank name",
        api.create_product(
            Some(&admin),
            &ProductInput {
                name: "  ",
                ..WIDGET
            },
        )
        .await,
    ));
    steps.push(("create widget", api.create_product(Some(&admin), &WIDGET).await));
    steps.push(("get widget", api.get_product(1).await));
    steps.push(("get missing", api.get_product(99999).await));
    steps.push(("list first page", api.list_products(1, 10, "").await));
    steps.push(("list other category", api.list_products(1, 10, "Toys").await));
    steps.push(("list oversized page", api.list_products(0, 1000, "").await));

    steps.push((
        "customer updates",
        api.update_price(Some(&customer), 1, 12.5).await,
    ));
    steps.push(("admin updates", api.update_price(Some(&admin), 1, 12.5).await));
    steps.push((
        "negative update",
        api.update_price(Some(&admin), 1, -3.0).await,
    ));
    steps.push((
        "update missing",
        api.update_price(Some(&admin), 99999, 1.0).await,
    ));

    steps.push(("customer deletes", api.delete_product(Some(&customer), 1).await));
    steps.push(("delete missing", api.delete_product(Some(&admin), 99999).await));
    steps.push(("admin deletes", api.delete_product(Some(&admin), 1).await));
    steps.push(("get deleted", api.get_product(1).await));

    steps
}

const EXPECTED_KINDS: &[(&str, &str)] = &[
    ("admin login", "ok"),
    ("register customer", "ok"),
    ("customer login", "ok"),
    ("register duplicate email", "conflict"),
    ("customer creates admin", "forbidden"),
    ("unknown role", "invalid_input"),
    ("short password", "invalid_input"),
    ("wrong password", "unauthorized"),
    ("unknown email", "unauthorized"),
    ("create anonymous", "unauthorized"),
    ("create with bad token", "unauthorized"),
    ("create negative price", "invalid_input"),
    ("create blank name", "invalid_input"),
    ("create widget", "ok"),
    ("get widget", "ok"),
    ("get missing", "not_found"),
    ("list first page", "ok"),
    ("list other category", "ok"),
    ("list oversized page", "ok"),
    ("customer updates", "forbidden"),
    ("admin updates", "ok"),
    ("negative update", "invalid_input"),
    ("update missing", "not_found"),
    ("customer deletes", "forbidden"),
    ("delete missing", "not_found"),
    ("admin deletes", "ok"),
    ("get deleted", "not_found"),
];

#[tokio::test]
async fn test_http_scenario_outcomes() {
    let steps = scenario(&HttpApi::new().await).await;
    let kinds: Vec<(&str, &str)> = steps.iter().map(|(step, o)| (*step, o.kind)).collect();
    assert_eq!(kinds, EXPECTED_KINDS);

    let (_, created) = &steps[13];
    assert_eq!(created.body["id"], json!(1));
    assert_eq!(created.body["price"], json!(9.99));

    let (_, listed) = &steps[16];
    assert_eq!(listed.body["total"], json!(1));
    assert_eq!(listed.body["items"][0]["name"], json!("Widget"));

    let (_, oversized) = &steps[18];
    assert_eq!(oversized.body["page"], json!(1));
    assert_eq!(oversized.body["page_size"], json!(100));
}

#[tokio::test]
async fn test_http_and_grpc_agree() {
    let http = scenario(&HttpApi::new().await).await;
    let grpc = scenario(&GrpcApi::new().await).await;

    assert_eq!(http.len(), grpc.len());
    for ((step, h), (_, g)) in http.iter().zip(&grpc) {
        assert_eq!(h, g, "step `{step}` differs between transports");
    }
}
