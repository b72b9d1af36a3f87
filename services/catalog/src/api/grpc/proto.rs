//! `ecom.v1` 消息定义
//!
//! 消息用 prost 派生宏直接声明，服务骨架由 build.rs 生成后在文件末尾引入。
//! 时间戳统一为 RFC 3339 字符串，价格为 double。

#[derive(Clone, PartialEq, prost::Message)]
pub struct Product {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub image: String,
    #[prost(string, tag = "4")]
    pub category: String,
    #[prost(string, tag = "5")]
    pub description: String,
    #[prost(double, tag = "6")]
    pub rating: f64,
    #[prost(int32, tag = "7")]
    pub num_reviews: i32,
    #[prost(double, tag = "8")]
    pub price: f64,
    #[prost(int32, tag = "9")]
    pub count_in_stock: i32,
    #[prost(string, tag = "10")]
    pub created_at: String,
    #[prost(string, tag = "11")]
    pub updated_at: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateProductRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub image: String,
    #[prost(string, tag = "3")]
    pub category: String,
    #[prost(string, tag = "4")]
    pub description: String,
    #[prost(double, tag = "5")]
    pub rating: f64,
    #[prost(int32, tag = "6")]
    pub num_reviews: i32,
    #[prost(double, tag = "7")]
    pub price: f64,
    #[prost(int32, tag = "8")]
    pub count_in_stock: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ProductResponse {
    #[prost(message, optional, tag = "1")]
    pub product: Option<Product>,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct GetProductRequest {
    #[prost(int64, tag = "1")]
    pub id: i64,
}

/// 0 表示使用默认页码/页大小
#[derive(Clone, PartialEq, prost::Message)]
pub struct ListProductsRequest {
    #[prost(uint32, tag = "1")]
    pub page: u32,
    #[prost(uint32, tag = "2")]
    pub page_size: u32,
    #[prost(string, tag = "3")]
    pub category: String,
    #[prost(string, tag = "4")]
    pub query: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ListProductsResponse {
    #[prost(message, repeated, tag = "1")]
    pub items: Vec<Product>,
    #[prost(uint64, tag = "2")]
    pub total: u64,
    #[prost(uint32, tag = "3")]
    pub page: u32,
    #[prost(uint32, tag = "4")]
    pub page_size: u32,
    #[prost(uint32, tag = "5")]
    pub total_pages: u32,
}

/// 未设置的字段保持原值
#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateProductRequest {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(string, optional, tag = "2")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub image: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub category: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub description: Option<String>,
    #[prost(double, optional, tag = "6")]
    pub rating: Option<f64>,
    #[prost(int32, optional, tag = "7")]
    pub num_reviews: Option<i32>,
    #[prost(double, optional, tag = "8")]
    pub price: Option<f64>,
    #[prost(int32, optional, tag = "9")]
    pub count_in_stock: Option<i32>,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct DeleteProductRequest {
    #[prost(int64, tag = "1")]
    pub id: i64,
}

#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct DeleteProductResponse {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RegisterUserRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub email: String,
    #[prost(string, tag = "3")]
    pub password: String,
    /// "admin" 或 "customer"，空字符串为 customer
    #[prost(string, tag = "4")]
    pub role: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct User {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub email: String,
    #[prost(string, tag = "4")]
    pub role: String,
    #[prost(string, tag = "5")]
    pub created_at: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UserResponse {
    #[prost(message, optional, tag = "1")]
    pub user: Option<User>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LoginRequest {
    #[prost(string, tag = "1")]
    pub email: String,
    #[prost(string, tag = "2")]
    pub password: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct LoginResponse {
    #[prost(string, tag = "1")]
    pub token: String,
    #[prost(string, tag = "2")]
    pub token_type: String,
    #[prost(string, tag = "3")]
    pub expires_at: String,
    #[prost(message, optional, tag = "4")]
    pub user: Option<User>,
}

tonic::include_proto!("ecom.v1.Catalog");
