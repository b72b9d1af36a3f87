//! HTTP 请求和响应体

use chrono::{DateTime, Utc};
use ecom_common::{PagedResult, Pagination};
use ecom_errors::AppResult;
use serde::{Deserialize, Serialize};

use crate::api::edge::{parse_role, price_from_wire, price_to_wire};
use crate::application::{LoginCommand, RegisterUserCommand, Session};
use crate::domain::entities::{NewProduct, Product, ProductChanges, ProductFilter, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub category: String,
    pub description: String,
    pub rating: f64,
    pub num_reviews: i32,
    pub price: f64,
    pub count_in_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id.value(),
            name: p.name,
            image: p.image,
            category: p.category,
            description: p.description,
            rating: p.rating,
            num_reviews: p.num_reviews,
            price: price_to_wire(p.price),
            count_in_stock: p.count_in_stock,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: i32,
    pub price: f64,
    #[serde(default)]
    pub count_in_stock: i32,
}

impl CreateProductRequest {
    pub fn into_new_product(self) -> AppResult<NewProduct> {
        Ok(NewProduct {
            name: self.name,
            image: self.image,
            category: self.category,
            description: self.description,
            rating: self.rating,
            num_reviews: self.num_reviews,
            price: price_from_wire(self.price)?,
            count_in_stock: self.count_in_stock,
        })
    }
}

/// 缺省字段保持原值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub num_reviews: Option<i32>,
    pub price: Option<f64>,
    pub count_in_stock: Option<i32>,
}

impl UpdateProductRequest {
    pub fn into_changes(self) -> AppResult<ProductChanges> {
        Ok(ProductChanges {
            name: self.name,
            image: self.image,
            category: self.category,
            description: self.description,
            rating: self.rating,
            num_reviews: self.num_reviews,
            price: self.price.map(price_from_wire).transpose()?,
            count_in_stock: self.count_in_stock,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListProductsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub category: Option<String>,
    pub q: Option<String>,
}

impl ListProductsQuery {
    pub fn into_parts(self) -> (ProductFilter, Pagination) {
        (
            ProductFilter::new(self.category, self.q),
            Pagination::new(self.page.unwrap_or(0), self.page_size.unwrap_or(0)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPageDto {
    pub items: Vec<ProductDto>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl From<PagedResult<Product>> for ProductPageDto {
    fn from(page: PagedResult<Product>) -> Self {
        let total_pages = page.total_pages();
        let page = page.map(ProductDto::from);
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl RegisterUserRequest {
    pub fn into_command(self) -> AppResult<RegisterUserCommand> {
        Ok(RegisterUserCommand {
            role: parse_role(self.role.as_deref())?,
            name: self.name,
            email: self.email,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id.value(),
            name: u.name,
            email: u.email.into_inner(),
            role: u.role.as_str().to_string(),
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl From<LoginRequest> for LoginCommand {
    fn from(req: LoginRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserDto,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            token_type: "Bearer".to_string(),
            expires_at: session.expires_at,
            user: session.user.into(),
        }
    }
}
