//! 数据库行映射结构

use chrono::{DateTime, Utc};
use ecom_auth_core::Role;
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::domain::entities::{Product, User};
use crate::domain::value_objects::{Email, HashedPassword, ProductId, UserId};
use ecom_errors::{AppError, AppResult};

/// 商品数据库行
#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub category: String,
    pub description: String,
    pub rating: f64,
    pub num_reviews: i32,
    pub price: Decimal,
    pub count_in_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId(row.id),
            name: row.name,
            image: row.image,
            category: row.category,
            description: row.description,
            rating: row.rating,
            num_reviews: row.num_reviews,
            price: row.price,
            count_in_stock: row.count_in_stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// 分页查询的行：总数总会返回，页内无数据时商品列为空
#[derive(Debug, FromRow)]
pub struct ProductPageRow {
    pub total: i64,
    pub id: Option<i64>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub num_reviews: Option<i32>,
    pub price: Option<Decimal>,
    pub count_in_stock: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProductPageRow {
    /// 商品列全部非空时还原成实体
    pub fn into_product(self) -> Option<Product> {
        Some(Product {
            id: ProductId(self.id?),
            name: self.name?,
            image: self.image?,
            category: self.category?,
            description: self.description?,
            rating: self.rating?,
            num_reviews: self.num_reviews?,
            price: self.price?,
            count_in_stock: self.count_in_stock?,
            created_at: self.created_at?,
            updated_at: self.updated_at?,
        })
    }
}

/// 用户数据库行
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> AppResult<Self> {
        let email = Email::new(&row.email).map_err(|e| {
            AppError::internal(format!("Corrupt email stored for user {}: {}", row.id, e))
        })?;

        Ok(User {
            id: UserId(row.id),
            name: row.name,
            email,
            password_hash: HashedPassword::from_hash(row.password_hash),
            role: if row.is_admin { Role::Admin } else { Role::Customer },
            created_at: row.created_at,
        })
    }
}
