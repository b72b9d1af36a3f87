//! Proto 与领域类型之间的转换

use chrono::{DateTime, SecondsFormat, Utc};
use ecom_common::{PagedResult, Pagination};
use ecom_errors::{AppError, AppResult};

use crate::api::edge::{parse_role, price_from_wire, price_to_wire};
use crate::application::{LoginCommand, RegisterUserCommand, Session};
use crate::domain::entities::{NewProduct, Product, ProductChanges, ProductFilter, User};
use crate::domain::value_objects::ProductId;

use super::proto;

pub fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl From<Product> for proto::Product {
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
            created_at: timestamp(p.created_at),
            updated_at: timestamp(p.updated_at),
        }
    }
}

impl From<User> for proto::User {
    fn from(u: User) -> Self {
        Self {
            id: u.id.value(),
            name: u.name,
            email: u.email.into_inner(),
            role: u.role.as_str().to_string(),
            created_at: timestamp(u.created_at),
        }
    }
}

impl From<PagedResult<Product>> for proto::ListProductsResponse {
    fn from(page: PagedResult<Product>) -> Self {
        let total_pages = page.total_pages();
        Self {
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages,
            items: page.items.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Session> for proto::LoginResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            token_type: "Bearer".to_string(),
            expires_at: timestamp(session.expires_at),
            user: Some(session.user.into()),
        }
    }
}

impl TryFrom<proto::CreateProductRequest> for NewProduct {
    type Error = AppError;

    fn try_from(req: proto::CreateProductRequest) -> AppResult<Self> {
        Ok(Self {
            name: req.name,
            image: req.image,
            category: req.category,
            description: req.description,
            rating: req.rating,
            num_reviews: req.num_reviews,
            price: price_from_wire(req.price)?,
            count_in_stock: req.count_in_stock,
        })
    }
}

/// 拆出商品 ID 和变更字段
pub fn update_request(req: proto::UpdateProductRequest) -> AppResult<(ProductId, ProductChanges)> {
    let changes = ProductChanges {
        name: req.name,
        image: req.image,
        category: req.category,
        description: req.description,
        rating: req.rating,
        num_reviews: req.num_reviews,
        price: req.price.map(price_from_wire).transpose()?,
        count_in_stock: req.count_in_stock,
    };
    Ok((ProductId(req.id), changes))
}

pub fn list_request(req: proto::ListProductsRequest) -> (ProductFilter, Pagination) {
    let non_empty = |s: String| (!s.is_empty()).then_some(s);
    (
        ProductFilter::new(non_empty(req.category), non_empty(req.query)),
        Pagination::new(req.page, req.page_size),
    )
}

impl TryFrom<proto::RegisterUserRequest> for RegisterUserCommand {
    type Error = AppError;

    fn try_from(req: proto::RegisterUserRequest) -> AppResult<Self> {
        Ok(Self {
            role: parse_role(Some(&req.role))?,
            name: req.name,
            email: req.email,
            password: req.password,
        })
    }
}

impl From<proto::LoginRequest> for LoginCommand {
    fn from(req: proto::LoginRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
        }
    }
}
