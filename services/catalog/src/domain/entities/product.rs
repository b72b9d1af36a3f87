//! 商品实体

use chrono::{DateTime, Utc};
use ecom_errors::{AppError, AppResult};
use rust_decimal::Decimal;

use crate::domain::value_objects::ProductId;

/// 文本字段最大长度（字符）
pub const MAX_TEXT_LEN: usize = 255;

/// 价格小数位数，对应 NUMERIC(12, 2)
pub const PRICE_SCALE: u32 = 2;

/// 价格上限（不含）
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// 商品
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
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

/// 待创建的商品
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewProduct {
    pub name: String,
    pub image: String,
    pub category: String,
    pub description: String,
    pub rating: f64,
    pub num_reviews: i32,
    pub price: Decimal,
    pub count_in_stock: i32,
}

impl NewProduct {
    /// 校验全部字段
    pub fn validate(&self) -> AppResult<()> {
        validate_name(&self.name)?;
        validate_image(&self.image)?;
        validate_category(&self.category)?;
        validate_rating(self.rating)?;
        validate_non_negative("num_reviews", self.num_reviews)?;
        validate_price(self.price)?;
        validate_non_negative("count_in_stock", self.count_in_stock)?;
        Ok(())
    }

    /// 按给定 ID 和时间戳落成实体（内存存储使用）
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            image: self.image,
            category: self.category,
            description: self.description,
            rating: self.rating,
            num_reviews: self.num_reviews,
            price: self.price,
            count_in_stock: self.count_in_stock,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 部分更新；`None` 表示保持原值
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub num_reviews: Option<i32>,
    pub price: Option<Decimal>,
    pub count_in_stock: Option<i32>,
}

impl ProductChanges {
    /// 按创建时的规则校验提供了的字段
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(image) = &self.image {
            validate_image(image)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        if let Some(num_reviews) = self.num_reviews {
            validate_non_negative("num_reviews", num_reviews)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(count_in_stock) = self.count_in_stock {
            validate_non_negative("count_in_stock", count_in_stock)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 把变更应用到实体上
    pub fn apply_to(self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(rating) = self.rating {
            product.rating = rating;
        }
        if let Some(num_reviews) = self.num_reviews {
            product.num_reviews = num_reviews;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(count_in_stock) = self.count_in_stock {
            product.count_in_stock = count_in_stock;
        }
        product.updated_at = now;
    }
}

/// 列表过滤条件
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductFilter {
    /// 分类精确匹配
    pub category: Option<String>,
    /// 名称子串，不区分大小写
    pub query: Option<String>,
}

impl ProductFilter {
    pub fn new(category: Option<String>, query: Option<String>) -> Self {
        let non_blank = |s: String| {
            let s = s.trim().to_string();
            (!s.is_empty()).then_some(s)
        };
        Self {
            category: category.and_then(non_blank),
            query: query.and_then(non_blank),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }
        if let Some(query) = &self.query {
            if !product
                .name
                .to_lowercase()
                .contains(&query.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

fn validate_text(field: &str, value: &str, required: bool) -> AppResult<()> {
    if required && value.trim().is_empty() {
        return Err(AppError::invalid_input(field, "must not be blank"));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::invalid_input(
            field,
            format!("must be at most {MAX_TEXT_LEN} characters"),
        ));
    }
    Ok(())
}

fn validate_name(name: &str) -> AppResult<()> {
    validate_text("name", name, true)
}

fn validate_category(category: &str) -> AppResult<()> {
    validate_text("category", category, true)
}

fn validate_image(image: &str) -> AppResult<()> {
    validate_text("image", image, false)
}

fn validate_rating(rating: f64) -> AppResult<()> {
    if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
        return Err(AppError::invalid_input("rating", "must be between 0 and 5"));
    }
    Ok(())
}

fn validate_non_negative(field: &str, value: i32) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::invalid_input(field, "must not be negative"));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> AppResult<()> {
    if price < Decimal::ZERO {
        return Err(AppError::invalid_input("price", "must not be negative"));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(AppError::invalid_input(
            "price",
            format!("must have at most {PRICE_SCALE} decimal places"),
        ));
    }
    if price >= MAX_PRICE {
        return Err(AppError::invalid_input("price", "is too large"));
    }
    Ok(())
}
