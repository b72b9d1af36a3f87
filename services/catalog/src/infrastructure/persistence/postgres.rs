//! PostgreSQL 存储实现
//!
//! 每个操作都是一条 SQL 语句，由 [`RequestContext::run`] 约束截止时间和取消。

use async_trait::async_trait;
use ecom_adapter_postgres::map_sqlx_error;
use ecom_common::{PagedResult, Pagination, RequestContext};
use ecom_errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::debug;

use crate::domain::entities::{NewProduct, NewUser, Product, ProductChanges, ProductFilter, User};
use crate::domain::repositories::Storer;
use crate::domain::value_objects::{Email, ProductId};

use super::rows::{ProductPageRow, ProductRow, UserRow};

const PRODUCT_COLUMNS: &str = "id, name, image, category, description, rating, num_reviews, \
     price, count_in_stock, created_at, updated_at";

const USER_COLUMNS: &str = "id, name, email, password_hash, is_admin, created_at";

pub struct PostgresStorer {
    pool: PgPool,
}

impl PostgresStorer {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 转义 LIKE 模式中的通配符
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl Storer for PostgresStorer {
    async fn create_product(&self, ctx: &RequestContext, product: NewProduct) -> AppResult<Product> {
        let sql = format!(
            r#"
            INSERT INTO products (
                name, image, category, description, rating, num_reviews, price, count_in_stock
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        ctx.run("create_product", async {
            let row = sqlx::query_as::<_, ProductRow>(&sql)
                .bind(&product.name)
                .bind(&product.image)
                .bind(&product.category)
                .bind(&product.description)
                .bind(product.rating)
                .bind(product.num_reviews)
                .bind(product.price)
                .bind(product.count_in_stock)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, "product"))?;
            Ok(Product::from(row))
        })
        .await
    }

    async fn get_product(&self, ctx: &RequestContext, id: ProductId) -> AppResult<Product> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");

        ctx.run("get_product", async {
            let row = sqlx::query_as::<_, ProductRow>(&sql)
                .bind(id.value())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, "product"))?;

            row.map(Product::from)
                .ok_or_else(|| AppError::not_found(format!("product {id} not found")))
        })
        .await
    }

    async fn list_products(
        &self,
        ctx: &RequestContext,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> AppResult<PagedResult<Product>> {
        // 总数和当前页在同一条语句里取出
        let sql = format!(
            r#"
            WITH filtered AS (
                SELECT {PRODUCT_COLUMNS}
                FROM products
                WHERE ($1::TEXT IS NULL OR category = $1)
                  AND ($2::TEXT IS NULL OR name ILIKE '%' || $2 || '%')
            )
            SELECT c.total, p.*
            FROM (SELECT COUNT(*) AS total FROM filtered) c
            LEFT JOIN LATERAL (
                SELECT * FROM filtered ORDER BY id LIMIT $3 OFFSET $4
            ) p ON TRUE
            ORDER BY p.id
            "#
        );
        let query = filter.query.as_deref().map(escape_like);
        let limit = i64::try_from(pagination.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(pagination.offset()).unwrap_or(i64::MAX);

        ctx.run("list_products", async {
            let rows = sqlx::query_as::<_, ProductPageRow>(&sql)
                .bind(filter.category.as_deref())
                .bind(query.as_deref())
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, "product"))?;

            let total = rows.first().map(|r| r.total).unwrap_or(0);
            let items: Vec<Product> = rows
                .into_iter()
                .filter_map(ProductPageRow::into_product)
                .collect();
            debug!(total, returned = items.len(), "Listed products");

            Ok(PagedResult::new(
                items,
                u64::try_from(total).unwrap_or(0),
                &pagination,
            ))
        })
        .await
    }

    async fn update_product(
        &self,
        ctx: &RequestContext,
        id: ProductId,
        changes: ProductChanges,
    ) -> AppResult<Product> {
        let sql = format!(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                image = COALESCE($3, image),
                category = COALESCE($4, category),
                description = COALESCE($5, description),
                rating = COALESCE($6, rating),
                num_reviews = COALESCE($7, num_reviews),
                price = COALESCE($8, price),
                count_in_stock = COALESCE($9, count_in_stock),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        ctx.run("update_product", async {
            let row = sqlx::query_as::<_, ProductRow>(&sql)
                .bind(id.value())
                .bind(changes.name.as_deref())
                .bind(changes.image.as_deref())
                .bind(changes.category.as_deref())
                .bind(changes.description.as_deref())
                .bind(changes.rating)
                .bind(changes.num_reviews)
                .bind(changes.price)
                .bind(changes.count_in_stock)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, "product"))?;

            row.map(Product::from)
                .ok_or_else(|| AppError::not_found(format!("product {id} not found")))
        })
        .await
    }

    async fn delete_product(&self, ctx: &RequestContext, id: ProductId) -> AppResult<()> {
        ctx.run("delete_product", async {
            let result = sqlx::query("DELETE FROM products WHERE id = $1")
                .bind(id.value())
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, "product"))?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found(format!("product {id} not found")));
            }
            Ok(())
        })
        .await
    }

    async fn create_user(&self, ctx: &RequestContext, user: NewUser) -> AppResult<User> {
        let sql = format!(
            r#"
            INSERT INTO users (name, email, password_hash, is_admin)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        );

        ctx.run("create_user", async {
            let row = sqlx::query_as::<_, UserRow>(&sql)
                .bind(&user.name)
                .bind(user.email.as_str())
                .bind(user.password_hash.as_str())
                .bind(user.role.is_admin())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, &format!("user {}", user.email)))?;
            User::try_from(row)
        })
        .await
    }

    async fn get_user_by_email(&self, ctx: &RequestContext, email: &Email) -> AppResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");

        ctx.run("get_user_by_email", async {
            let row = sqlx::query_as::<_, UserRow>(&sql)
                .bind(email.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(e, "user"))?
                .ok_or_else(|| AppError::not_found("user not found"))?;
            User::try_from(row)
        })
        .await
    }
}
