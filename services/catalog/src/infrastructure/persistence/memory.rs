//! 内存存储实现
//!
//! 用于本地运行和测试，语义与 PostgreSQL 实现一致：ID 从 1 递增，列表按
//! ID 升序，邮箱唯一（不区分大小写）。

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use ecom_common::{PagedResult, Pagination, RequestContext};
use ecom_errors::{AppError, AppResult};
use tokio::sync::RwLock;

use crate::domain::entities::{NewProduct, NewUser, Product, ProductChanges, ProductFilter, User};
use crate::domain::repositories::Storer;
use crate::domain::value_objects::{Email, ProductId, UserId};

#[derive(Default)]
struct State {
    products: BTreeMap<ProductId, Product>,
    users: HashMap<String, User>,
    next_product_id: i64,
    next_user_id: i64,
}

#[derive(Default)]
pub struct InMemoryStorer {
    state: RwLock<State>,
}

impl InMemoryStorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前商品数量
    pub async fn product_count(&self) -> usize {
        self.state.read().await.products.len()
    }
}

fn product_not_found(id: ProductId) -> AppError {
    AppError::not_found(format!("product {id} not found"))
}

#[async_trait]
impl Storer for InMemoryStorer {
    async fn create_product(&self, ctx: &RequestContext, product: NewProduct) -> AppResult<Product> {
        ctx.run("create_product", async {
            let mut state = self.state.write().await;
            state.next_product_id += 1;
            let id = ProductId(state.next_product_id);
            let product = product.into_product(id, Utc::now());
            state.products.insert(id, product.clone());
            Ok(product)
        })
        .await
    }

    async fn get_product(&self, ctx: &RequestContext, id: ProductId) -> AppResult<Product> {
        ctx.run("get_product", async {
            self.state
                .read()
                .await
                .products
                .get(&id)
                .cloned()
                .ok_or_else(|| product_not_found(id))
        })
        .await
    }

    async fn list_products(
        &self,
        ctx: &RequestContext,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> AppResult<PagedResult<Product>> {
        ctx.run("list_products", async {
            let state = self.state.read().await;
            let matching: Vec<&Product> = state
                .products
                .values()
                .filter(|p| filter.matches(p))
                .collect();

            let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
            let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
            let items = matching
                .iter()
                .skip(offset)
                .take(limit)
                .map(|p| (*p).clone())
                .collect();

            Ok(PagedResult::new(items, matching.len() as u64, &pagination))
        })
        .await
    }

    async fn update_product(
        &self,
        ctx: &RequestContext,
        id: ProductId,
        changes: ProductChanges,
    ) -> AppResult<Product> {
        ctx.run("update_product", async {
            let mut state = self.state.write().await;
            let product = state
                .products
                .get_mut(&id)
                .ok_or_else(|| product_not_found(id))?;
            changes.apply_to(product, Utc::now());
            Ok(product.clone())
        })
        .await
    }

    async fn delete_product(&self, ctx: &RequestContext, id: ProductId) -> AppResult<()> {
        ctx.run("delete_product", async {
            self.state
                .write()
                .await
                .products
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| product_not_found(id))
        })
        .await
    }

    async fn create_user(&self, ctx: &RequestContext, user: NewUser) -> AppResult<User> {
        ctx.run("create_user", async {
            let mut state = self.state.write().await;
            let key = user.email.as_str().to_string();
            if state.users.contains_key(&key) {
                return Err(AppError::conflict(format!("user {key} already exists")));
            }

            state.next_user_id += 1;
            let user = user.into_user(UserId(state.next_user_id), Utc::now());
            state.users.insert(key, user.clone());
            Ok(user)
        })
        .await
    }

    async fn get_user_by_email(&self, ctx: &RequestContext, email: &Email) -> AppResult<User> {
        ctx.run("get_user_by_email", async {
            self.state
                .read()
                .await
                .users
                .get(email.as_str())
                .cloned()
                .ok_or_else(|| AppError::not_found("user not found"))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::HashedPassword;
    use ecom_auth_core::Role;
    use ecom_errors::ErrorKind;
    use rust_decimal::Decimal;

    fn product(name: &str, category: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category: category.to_string(),
            price: Decimal::new(100, 2),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ids_increase_and_list_is_ordered() {
        let store = InMemoryStorer::new();
        let ctx = RequestContext::background();
        for name in ["a", "b", "c"] {
            store.create_product(&ctx, product(name, "Tools")).await.unwrap();
        }

        let page = store
            .list_products(&ctx, ProductFilter::default(), Pagination::new(2, 2))
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, ProductId(3));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_product() {
        let store = InMemoryStorer::new();
        let ctx = RequestContext::background();

        let err = store
            .update_product(&ctx, ProductId(9), ProductChanges::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = store.delete_product(&ctx, ProductId(9)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryStorer::new();
        let ctx = RequestContext::background();
        let user = NewUser {
            name: "Ada".to_string(),
            email: Email::new("ada@example.com").unwrap(),
            password_hash: HashedPassword::from_hash("$argon2id$stub"),
            role: Role::Customer,
        };

        store.create_user(&ctx, user.clone()).await.unwrap();
        let err = store.create_user(&ctx, user).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_cancelled_context_leaves_store_untouched() {
        let store = InMemoryStorer::new();
        let ctx = RequestContext::background();
        ctx.cancel();

        let err = store.create_product(&ctx, product("a", "Tools")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(store.product_count().await, 0);
    }
}
