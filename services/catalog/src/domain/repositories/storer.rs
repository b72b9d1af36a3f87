//! 商品目录存储接口
//!
//! 业务层只依赖这个 trait。实现方必须把驱动错误映射成统一错误分类
//! (NotFound / Conflict / Unavailable / Cancelled / Internal)，并且每个调用
//! 都受 [`RequestContext`] 的截止时间和取消信号约束。

use async_trait::async_trait;
use ecom_common::{PagedResult, Pagination, RequestContext};
use ecom_errors::AppResult;

use crate::domain::entities::{NewProduct, NewUser, Product, ProductChanges, ProductFilter, User};
use crate::domain::value_objects::{Email, ProductId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storer: Send + Sync {
    /// 创建商品，返回带 ID 的实体
    async fn create_product(&self, ctx: &RequestContext, product: NewProduct) -> AppResult<Product>;

    /// 不存在时返回 NotFound
    async fn get_product(&self, ctx: &RequestContext, id: ProductId) -> AppResult<Product>;

    /// 按 ID 升序分页；分页参数已由调用方收敛
    async fn list_products(
        &self,
        ctx: &RequestContext,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> AppResult<PagedResult<Product>>;

    /// 部分更新，返回更新后的实体
    async fn update_product(
        &self,
        ctx: &RequestContext,
        id: ProductId,
        changes: ProductChanges,
    ) -> AppResult<Product>;

    async fn delete_product(&self, ctx: &RequestContext, id: ProductId) -> AppResult<()>;

    /// 邮箱重复时返回 Conflict
    async fn create_user(&self, ctx: &RequestContext, user: NewUser) -> AppResult<User>;

    async fn get_user_by_email(&self, ctx: &RequestContext, email: &Email) -> AppResult<User>;
}
