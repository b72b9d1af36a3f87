//! 商品目录业务服务

use std::sync::Arc;

use ecom_auth_core::{Claims, Role, TokenService, require_role};
use ecom_common::{PagedResult, Pagination, RequestContext};
use ecom_errors::{AppError, AppResult, ErrorKind};
use tracing::{info, warn};

use crate::domain::entities::{
    MAX_TEXT_LEN, NewProduct, NewUser, Product, ProductChanges, ProductFilter, User,
};
use crate::domain::repositories::Storer;
use crate::domain::value_objects::{Email, HashedPassword, ProductId};

use super::commands::{LoginCommand, RegisterUserCommand, Session};

/// 商品目录服务
///
/// 无状态：除了注入的存储和令牌服务不持有任何可变状态，可以在请求之间
/// 通过 `Arc` 共享。业务层不做重试，写操作至多执行一次。
pub struct CatalogService {
    store: Arc<dyn Storer>,
    tokens: Arc<TokenService>,
    max_page_size: u32,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Storer>, tokens: Arc<TokenService>, max_page_size: u32) -> Self {
        Self {
            store,
            tokens,
            max_page_size,
        }
    }

    // ========== 商品 ==========

    /// 创建商品；校验失败时不会触达存储
    pub async fn create_product(
        &self,
        ctx: &RequestContext,
        product: NewProduct,
    ) -> AppResult<Product> {
        product.validate()?;

        let product = self.store.create_product(ctx, product).await?;
        info!(product_id = %product.id, request_id = ctx.request_id(), "Product created");
        Ok(product)
    }

    pub async fn get_product(&self, ctx: &RequestContext, id: ProductId) -> AppResult<Product> {
        self.store.get_product(ctx, id).await
    }

    /// 分页列出商品，页码和页大小先收敛到合法区间
    pub async fn list_products(
        &self,
        ctx: &RequestContext,
        filter: ProductFilter,
        pagination: Pagination,
    ) -> AppResult<PagedResult<Product>> {
        let pagination = pagination.clamped(self.max_page_size);
        self.store.list_products(ctx, filter, pagination).await
    }

    /// 更新商品（仅管理员）
    pub async fn update_product(
        &self,
        ctx: &RequestContext,
        actor: &Claims,
        id: ProductId,
        changes: ProductChanges,
    ) -> AppResult<Product> {
        require_role!(actor, Role::Admin);
        changes.validate()?;

        if changes.is_empty() {
            return self.store.get_product(ctx, id).await;
        }

        let product = self.store.update_product(ctx, id, changes).await?;
        info!(product_id = %id, actor = %actor.sub, "Product updated");
        Ok(product)
    }

    /// 删除商品（仅管理员）
    pub async fn delete_product(
        &self,
        ctx: &RequestContext,
        actor: &Claims,
        id: ProductId,
    ) -> AppResult<()> {
        require_role!(actor, Role::Admin);

        self.store.delete_product(ctx, id).await?;
        info!(product_id = %id, actor = %actor.sub, "Product deleted");
        Ok(())
    }

    // ========== 用户 ==========

    /// 注册用户
    ///
    /// 只有管理员可以创建管理员账号；匿名调用只能注册普通用户。
    pub async fn register_user(
        &self,
        ctx: &RequestContext,
        actor: Option<&Claims>,
        cmd: RegisterUserCommand,
    ) -> AppResult<User> {
        let role = cmd.role.unwrap_or_default();
        if role.is_admin() && !actor.is_some_and(Claims::is_admin) {
            return Err(AppError::forbidden(
                "Only administrators can create administrator accounts",
            ));
        }

        let name = cmd.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::invalid_input("name", "must not be blank"));
        }
        if name.chars().count() > MAX_TEXT_LEN {
            return Err(AppError::invalid_input(
                "name",
                format!("must be at most {MAX_TEXT_LEN} characters"),
            ));
        }
        let email = Email::new(&cmd.email)?;
        let password_hash = hash_password(cmd.password).await?;

        let user = self
            .store
            .create_user(
                ctx,
                NewUser {
                    name,
                    email,
                    password_hash,
                    role,
                },
            )
            .await?;
        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// 校验邮箱和密码并签发令牌
    ///
    /// 邮箱不存在和密码错误返回同样的 Unauthorized，不暴露账号是否存在。
    pub async fn authenticate(&self, ctx: &RequestContext, cmd: LoginCommand) -> AppResult<Session> {
        if cmd.email.trim().is_empty() {
            return Err(AppError::invalid_input("email", "must not be blank"));
        }
        if cmd.password.is_empty() {
            return Err(AppError::invalid_input("password", "must not be blank"));
        }

        let Ok(email) = Email::new(&cmd.email) else {
            return Err(invalid_credentials());
        };

        let user = match self.store.get_user_by_email(ctx, &email).await {
            Ok(user) => Some(user),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };

        let hash = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| HashedPassword::dummy().clone());
        let password_matches = verify_password(hash, cmd.password).await?;

        match user {
            Some(user) if password_matches => {
                let issued = self
                    .tokens
                    .issue(user.id.value(), user.email.as_str(), user.role)?;
                info!(user_id = %user.id, "User logged in");
                Ok(Session {
                    token: issued.token,
                    expires_at: issued.expires_at,
                    user,
                })
            }
            _ => {
                warn!(request_id = ctx.request_id(), "Login rejected");
                Err(invalid_credentials())
            }
        }
    }

    /// 校验令牌，供传输层在调用需要身份的操作前使用
    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.validate_token(token)
    }

    /// 确保初始管理员存在；已存在时原样返回
    pub async fn ensure_admin(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> AppResult<User> {
        let email = Email::new(email)?;
        match self.store.get_user_by_email(ctx, &email).await {
            Ok(user) => {
                if !user.is_admin() {
                    warn!(user_id = %user.id, "Configured admin account exists without admin role");
                }
                return Ok(user);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        let password_hash = hash_password(password.to_string()).await?;
        let new_user = NewUser {
            name: "Administrator".to_string(),
            email: email.clone(),
            password_hash,
            role: Role::Admin,
        };
        match self.store.create_user(ctx, new_user).await {
            Ok(user) => {
                info!(user_id = %user.id, "Initial administrator created");
                Ok(user)
            }
            // 另一个实例同时创建了同一账号
            Err(e) if e.kind() == ErrorKind::Conflict => {
                self.store.get_user_by_email(ctx, &email).await
            }
            Err(e) => Err(e),
        }
    }

    pub fn max_page_size(&self) -> u32 {
        self.max_page_size
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid email or password")
}

/// Argon2 是 CPU 密集操作，放到阻塞线程池里执行
async fn hash_password(password: String) -> AppResult<HashedPassword> {
    tokio::task::spawn_blocking(move || HashedPassword::from_plain(&password))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

async fn verify_password(hash: HashedPassword, password: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || hash.verify(&password))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))
}
