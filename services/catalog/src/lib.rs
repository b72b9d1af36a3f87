//! ecom-catalog - 商品目录服务
//!
//! 同一个业务层通过 HTTP（`ecom-api`）和 gRPC（`ecom-grpc`）两个入口对外提供。

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod startup;

use sqlx::migrate::Migrator;

/// 内嵌的数据库迁移
pub static MIGRATOR: Migrator = sqlx::migrate!();
