//! 实体模块

mod product;
mod user;

pub use product::{NewProduct, Product, ProductChanges, ProductFilter, MAX_PRICE, MAX_TEXT_LEN};
pub use user::{NewUser, User};
