//! 领域层
//!
//! 商品和用户实体、值对象以及存储接口

pub mod entities;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use value_objects::*;
