//! 存储实现

mod memory;
mod postgres;
mod rows;

pub use memory::InMemoryStorer;
pub use postgres::PostgresStorer;
