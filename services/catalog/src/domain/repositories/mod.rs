//! 存储接口

mod storer;

pub use storer::Storer;

#[cfg(test)]
pub use storer::MockStorer;
