//! gRPC 适配器（`ecom.v1.Catalog`）

mod conversions;
pub mod proto;
mod service;

pub use conversions::timestamp;
pub use proto::catalog_server::CatalogServer;
pub use service::CatalogGrpcService;
