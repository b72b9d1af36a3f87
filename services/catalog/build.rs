//! 生成 `ecom.v1.Catalog` gRPC 服务代码
//!
//! 消息类型在 `src/api/grpc/proto.rs` 中用 prost 派生宏手写，这里只生成
//! 服务端和客户端骨架，构建时不依赖 protoc。

fn method(name: &str, route: &str, input: &str, output: &str) -> tonic_build::manual::Method {
    tonic_build::manual::Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::api::grpc::proto::{input}"))
        .output_type(format!("crate::api::grpc::proto::{output}"))
        .codec_path("tonic::codec::ProstCodec")
        .build()
}

fn main() {
    let service = tonic_build::manual::Service::builder()
        .name("Catalog")
        .package("ecom.v1")
        .method(method(
            "create_product",
            "CreateProduct",
            "CreateProductRequest",
            "ProductResponse",
        ))
        .method(method(
            "get_product",
            "GetProduct",
            "GetProductRequest",
            "ProductResponse",
        ))
        .method(method(
            "list_products",
            "ListProducts",
            "ListProductsRequest",
            "ListProductsResponse",
        ))
        .method(method(
            "update_product",
            "UpdateProduct",
            "UpdateProductRequest",
            "ProductResponse",
        ))
        .method(method(
            "delete_product",
            "DeleteProduct",
            "DeleteProductRequest",
            "DeleteProductResponse",
        ))
        .method(method(
            "register_user",
            "RegisterUser",
            "RegisterUserRequest",
            "UserResponse",
        ))
        .method(method("login", "Login", "LoginRequest", "LoginResponse"))
        .build();

    tonic_build::manual::Builder::new().compile(&[service]);
}
