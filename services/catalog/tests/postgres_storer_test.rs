//! PostgreSQL 存储测试
//!
//! 需要设置 `TEST_DATABASE_URL`，未设置时跳过。每个测试使用唯一的分类和
//! 邮箱，可以在同一个库上并行执行。

use ecom_auth_core::Role;
use ecom_catalog::MIGRATOR;
use ecom_catalog::domain::entities::{NewProduct, NewUser, ProductChanges, ProductFilter};
use ecom_catalog::domain::repositories::Storer;
use ecom_catalog::domain::value_objects::{Email, HashedPassword, ProductId};
use ecom_catalog::infrastructure::persistence::PostgresStorer;
use ecom_common::{Pagination, RequestContext};
use ecom_errors::ErrorKind;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

async fn storer() -> Option<PostgresStorer> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return None;
    };
    let pool = PgPool::connect(&url).await.unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    Some(PostgresStorer::new(pool))
}

fn product(name: &str, category: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        category: category.to_string(),
        price: Decimal::new(999, 2),
        count_in_stock: 5,
        ..Default::default()
    }
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::now_v7().simple())
}

#[tokio::test]
async fn test_product_lifecycle() {
    let Some(store) = storer().await else { return };
    let ctx = RequestContext::background();
    let category = unique("tools");

    let created = store
        .create_product(&ctx, product("Widget", &category))
        .await
        .unwrap();
    assert!(created.id.value() > 0);
    assert_eq!(created.price, Decimal::new(999, 2));

    let fetched = store.get_product(&ctx, created.id).await.unwrap();
    assert_eq!(fetched.name, "Widget");
    assert_eq!(fetched.count_in_stock, 5);

    let changes = ProductChanges {
        count_in_stock: Some(7),
        ..Default::default()
    };
    let updated = store
        .update_product(&ctx, created.id, changes)
        .await
        .unwrap();
    assert_eq!(updated.count_in_stock, 7);
    assert_eq!(updated.name, "Widget");
    assert!(updated.updated_at >= created.updated_at);

    store.delete_product(&ctx, created.id).await.unwrap();
    let err = store.get_product(&ctx, created.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let Some(store) = storer().await else { return };
    let ctx = RequestContext::background();
    let missing = ProductId(i64::MAX);

    let err = store.delete_product(&ctx, missing).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = store
        .update_product(
            &ctx,
            missing,
            ProductChanges {
                name: Some("x".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_list_counts_and_pages_within_category() {
    let Some(store) = storer().await else { return };
    let ctx = RequestContext::background();
    let category = unique("list");

    for name in ["Red Widget", "Blue Widget", "Gadget", "50% Widget"] {
        store
            .create_product(&ctx, product(name, &category))
            .await
            .unwrap();
    }

    let all = store
        .list_products(
            &ctx,
            ProductFilter::new(Some(category.clone()), None),
            Pagination::new(1, 3),
        )
        .await
        .unwrap();
    assert_eq!(all.total, 4);
    assert_eq!(all.items.len(), 3);
    assert!(all.items.windows(2).all(|w| w[0].id < w[1].id));

    let searched = store
        .list_products(
            &ctx,
            ProductFilter::new(Some(category.clone()), Some("widget".to_string())),
            Pagination::new(1, 10),
        )
        .await
        .unwrap();
    assert_eq!(searched.total, 3);

    let literal = store
        .list_products(
            &ctx,
            ProductFilter::new(Some(category.clone()), Some("50%".to_string())),
            Pagination::new(1, 10),
        )
        .await
        .unwrap();
    assert_eq!(literal.total, 1);

    let beyond = store
        .list_products(
            &ctx,
            ProductFilter::new(Some(category), None),
            Pagination::new(5, 10),
        )
        .await
        .unwrap();
    assert_eq!(beyond.total, 4);
    assert!(beyond.items.is_empty());
}

#[tokio::test]
async fn test_negative_stock_violates_check_constraint() {
    let Some(store) = storer().await else { return };
    let ctx = RequestContext::background();

    let err = store
        .create_product(
            &ctx,
            NewProduct {
                count_in_stock: -1,
                ..product("Widget", &unique("check"))
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.field(), Some("count_in_stock"));
    assert!(!err.public_detail().contains("products"));
}

#[tokio::test]
async fn test_users_are_unique_by_email() {
    let Some(store) = storer().await else { return };
    let ctx = RequestContext::background();
    let email = Email::new(format!("{}@example.com", unique("ada"))).unwrap();
    let user = NewUser {
        name: "Ada".to_string(),
        email: email.clone(),
        password_hash: HashedPassword::from_plain("correct horse").unwrap(),
        role: Role::Admin,
    };

    let created = store.create_user(&ctx, user.clone()).await.unwrap();
    assert!(created.is_admin());

    let err = store.create_user(&ctx, user).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let fetched = store.get_user_by_email(&ctx, &email).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert!(fetched.verify_password("correct horse"));

    let missing = Email::new(format!("{}@example.com", unique("nobody"))).unwrap();
    let err = store.get_user_by_email(&ctx, &missing).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
