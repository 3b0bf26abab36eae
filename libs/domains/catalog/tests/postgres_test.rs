//! Integration tests for the Postgres catalog repository
//!
//! These use real PostgreSQL via testcontainers to check:
//! - the sentinel sub-category upsert
//! - unique constraints surfacing as domain errors
//! - search predicates and relevance ordering in SQL
//!
//! Run with `--ignored`; they need Docker.

use domain_catalog::query::{PageRequest, ProductQuery};
use domain_catalog::*;
use domain_catalog::models::NewProduct;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

async fn insert(repo: &PgCatalogRepository, category_id: i32, code: &str, name: &str) -> Product {
    let sub = repo
        .find_or_create_unspecified_sub_category(category_id)
        .await
        .unwrap();
    repo.create_product(NewProduct {
        merchandise_code: code.to_string(),
        name: name.to_string(),
        unit_price: 10.0,
        sub_category_id: sub.id,
    })
    .await
    .unwrap()
}

fn names(rows: &[models::ProductListing]) -> Vec<&str> {
    rows.iter().map(|r| r.name.as_str()).collect()
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unspecified_sub_category_created_once() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("sentinel_once");
    let category_id = db.create_category(&builder.name("category", "tools")).await;

    let first = repo
        .find_or_create_unspecified_sub_category(category_id)
        .await
        .unwrap();
    let second = repo
        .find_or_create_unspecified_sub_category(category_id)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.category_id, category_id);
    assert!(first.unspecified);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_merchandise_code() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("duplicate_code");
    let category_id = db.create_category(&builder.name("category", "main")).await;
    let code = builder.merchandise_code(1);

    insert(&repo, category_id, &code, "First").await;
    assert!(repo.code_exists(&code).await.unwrap());

    let sub = repo
        .find_or_create_unspecified_sub_category(category_id)
        .await
        .unwrap();
    let result = repo
        .create_product(NewProduct {
            merchandise_code: code.clone(),
            name: "Second".to_string(),
            unit_price: 1.0,
            sub_category_id: sub.id,
        })
        .await;

    assert!(matches!(result, Err(CatalogError::DuplicateCode(c)) if c == code));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_family_name() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());

    repo.create_category("Garden").await.unwrap();
    let result = repo.create_category("Garden").await;

    assert!(matches!(result, Err(CatalogError::DuplicateName(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_families_exclude_sentinel() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());

    repo.create_category("Tools").await.unwrap();
    repo.create_category("Garden").await.unwrap();

    let families = repo.list_families().await.unwrap();
    let names: Vec<&str> = families.iter().map(|c| c.name.as_str()).collect();

    assert_eq!(names, vec!["Garden", "Tools"]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_search_relevance_order() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("relevance");
    let category_id = db.create_category(&builder.name("category", "chairs")).await;

    insert(&repo, category_id, &builder.merchandise_code(1), "Red Chair").await;
    insert(&repo, category_id, &builder.merchandise_code(2), "Chair").await;
    insert(&repo, category_id, &builder.merchandise_code(3), "Chair Cushion").await;
    insert(&repo, category_id, &builder.merchandise_code(4), "Table").await;

    let query = ProductQuery::search("chair", None, PageRequest::default()).unwrap();
    let (rows, total) = repo.query_products(&query).await.unwrap();

    assert_eq!(total, 3);
    assert_eq!(names(&rows), vec!["Chair", "Chair Cushion", "Red Chair"]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_multi_word_search_requires_every_word() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("multi_word");
    let category_id = db.create_category(&builder.name("category", "chairs")).await;

    insert(&repo, category_id, &builder.merchandise_code(1), "Red Office Chair").await;
    insert(&repo, category_id, &builder.merchandise_code(2), "Red Table").await;
    insert(&repo, category_id, &builder.merchandise_code(3), "Blue Chair").await;

    let query = ProductQuery::search("red chair", None, PageRequest::default()).unwrap();
    let (rows, total) = repo.query_products(&query).await.unwrap();

    assert_eq!(total, 1);
    assert_eq!(names(&rows), vec!["Red Office Chair"]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_search_treats_wildcards_literally() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("wildcards");
    let category_id = db.create_category(&builder.name("category", "sale")).await;

    insert(&repo, category_id, &builder.merchandise_code(1), "Discount 50% Off").await;
    insert(&repo, category_id, &builder.merchandise_code(2), "Discount 500 Pack").await;

    let query = ProductQuery::search("50%", None, PageRequest::default()).unwrap();
    let (rows, _) = repo.query_products(&query).await.unwrap();

    assert_eq!(names(&rows), vec!["Discount 50% Off"]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_listing_pages_newest_first_and_skips_deleted() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("listing");
    let category_id = db.create_category(&builder.name("category", "main")).await;

    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(insert(&repo, category_id, &builder.merchandise_code(i), &format!("Item {}", i)).await.id);
    }
    assert!(repo.soft_delete_product(ids[4]).await.unwrap());
    assert!(!repo.soft_delete_product(ids[4]).await.unwrap());

    let query = ProductQuery::list(Some(category_id), PageRequest::new(1, 2));
    let (rows, total) = repo.query_products(&query).await.unwrap();

    assert_eq!(total, 4);
    let listed: Vec<i32> = rows.iter().map(|r| r.id).collect();
    assert_eq!(listed, vec![ids[3], ids[2]]);
    assert_descending(&listed, "first page");

    assert!(repo.get_product(ids[4]).await.unwrap().is_none());
    let record = assert_some(repo.get_product(ids[0]).await.unwrap(), "listed product");
    assert_eq!(record.category.map(|c| c.id), Some(category_id));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_set_and_clear_image() {
    let db = TestDatabase::new().await;
    let repo = PgCatalogRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("image_ref");
    let category_id = db.create_category(&builder.name("category", "main")).await;
    let product = insert(&repo, category_id, &builder.merchandise_code(1), "Lamp").await;

    repo.set_product_image(product.id, Some("product-1-1.jpg".to_string()))
        .await
        .unwrap();
    let record = assert_some(repo.get_product(product.id).await.unwrap(), "product");
    assert_eq!(record.product.image.as_deref(), Some("product-1-1.jpg"));

    repo.set_product_image(product.id, None).await.unwrap();
    let record = assert_some(repo.get_product(product.id).await.unwrap(), "product");
    assert_eq!(record.product.image, None);
}
