//! Handler tests for the Catalog domain
//!
//! These drive the catalog router directly with `oneshot()`:
//! - query and multipart decoding
//! - response bodies and status codes
//! - error envelopes
//!
//! Persistence is the in-memory repository and images go to a temporary
//! directory, so no database or network is needed.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use domain_catalog::*;
use http_body_util::BodyExt;
use image::{ImageFormat, RgbImage};
use serde_json::{Value, json};
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt; // For oneshot()

const BOUNDARY: &str = "catalog-test-boundary";

struct TestApp {
    repo: InMemoryCatalogRepository,
    service: CatalogService<InMemoryCatalogRepository>,
    _images: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let images = TempDir::new().unwrap();
        let pipeline = ImagePipeline::new(ImageStorageConfig::new(images.path()));
        pipeline.ensure_directories().await.unwrap();

        let repo = InMemoryCatalogRepository::new();
        let service = CatalogService::new(
            repo.clone(),
            Arc::new(pipeline),
            Arc::new(GoogleImageSource::new(ImageSearchConfig::default())),
            "/api/catalog/images",
        );

        Self {
            repo,
            service,
            _images: images,
        }
    }

    fn router(&self) -> Router {
        handlers::router(self.service.clone())
    }

    async fn category(&self, name: &str) -> Category {
        self.repo.create_category(name).await.unwrap()
    }

    async fn product(&self, code: &str, name: &str, category_id: i32) -> ProductSummary {
        self.service
            .create_product(
                CreateProduct {
                    merchandise_code: code.to_string(),
                    name: name.to_string(),
                    category_id,
                    unit_price: 9.5,
                },
                None,
            )
            .await
            .unwrap()
            .product
    }
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| image::Rgb([x as u8, y as u8, 90]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, Vec<u8>),
}

fn multipart(method: &str, uri: &str, parts: Vec<Part>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                        name, value
                    )
                    .as_bytes(),
                );
            }
            Part::File(name, content_type, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"upload\"\r\nContent-Type: {}\r\n\r\n",
                        name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(&bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_list_products_returns_page_info() {
    let app = TestApp::new().await;
    let tools = app.category("Tools").await;
    for i in 0..3 {
        app.product(&format!("C-{}", i), &format!("Hammer {}", i), tools.id)
            .await;
    }

    let response = app
        .router()
        .oneshot(get("/products?page=1&limit=2"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: Paginated<ProductListItem> = json_body(response.into_body()).await;
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].name, "Hammer 2");
    assert_eq!(page.items[0].category_name, "Tools");
    assert_eq!(page.page_info.total_items, 3);
    assert_eq!(page.page_info.total_pages, 2);
    assert!(page.page_info.has_next_page);
    assert!(!page.page_info.has_previous_page);
}

#[tokio::test]
async fn test_list_products_rejects_limit_over_100() {
    let app = TestApp::new().await;

    let response = app
        .router()
        .oneshot(get("/products?limit=101"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_search_ranks_prefix_matches_first() {
    let app = TestApp::new().await;
    let tools = app.category("Tools").await;
    app.product("S-1", "Red Chair", tools.id).await;
    app.product("S-2", "Chair", tools.id).await;
    app.product("S-3", "Armchair", tools.id).await;

    let response = app
        .router()
        .oneshot(get("/products/search?term=chair"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: Paginated<ProductListItem> = json_body(response.into_body()).await;
    let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Chair", "Armchair", "Red Chair"]);
}

#[tokio::test]
async fn test_blank_search_returns_empty_page() {
    let app = TestApp::new().await;
    let tools = app.category("Tools").await;
    app.product("B-1", "Chair", tools.id).await;

    let response = app
        .router()
        .oneshot(get("/products/search?term=%20%20&page=3&limit=5"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page: Paginated<ProductListItem> = json_body(response.into_body()).await;
    assert!(page.items.is_empty());
    assert_eq!(page.page_info.page, 3);
    assert_eq!(page.page_info.limit, 5);
    assert_eq!(page.page_info.total_items, 0);
}

#[tokio::test]
async fn test_create_product_with_image_returns_201() {
    let app = TestApp::new().await;
    let tools = app.category("Tools").await;
    let category_id = tools.id.to_string();

    let request = multipart(
        "POST",
        "/products",
        vec![
            Part::Text("merchandise_code", "PROD-1"),
            Part::Text("name", "  Claw Hammer "),
            Part::Text("category_id", &category_id),
            Part::Text("unit_price", "12.5"),
            Part::File("image", "image/png", png(40, 30)),
        ],
    );

    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: ProductCreated = json_body(response.into_body()).await;
    assert_eq!(created.product.name, "Claw Hammer");
    assert_eq!(created.product.unit_price, 12.5);

    let filename = created.product.image.expect("image stored");
    assert!(filename.starts_with(&format!("product-{}-", created.product.id)));
    assert_eq!(
        created.product.image_url,
        Some(format!("/api/catalog/images/{}", filename))
    );

    let image = app
        .router()
        .oneshot(get(&format!("/images/{}?size=thumbnails", filename)))
        .await
        .unwrap();
    assert_eq!(image.status(), StatusCode::OK);
    assert_eq!(image.headers()[header::CONTENT_TYPE], "image/jpeg");
    let bytes = image.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[tokio::test]
async fn test_create_product_for_unknown_family_returns_404() {
    let app = TestApp::new().await;

    let request = multipart(
        "POST",
        "/products",
        vec![
            Part::Text("merchandise_code", "PROD-404"),
            Part::Text("name", "Orphan"),
            Part::Text("category_id", "999"),
            Part::Text("unit_price", "1"),
        ],
    );

    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_product_duplicate_code_returns_409() {
    let app = TestApp::new().await;
    let tools = app.category("Tools").await;
    app.product("DUP-1", "First", tools.id).await;
    let category_id = tools.id.to_string();

    let request = multipart(
        "POST",
        "/products",
        vec![
            Part::Text("merchandise_code", "DUP-1"),
            Part::Text("name", "Second"),
            Part::Text("category_id", &category_id),
            Part::Text("unit_price", "1"),
        ],
    );

    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_product_missing_field_returns_400() {
    let app = TestApp::new().await;

    let request = multipart(
        "POST",
        "/products",
        vec![Part::Text("name", "No code")],
    );

    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_rejects_unsupported_media_type() {
    let app = TestApp::new().await;
    let tools = app.category("Tools").await;
    let product = app.product("PDF-1", "Manual", tools.id).await;

    let request = multipart(
        "POST",
        &format!("/products/{}/image", product.id),
        vec![Part::File("image", "application/pdf", b"%PDF-1.4".to_vec())],
    );

    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_upload_replaces_previous_image() {
    let app = TestApp::new().await;
    let tools = app.category("Tools").await;
    let product = app.product("IMG-1", "Saw", tools.id).await;
    let uri = format!("/products/{}/image", product.id);

    let first: ImageUploaded = json_body(
        app.router()
            .oneshot(multipart("POST", &uri, vec![Part::File("image", "image/png", png(20, 20))]))
            .await
            .unwrap()
            .into_body(),
    )
    .await;

    // Filenames carry a millisecond timestamp
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let response = app
        .router()
        .oneshot(multipart("POST", &uri, vec![Part::File("image", "image/png", png(30, 30))]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let second: ImageUploaded = json_body(response.into_body()).await;
    assert_ne!(first.filename, second.filename);

    let old = app
        .router()
        .oneshot(get(&format!("/images/{}", first.filename)))
        .await
        .unwrap();
    assert_eq!(old.status(), StatusCode::NOT_FOUND);

    let detail: ProductDetail = json_body(
        app.router()
            .oneshot(get(&format!("/products/{}", product.id)))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    assert_eq!(detail.image, Some(second.filename));
}

#[tokio::test]
async fn test_delete_image_without_image_returns_400() {
    let app = TestApp::new().await;
    let tools = app.category("Tools").await;
    let product = app.product("NI-1", "Plain", tools.id).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/products/{}/image", product.id))
        .body(Body::empty())
        .unwrap();

    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_product_changes_family_and_price() {
    let app = TestApp::new().await;
    let tools = app.category("Tools").await;
    let garden = app.category("Garden").await;
    let product = app.product("UP-1", "Rake", tools.id).await;
    let garden_id = garden.id.to_string();

    let request = multipart(
        "PATCH",
        &format!("/products/{}", product.id),
        vec![
            Part::Text("category_id", &garden_id),
            Part::Text("unit_price", "3.25"),
        ],
    );

    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let detail: ProductDetail = json_body(response.into_body()).await;
    assert_eq!(detail.name, "Rake");
    assert_eq!(detail.unit_price, 3.25);
    assert_eq!(detail.category_id, Some(garden.id));
    assert_eq!(detail.category_name, "Garden");
}

#[tokio::test]
async fn test_update_with_undecodable_image_returns_422() {
    let app = TestApp::new().await;
    let tools = app.category("Tools").await;
    let product = app.product("BAD-1", "Level", tools.id).await;

    let request = multipart(
        "PATCH",
        &format!("/products/{}", product.id),
        vec![
            Part::Text("name", "Spirit Level"),
            Part::File("image", "image/png", b"not a png".to_vec()),
        ],
    );

    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let detail: ProductDetail = json_body(
        app.router()
            .oneshot(get(&format!("/products/{}", product.id)))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    assert_eq!(detail.name, "Level");
}

#[tokio::test]
async fn test_delete_product_hides_it() {
    let app = TestApp::new().await;
    let tools = app.category("Tools").await;
    let product = app.product("DEL-1", "Chisel", tools.id).await;

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/products/{}", product.id))
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .router()
        .oneshot(get(&format!("/products/{}", product.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_product_invalid_id_returns_400() {
    let app = TestApp::new().await;

    let response = app.router().oneshot(get("/products/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_ID");
}

#[tokio::test]
async fn test_families_exclude_sentinel_and_sort_by_name() {
    let app = TestApp::new().await;
    app.category("Tools").await;

    let request = Request::builder()
        .method("POST")
        .uri("/families")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "name": "Garden" })).unwrap(),
        ))
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.router().oneshot(get("/families")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let families: Vec<Category> = json_body(response.into_body()).await;
    let names: Vec<&str> = families.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Garden", "Tools"]);
}

#[tokio::test]
async fn test_generate_code_format() {
    let app = TestApp::new().await;

    let response = app.router().oneshot(get("/generate-code")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let generated: GeneratedCode = json_body(response.into_body()).await;
    let parts: Vec<&str> = generated.code.split('-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "PROD");
    assert_eq!(parts[1].len(), 8);
    let suffix: u32 = parts[2].parse().unwrap();
    assert!((10_000..100_000).contains(&suffix));
}

#[tokio::test]
async fn test_image_search_without_credentials_returns_503() {
    let app = TestApp::new().await;

    let response = app
        .router()
        .oneshot(get("/images/search?term=hammer"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_serve_unknown_image_returns_404() {
    let app = TestApp::new().await;

    let response = app
        .router()
        .oneshot(get("/images/product-1-1.jpg"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
