//! Catalog Domain
//!
//! Products organised in families, their images and the external image index
//! they can be imported from.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, multipart forms, image serving
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌──────────────┐     ┌───────────────┐
//! │   Service   │ ──▶ │  ImageStore  │     │  ImageSource  │
//! └──────┬──────┘     │ (variants on │     │ (search + URL │
//!        │            │    disk)     │     │    fetch)     │
//! ┌──────▼──────┐     └──────────────┘     └───────────────┘
//! │ Repository  │  ← Data access (trait + Postgres / in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Query     │  ← Product query: predicate tree, ordering, page window
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_catalog::{
//!     handlers, CatalogService, GoogleImageSource, ImagePipeline, ImageSearchConfig,
//!     ImageStorageConfig, PgCatalogRepository,
//! };
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let storage = ImageStorageConfig::default();
//! let base_path = storage.public_base_path.clone();
//! let pipeline = ImagePipeline::new(storage);
//! pipeline.ensure_directories().await?;
//!
//! let service = CatalogService::new(
//!     PgCatalogRepository::new(db),
//!     Arc::new(pipeline),
//!     Arc::new(GoogleImageSource::new(ImageSearchConfig::default())),
//!     base_path,
//! );
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod acquisition;
pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod images;
pub mod models;
pub mod postgres;
pub mod query;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use acquisition::{FetchedImage, GoogleImageSource, ImageSource};
pub use config::{ImageSearchConfig, ImageStorageConfig};
pub use error::{CatalogError, CatalogResult};
pub use handlers::{ApiDoc, router};
pub use images::{ImagePipeline, ImageStore};
pub use models::{
    Category, CreateCategory, CreateProduct, GeneratedCode, ImageSearchResults, ImageSize,
    ImageUploaded, ImageUpload, ImageUrls, MessageResponse, Product, ProductCreated,
    ProductDetail, ProductListItem, ProductStatus, ProductSummary, UpdateProduct,
};
pub use postgres::PgCatalogRepository;
pub use query::{PageInfo, PageRequest, Paginated, ProductQuery};
pub use repository::{CatalogRepository, InMemoryCatalogRepository};
pub use service::CatalogService;
