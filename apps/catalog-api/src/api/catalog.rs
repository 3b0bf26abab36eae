//! Catalog API routes
//!
//! Wires the catalog domain to Postgres, the local image store and the
//! Google image index.

use axum::Router;
use domain_catalog::{
    CatalogService, GoogleImageSource, ImagePipeline, PgCatalogRepository, handlers,
};
use std::sync::Arc;
use tracing::info;

use crate::state::AppState;

/// Create catalog router
pub async fn router(state: &AppState) -> eyre::Result<Router> {
    let images = &state.config.images;

    let pipeline = ImagePipeline::new(images.clone());
    pipeline.ensure_directories().await.map_err(|e| {
        eyre::eyre!(
            "Failed to create image directories under {}: {}",
            images.root.display(),
            e
        )
    })?;
    info!(root = %images.root.display(), "Image storage ready");

    let service = CatalogService::new(
        PgCatalogRepository::new(state.db.clone()),
        Arc::new(pipeline),
        Arc::new(GoogleImageSource::new(state.config.image_search.clone())),
        images.public_base_path.clone(),
    );

    Ok(handlers::router(service))
}
