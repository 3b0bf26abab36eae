//! API routes module

pub mod catalog;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub async fn routes(state: &AppState) -> eyre::Result<Router> {
    Ok(Router::new()
        .nest("/catalog", catalog::router(state).await?)
        .merge(health::router(state.clone())))
}
