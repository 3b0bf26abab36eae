//! Shared application state passed to route builders and handlers.

use sea_orm::DatabaseConnection;

/// Cloned per handler; the connection shares one pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
}
