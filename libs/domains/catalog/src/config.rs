use core_config::{ConfigError, FromEnv, env_optional, env_or_default, env_parse};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_MAX_FETCH_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Where derived images live and how they are addressed publicly
#[derive(Clone, Debug)]
pub struct ImageStorageConfig {
    /// Parent of the `thumbnails`, `medium` and `original` directories
    pub root: PathBuf,
    /// Upload size ceiling in bytes
    pub max_upload_bytes: usize,
    /// URL prefix images are served under
    pub public_base_path: String,
}

impl ImageStorageConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }
}

impl Default for ImageStorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("uploads/products"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            public_base_path: "/api/catalog/images".to_string(),
        }
    }
}

impl FromEnv for ImageStorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            root: PathBuf::from(env_or_default("IMAGE_STORAGE_ROOT", "uploads/products")),
            max_upload_bytes: env_parse("IMAGE_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            public_base_path: env_or_default("IMAGE_PUBLIC_BASE_PATH", "/api/catalog/images"),
        })
    }
}

/// Google Custom Search credentials and transfer limits
#[derive(Clone, Debug)]
pub struct ImageSearchConfig {
    pub api_key: Option<String>,
    pub search_engine_id: Option<String>,
    pub endpoint: String,
    pub search_timeout: Duration,
    pub fetch_timeout: Duration,
    pub max_fetch_bytes: usize,
}

impl Default for ImageSearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            search_engine_id: None,
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            search_timeout: Duration::from_secs(10),
            fetch_timeout: Duration::from_secs(15),
            max_fetch_bytes: DEFAULT_MAX_FETCH_BYTES,
        }
    }
}

impl FromEnv for ImageSearchConfig {
    /// Credentials are optional here; their absence is reported when a search is attempted.
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = env_optional("GOOGLE_API_KEY");
        let search_engine_id = env_optional("GOOGLE_SEARCH_ENGINE_ID");

        if api_key.is_none() || search_engine_id.is_none() {
            tracing::warn!("Google image search credentials not set; image search disabled");
        }

        Ok(Self {
            api_key,
            search_engine_id,
            endpoint: env_or_default("GOOGLE_SEARCH_ENDPOINT", DEFAULT_SEARCH_ENDPOINT),
            ..Default::default()
        })
    }
}
