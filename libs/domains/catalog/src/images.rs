//! Image derivation pipeline.
//!
//! Every stored image exists as three JPEG variants sharing one filename:
//!
//! | Variant      | Geometry                                   | Quality |
//! |--------------|--------------------------------------------|---------|
//! | `thumbnails` | 200×200, centered crop                     | 80      |
//! | `medium`     | fit inside 800×600, never upscaled         | 85      |
//! | `original`   | as-is unless larger than 1920 on any side  | 90      |

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

use crate::config::ImageStorageConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::models::ImageSize;

/// Storage contract for product images
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Validate, derive and write all variants; returns the generated filename
    async fn store(&self, bytes: Vec<u8>, content_type: &str, product_id: i32) -> CatalogResult<String>;

    /// Delete every variant of `filename`; missing files are ignored
    async fn remove(&self, filename: &str) -> CatalogResult<()>;

    /// Path of one variant, whether or not it exists
    fn locate(&self, filename: &str, size: ImageSize) -> PathBuf;

    /// Whether a variant file is present
    async fn exists(&self, filename: &str, size: ImageSize) -> bool;

    /// Largest accepted upload in bytes
    fn max_upload_bytes(&self) -> usize;
}

/// Target geometry of a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Fill exactly `width`×`height`, cropping the overflow
    Cover { width: u32, height: u32 },
    /// Scale down to fit inside `width`×`height`; smaller images are untouched
    Inside { width: u32, height: u32 },
}

impl Fit {
    /// Output dimensions for a `width`×`height` source.
    pub fn target_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Fit::Cover {
                width: tw,
                height: th,
            } => (tw, th),
            Fit::Inside {
                width: max_w,
                height: max_h,
            } => {
                if width <= max_w && height <= max_h {
                    return (width, height);
                }
                let scale = f64::min(max_w as f64 / width as f64, max_h as f64 / height as f64);
                let w = ((width as f64 * scale).round() as u32).clamp(1, max_w);
                let h = ((height as f64 * scale).round() as u32).clamp(1, max_h);
                (w, h)
            }
        }
    }
}

/// Geometry and JPEG quality of one variant
#[derive(Debug, Clone, Copy)]
pub struct VariantSpec {
    pub size: ImageSize,
    pub fit: Fit,
    pub quality: u8,
}

pub const VARIANTS: [VariantSpec; 3] = [
    VariantSpec {
        size: ImageSize::Thumbnails,
        fit: Fit::Cover {
            width: 200,
            height: 200,
        },
        quality: 80,
    },
    VariantSpec {
        size: ImageSize::Medium,
        fit: Fit::Inside {
            width: 800,
            height: 600,
        },
        quality: 85,
    },
    VariantSpec {
        size: ImageSize::Original,
        fit: Fit::Inside {
            width: 1920,
            height: 1920,
        },
        quality: 90,
    },
];

/// Filesystem-backed [`ImageStore`]
#[derive(Clone, Debug)]
pub struct ImagePipeline {
    config: ImageStorageConfig,
}

impl ImagePipeline {
    pub fn new(config: ImageStorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ImageStorageConfig {
        &self.config
    }

    /// Creates the three variant directories.
    pub async fn ensure_directories(&self) -> io::Result<()> {
        for size in ImageSize::ALL {
            let dir = self.config.root.join(size.to_string());
            tokio::fs::create_dir_all(&dir).await?;
            debug!(path = %dir.display(), "Image directory ready");
        }
        Ok(())
    }

    fn validate(&self, bytes: &[u8], content_type: &str) -> CatalogResult<()> {
        if !content_type.starts_with("image/") {
            return Err(CatalogError::UnsupportedMediaType(content_type.to_string()));
        }
        if bytes.len() > self.config.max_upload_bytes {
            return Err(CatalogError::PayloadTooLarge {
                limit: self.config.max_upload_bytes,
            });
        }
        Ok(())
    }
}

/// Decodes once and encodes every variant.
fn derive_variants(bytes: &[u8]) -> CatalogResult<Vec<(ImageSize, Vec<u8>)>> {
    let source = image::load_from_memory(bytes)
        .map_err(|e| CatalogError::ImageProcessingFailed(e.to_string()))?;

    VARIANTS
        .iter()
        .map(|spec| {
            let resized = resize(&source, spec.fit);
            encode_jpeg(&resized, spec.quality).map(|encoded| (spec.size, encoded))
        })
        .collect()
}

fn resize(source: &DynamicImage, fit: Fit) -> DynamicImage {
    let (width, height) = (source.width(), source.height());
    match fit {
        Fit::Cover {
            width: tw,
            height: th,
        } => source.resize_to_fill(tw, th, FilterType::Lanczos3),
        Fit::Inside { .. } => {
            let (tw, th) = fit.target_dimensions(width, height);
            if (tw, th) == (width, height) {
                source.clone()
            } else {
                source.resize_exact(tw, th, FilterType::Lanczos3)
            }
        }
    }
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> CatalogResult<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, quality)
        .encode_image(&rgb)
        .map_err(|e| CatalogError::ImageProcessingFailed(e.to_string()))?;
    Ok(encoded)
}

#[async_trait]
impl ImageStore for ImagePipeline {
    #[instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    async fn store(&self, bytes: Vec<u8>, content_type: &str, product_id: i32) -> CatalogResult<String> {
        self.validate(&bytes, content_type)?;

        let filename = format!(
            "product-{}-{}.jpg",
            product_id,
            chrono::Utc::now().timestamp_millis()
        );

        let variants = tokio::task::spawn_blocking(move || derive_variants(&bytes))
            .await
            .map_err(|e| CatalogError::ImageProcessingFailed(e.to_string()))??;

        for (size, encoded) in variants {
            let path = self.locate(&filename, size);
            tokio::fs::write(&path, encoded).await.map_err(|e| {
                CatalogError::ImageProcessingFailed(format!("{}: {}", path.display(), e))
            })?;
        }

        info!(%filename, "Stored product image");
        Ok(filename)
    }

    #[instrument(skip(self))]
    async fn remove(&self, filename: &str) -> CatalogResult<()> {
        if filename.is_empty() {
            return Ok(());
        }

        let mut failure = None;
        for size in ImageSize::ALL {
            let path = self.locate(filename, size);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "Removed image variant"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to remove image variant");
                    failure.get_or_insert(CatalogError::ImageProcessingFailed(e.to_string()));
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn locate(&self, filename: &str, size: ImageSize) -> PathBuf {
        self.config.root.join(size.to_string()).join(filename)
    }

    async fn exists(&self, filename: &str, size: ImageSize) -> bool {
        tokio::fs::try_exists(self.locate(filename, size))
            .await
            .unwrap_or(false)
    }

    fn max_upload_bytes(&self) -> usize {
        self.config.max_upload_bytes
    }
}
