use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::acquisition::{ImageSource, MAX_SEARCH_RESULTS};
use crate::error::{CatalogError, CatalogResult};
use crate::images::ImageStore;
use crate::models::{
    Category, CreateCategory, CreateProduct, GeneratedCode, ImageSearchResults, ImageSize,
    ImageUploaded, ImageUpload, ImageUrls, MessageResponse, NewProduct, ProductCreated,
    ProductDetail, ProductListItem, ProductSummary, UpdateProduct,
};
use crate::query::{PageInfo, PageRequest, Paginated, ProductQuery};
use crate::repository::CatalogRepository;

const CODE_GENERATION_ATTEMPTS: usize = 10;

/// Service layer for catalog business logic
pub struct CatalogService<R: CatalogRepository> {
    repository: Arc<R>,
    images: Arc<dyn ImageStore>,
    image_source: Arc<dyn ImageSource>,
    public_base_path: String,
}

impl<R: CatalogRepository> Clone for CatalogService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            images: Arc::clone(&self.images),
            image_source: Arc::clone(&self.image_source),
            public_base_path: self.public_base_path.clone(),
        }
    }
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(
        repository: R,
        images: Arc<dyn ImageStore>,
        image_source: Arc<dyn ImageSource>,
        public_base_path: impl Into<String>,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            images,
            image_source,
            public_base_path: public_base_path.into(),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.images.max_upload_bytes()
    }

    /// Listed products, newest first, optionally within one family
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        category_id: Option<i32>,
        page: PageRequest,
    ) -> CatalogResult<Paginated<ProductListItem>> {
        self.run_query(ProductQuery::list(category_id, page)).await
    }

    /// Relevance-ranked text search; a blank term returns an empty page
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        term: &str,
        page: PageRequest,
        category_id: Option<i32>,
    ) -> CatalogResult<Paginated<ProductListItem>> {
        match ProductQuery::search(term, category_id, page) {
            Some(query) => self.run_query(query).await,
            None => Ok(Paginated {
                items: Vec::new(),
                page_info: PageInfo::empty(page),
            }),
        }
    }

    async fn run_query(&self, query: ProductQuery) -> CatalogResult<Paginated<ProductListItem>> {
        let (rows, total) = self.repository.query_products(&query).await?;
        Ok(Paginated {
            items: rows
                .into_iter()
                .map(|row| row.into_item(&self.public_base_path))
                .collect(),
            page_info: PageInfo::new(query.page, total),
        })
    }

    /// Create a product; a failing image leaves the product without one
    #[instrument(skip(self, input, image), fields(code = %input.merchandise_code))]
    pub async fn create_product(
        &self,
        input: CreateProduct,
        image: Option<ImageUpload>,
    ) -> CatalogResult<ProductCreated> {
        input.validate()?;

        let category = self
            .repository
            .find_category(input.category_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Family", input.category_id))?;
        let sub_category = self
            .repository
            .find_or_create_unspecified_sub_category(category.id)
            .await?;

        let product = self
            .repository
            .create_product(NewProduct {
                merchandise_code: input.merchandise_code,
                name: input.name,
                unit_price: input.unit_price,
                sub_category_id: sub_category.id,
            })
            .await?;

        let mut filename = None;
        if let Some(upload) = image {
            match self.attach_image(product.id, upload, None).await {
                Ok(stored) => filename = Some(stored),
                Err(e) => warn!(product_id = product.id, error = %e, "Image rejected, product created without image"),
            }
        }

        let image_url = ImageUrls::build(&self.public_base_path, filename.as_deref()).image_url;
        Ok(ProductCreated {
            message: "Product created".to_string(),
            product: ProductSummary {
                id: product.id,
                merchandise_code: product.merchandise_code,
                name: product.name,
                unit_price: product.unit_price,
                image: filename,
                image_url,
            },
        })
    }

    /// Update a product; a failing image aborts the whole update
    #[instrument(skip(self, input, image))]
    pub async fn update_product(
        &self,
        id: i32,
        input: UpdateProduct,
        image: Option<ImageUpload>,
    ) -> CatalogResult<ProductDetail> {
        input.validate()?;

        let mut product = self
            .repository
            .get_product(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", id))?
            .product;

        if let Some(category_id) = input.category_id {
            let category = self
                .repository
                .find_category(category_id)
                .await?
                .ok_or_else(|| CatalogError::not_found("Family", category_id))?;
            product.sub_category_id = self
                .repository
                .find_or_create_unspecified_sub_category(category.id)
                .await?
                .id;
        }
        if let Some(name) = input.name {
            product.name = name;
        }
        if let Some(unit_price) = input.unit_price {
            product.unit_price = unit_price;
        }

        let mut stored = None;
        let mut replaced = None;
        if let Some(upload) = image {
            let filename = self
                .images
                .store(upload.bytes, &upload.content_type, id)
                .await
                .map_err(|e| match e {
                    CatalogError::ImageProcessingFailed(_) => e,
                    other => CatalogError::ImageProcessingFailed(other.to_string()),
                })?;
            stored = Some(filename.clone());
            replaced = product.image.replace(filename);
        }

        if let Err(e) = self.repository.update_product(product).await {
            if let Some(filename) = &stored {
                self.discard_image(filename).await;
            }
            return Err(e);
        }

        if let Some(old) = replaced.filter(|old| stored.as_ref() != Some(old)) {
            self.discard_image(&old).await;
        }

        self.get_product(id).await
    }

    /// A listed product with its family and image URLs
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> CatalogResult<ProductDetail> {
        let record = self
            .repository
            .get_product(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", id))?;
        Ok(ProductDetail::new(record, &self.public_base_path))
    }

    /// Soft-delete a product and drop its image files
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> CatalogResult<()> {
        let image = self.current_image(id).await?;

        if !self.repository.soft_delete_product(id).await? {
            return Err(CatalogError::not_found("Product", id));
        }
        if let Some(filename) = image {
            self.discard_image(&filename).await;
        }

        info!(product_id = id, "Deleted product");
        Ok(())
    }

    /// Replace a product's image with an uploaded one
    #[instrument(skip(self, upload))]
    pub async fn upload_product_image(
        &self,
        id: i32,
        upload: ImageUpload,
    ) -> CatalogResult<ImageUploaded> {
        let previous = self.current_image(id).await?;
        let filename = self.attach_image(id, upload, previous).await?;
        Ok(self.uploaded("Image uploaded", filename))
    }

    /// Download an image by URL and make it the product's image
    #[instrument(skip(self))]
    pub async fn import_product_image(&self, id: i32, url: &str) -> CatalogResult<ImageUploaded> {
        let previous = self.current_image(id).await?;
        let fetched = self.image_source.fetch(url).await?;
        let upload = ImageUpload {
            bytes: fetched.bytes,
            content_type: fetched.content_type,
        };
        let filename = self.attach_image(id, upload, previous).await?;
        Ok(self.uploaded("Image imported", filename))
    }

    /// Remove a product's image files and clear its reference
    #[instrument(skip(self))]
    pub async fn delete_product_image(&self, id: i32) -> CatalogResult<MessageResponse> {
        let filename = self.current_image(id).await?.ok_or_else(|| {
            CatalogError::InvalidArgument(format!("Product {} has no image", id))
        })?;

        self.images.remove(&filename).await?;
        self.repository.set_product_image(id, None).await?;

        info!(product_id = id, %filename, "Deleted product image");
        Ok(MessageResponse::new("Image deleted"))
    }

    /// Candidate image URLs from the external index
    #[instrument(skip(self))]
    pub async fn search_images(&self, term: &str, count: usize) -> CatalogResult<ImageSearchResults> {
        let count = count.clamp(1, MAX_SEARCH_RESULTS);
        let images = self.image_source.search(term, count).await?;
        Ok(ImageSearchResults {
            term: term.trim().to_string(),
            count: images.len(),
            images,
        })
    }

    /// Active families ordered by name
    pub async fn list_families(&self) -> CatalogResult<Vec<Category>> {
        self.repository.list_families().await
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(&self, input: CreateCategory) -> CatalogResult<Category> {
        input.validate()?;
        self.repository.create_category(input.name.trim()).await
    }

    /// An unused `PROD-YYYYMMDD-XXXXX` code
    pub async fn generate_product_code(&self) -> CatalogResult<GeneratedCode> {
        let date = Utc::now().format("%Y%m%d");
        for _ in 0..CODE_GENERATION_ATTEMPTS {
            let suffix = 10_000 + (Uuid::new_v4().as_u128() % 90_000) as u32;
            let code = format!("PROD-{}-{}", date, suffix);
            if !self.repository.code_exists(&code).await? {
                return Ok(GeneratedCode { code });
            }
        }
        Err(CatalogError::Internal(format!(
            "No unused product code after {} attempts",
            CODE_GENERATION_ATTEMPTS
        )))
    }

    /// Filesystem path of a stored variant
    pub async fn image_path(&self, filename: &str, size: ImageSize) -> CatalogResult<PathBuf> {
        if filename.is_empty()
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(CatalogError::InvalidArgument(format!(
                "Invalid image filename: {}",
                filename
            )));
        }
        if !self.images.exists(filename, size).await {
            return Err(CatalogError::NotFound(format!("Image {} not found", filename)));
        }
        Ok(self.images.locate(filename, size))
    }

    async fn current_image(&self, id: i32) -> CatalogResult<Option<String>> {
        Ok(self
            .repository
            .get_product(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", id))?
            .product
            .image)
    }

    /// Stores `upload`, points the product at it, then drops `previous`.
    async fn attach_image(
        &self,
        id: i32,
        upload: ImageUpload,
        previous: Option<String>,
    ) -> CatalogResult<String> {
        let filename = self
            .images
            .store(upload.bytes, &upload.content_type, id)
            .await?;

        if let Err(e) = self
            .repository
            .set_product_image(id, Some(filename.clone()))
            .await
        {
            self.discard_image(&filename).await;
            return Err(e);
        }

        if let Some(old) = previous.filter(|old| *old != filename) {
            self.discard_image(&old).await;
        }

        info!(product_id = id, %filename, "Product image set");
        Ok(filename)
    }

    async fn discard_image(&self, filename: &str) {
        if let Err(e) = self.images.remove(filename).await {
            warn!(%filename, error = %e, "Failed to remove image files");
        }
    }

    fn uploaded(&self, message: &str, filename: String) -> ImageUploaded {
        let url = format!("{}/{}", self.public_base_path.trim_end_matches('/'), filename);
        ImageUploaded {
            message: message.to_string(),
            filename,
            url,
        }
    }
}
