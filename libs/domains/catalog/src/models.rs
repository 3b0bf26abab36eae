use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Name of the per-category fallback sub-category.
pub const UNSPECIFIED_SUB_CATEGORY: &str = "UNSPECIFIED";

/// Category label used when a listed product has no resolvable category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Product lifecycle status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_status")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

/// Stored image variant
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageSize {
    Thumbnails,
    #[default]
    Medium,
    Original,
}

impl ImageSize {
    pub const ALL: [ImageSize; 3] = [ImageSize::Thumbnails, ImageSize::Medium, ImageSize::Original];

    /// Lenient parse for the `size` query parameter; anything unknown is `Medium`.
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().to_lowercase().parse().ok())
            .unwrap_or_default()
    }
}

/// Product family (top-level category)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    /// Category ID
    pub id: i32,
    /// Unique family name
    pub name: String,
    pub active: bool,
    /// Sentinel bucket, hidden from listings
    #[serde(skip)]
    pub unspecified: bool,
    pub created_at: DateTime<Utc>,
}

/// Sub-category a product is filed under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub active: bool,
    pub unspecified: bool,
}

/// Product as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Product ID
    pub id: i32,
    /// Display name
    pub name: String,
    /// Unique business key
    pub merchandise_code: String,
    /// Unit price, never negative
    pub unit_price: f64,
    pub status: ProductStatus,
    pub sub_category_id: i32,
    /// Stored image filename, if any
    pub image: Option<String>,
    /// Soft-delete marker
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Visible to catalog reads: active and not soft-deleted.
    pub fn is_listed(&self) -> bool {
        self.status == ProductStatus::Active && self.deleted_at.is_none()
    }
}

/// Insert payload handed to the repository once the sub-category is resolved
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub merchandise_code: String,
    pub name: String,
    pub unit_price: f64,
    pub sub_category_id: i32,
}

/// Product joined with the family it is filed under
#[derive(Debug, Clone, PartialEq)]
pub struct ProductWithCategory {
    pub product: Product,
    pub category: Option<Category>,
}

/// DTO for creating a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 50))]
    pub merchandise_code: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Family the product is filed under
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
}

/// DTO for updating a product; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// Re-files the product under this family
    #[validate(range(min = 1))]
    pub category_id: Option<i32>,
    #[validate(range(min = 0.0))]
    pub unit_price: Option<f64>,
}

/// DTO for creating a family
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Raw image handed to the pipeline
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Public URLs of a stored image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageUrls {
    pub image_url: Option<String>,
    pub image_thumbnail: Option<String>,
    pub image_medium: Option<String>,
    pub image_original: Option<String>,
}

impl ImageUrls {
    /// `{base}/{filename}` plus one `?size=` URL per variant; all `None` without a filename.
    pub fn build(base: &str, filename: Option<&str>) -> Self {
        let Some(filename) = filename.filter(|f| !f.is_empty()) else {
            return Self::default();
        };
        let base = base.trim_end_matches('/');
        let variant = |size: ImageSize| Some(format!("{}/{}?size={}", base, filename, size));

        Self {
            image_url: Some(format!("{}/{}", base, filename)),
            image_thumbnail: variant(ImageSize::Thumbnails),
            image_medium: variant(ImageSize::Medium),
            image_original: variant(ImageSize::Original),
        }
    }
}

/// Product row as returned by listing and search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductListItem {
    pub id: i32,
    pub name: String,
    pub category_name: String,
    pub unit_price: f64,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub image_thumbnail: Option<String>,
    pub image_medium: Option<String>,
    pub image_original: Option<String>,
}

/// Persistence-level listing row, before image URLs are attached
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListing {
    pub id: i32,
    pub name: String,
    pub category_name: Option<String>,
    pub unit_price: f64,
    pub image: Option<String>,
}

impl ProductListing {
    pub fn into_item(self, image_base: &str) -> ProductListItem {
        let urls = ImageUrls::build(image_base, self.image.as_deref());
        ProductListItem {
            id: self.id,
            name: self.name,
            category_name: self.category_name.unwrap_or_else(|| UNCATEGORIZED.to_string()),
            unit_price: self.unit_price,
            image: self.image,
            image_url: urls.image_url,
            image_thumbnail: urls.image_thumbnail,
            image_medium: urls.image_medium,
            image_original: urls.image_original,
        }
    }
}

/// Single product view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetail {
    pub id: i32,
    pub merchandise_code: String,
    pub name: String,
    pub unit_price: f64,
    pub status: ProductStatus,
    pub category_id: Option<i32>,
    pub category_name: String,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub image_thumbnail: Option<String>,
    pub image_medium: Option<String>,
    pub image_original: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductDetail {
    pub fn new(record: ProductWithCategory, image_base: &str) -> Self {
        let ProductWithCategory { product, category } = record;
        let urls = ImageUrls::build(image_base, product.image.as_deref());
        Self {
            id: product.id,
            merchandise_code: product.merchandise_code,
            name: product.name,
            unit_price: product.unit_price,
            status: product.status,
            category_id: category.as_ref().map(|c| c.id),
            category_name: category
                .map(|c| c.name)
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            image: product.image,
            image_url: urls.image_url,
            image_thumbnail: urls.image_thumbnail,
            image_medium: urls.image_medium,
            image_original: urls.image_original,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Summary returned after a product is created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductSummary {
    pub id: i32,
    pub merchandise_code: String,
    pub name: String,
    pub unit_price: f64,
    pub image: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductCreated {
    pub message: String,
    pub product: ProductSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageUploaded {
    pub message: String,
    pub filename: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Unused merchandise code, `PROD-YYYYMMDD-XXXXX`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeneratedCode {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImageSearchResults {
    pub term: String,
    pub count: usize,
    /// Image URLs in provider order
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ImportImageRequest {
    #[validate(length(min = 1, max = 2048))]
    pub image_url: String,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    10
}

fn default_image_count() -> usize {
    5
}

/// Query parameters for listing products
#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListProductsParams {
    /// Restrict to this family
    pub category_id: Option<i32>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
}

/// Query parameters for product search
#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchProductsParams {
    /// Free text; blank returns an empty page
    #[serde(default)]
    pub term: String,
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: u64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,
    pub category_id: Option<i32>,
}

/// Query parameters for the external image search
#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ImageSearchParams {
    #[validate(length(min = 1, max = 200))]
    pub term: String,
    #[serde(default = "default_image_count")]
    #[validate(range(min = 1, max = 10))]
    pub count: usize,
}

/// Query parameters for serving a stored image
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageVariantParams {
    /// `thumbnails`, `medium` or `original`; anything else serves `medium`
    pub size: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveEnum;

    #[test]
    fn test_image_size_from_query() {
        assert_eq!(ImageSize::from_query(Some("thumbnails")), ImageSize::Thumbnails);
        assert_eq!(ImageSize::from_query(Some("ORIGINAL")), ImageSize::Original);
        assert_eq!(ImageSize::from_query(Some("huge")), ImageSize::Medium);
        assert_eq!(ImageSize::from_query(None), ImageSize::Medium);
    }

    #[test]
    fn test_image_urls() {
        let urls = ImageUrls::build("/api/catalog/images/", Some("product-7-1.jpg"));
        assert_eq!(urls.image_url.as_deref(), Some("/api/catalog/images/product-7-1.jpg"));
        assert_eq!(
            urls.image_thumbnail.as_deref(),
            Some("/api/catalog/images/product-7-1.jpg?size=thumbnails")
        );
        assert_eq!(
            urls.image_original.as_deref(),
            Some("/api/catalog/images/product-7-1.jpg?size=original")
        );

        assert_eq!(ImageUrls::build("/img", None), ImageUrls::default());
        assert_eq!(ImageUrls::build("/img", Some("")), ImageUrls::default());
    }

    #[test]
    fn test_listing_falls_back_to_uncategorized() {
        let item = ProductListing {
            id: 1,
            name: "Drill".into(),
            category_name: None,
            unit_price: 10.0,
            image: None,
        }
        .into_item("/img");

        assert_eq!(item.category_name, UNCATEGORIZED);
        assert!(item.image_url.is_none());
        assert!(item.image_medium.is_none());
    }

    #[test]
    fn test_create_product_validation() {
        let input = CreateProduct {
            merchandise_code: "".into(),
            name: "Drill".into(),
            category_id: 1,
            unit_price: -1.0,
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("merchandise_code"));
        assert!(fields.contains_key("unit_price"));
    }

    #[test]
    fn test_product_status_strings() {
        assert_eq!(ProductStatus::Active.to_string(), "active");
        assert_eq!(ProductStatus::Inactive.to_value(), "inactive");
        assert_eq!(
            ProductStatus::try_from_value(&"inactive".to_string()).unwrap(),
            ProductStatus::Inactive
        );
    }
}
