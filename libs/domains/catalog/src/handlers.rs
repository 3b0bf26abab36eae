use axum::{
    Json, Router,
    body::Body,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_helpers::{
    IdPath, ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadGatewayResponse, BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, PayloadTooLargeResponse,
        ServiceUnavailableResponse, UnprocessableEntityResponse, UnsupportedMediaTypeResponse,
    },
};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CreateCategory, CreateProduct, GeneratedCode, ImageSearchParams, ImageSearchResults,
    ImageSize, ImageUploaded, ImageUpload, ImageVariantParams, ImportImageRequest,
    ListProductsParams, MessageResponse, ProductCreated, ProductDetail, ProductListItem,
    ProductStatus, ProductSummary, SearchProductsParams, UpdateProduct,
};
use crate::query::{PageInfo, PageRequest, Paginated};
use crate::repository::CatalogRepository;
use crate::service::CatalogService;

/// Upload content types accepted at the HTTP boundary
pub const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

/// Room left in the body limit for the non-file form fields
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// OpenAPI documentation for the Catalog API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        search_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        upload_product_image,
        import_product_image,
        delete_product_image,
        list_families,
        create_family,
        generate_code,
        search_images,
        serve_image,
    ),
    components(
        schemas(
            ProductListItem,
            ProductDetail,
            ProductCreated,
            ProductSummary,
            ProductStatus,
            Paginated<ProductListItem>,
            PageInfo,
            Category,
            CreateCategory,
            CreateProduct,
            UpdateProduct,
            CreateProductForm,
            UpdateProductForm,
            ImageForm,
            ImportImageRequest,
            ImageUploaded,
            ImageSearchResults,
            GeneratedCode,
            MessageResponse,
            ImageSize,
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            UnsupportedMediaTypeResponse,
            PayloadTooLargeResponse,
            UnprocessableEntityResponse,
            BadGatewayResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "catalog", description = "Products, families and product images")
    )
)]
pub struct ApiDoc;

/// Multipart body of `POST /products`
#[allow(dead_code)]
#[derive(ToSchema)]
struct CreateProductForm {
    merchandise_code: String,
    name: String,
    category_id: i32,
    unit_price: f64,
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
}

/// Multipart body of `PATCH /products/{id}`; every field optional
#[allow(dead_code)]
#[derive(ToSchema)]
struct UpdateProductForm {
    name: Option<String>,
    category_id: Option<i32>,
    unit_price: Option<f64>,
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
}

/// Multipart body carrying a single image
#[allow(dead_code)]
#[derive(ToSchema)]
struct ImageForm {
    #[schema(value_type = String, format = Binary)]
    image: Vec<u8>,
}

/// Create the catalog router with all HTTP endpoints
pub fn router<R: CatalogRepository + 'static>(service: CatalogService<R>) -> Router {
    let body_limit = service.max_upload_bytes() + FORM_OVERHEAD_BYTES;
    let shared_service = Arc::new(service);

    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/search", get(search_products))
        .route(
            "/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route(
            "/products/{id}/image",
            post(upload_product_image).delete(delete_product_image),
        )
        .route("/products/{id}/image/import", post(import_product_image))
        .route("/families", get(list_families).post(create_family))
        .route("/generate-code", get(generate_code))
        .route("/images/search", get(search_images))
        .route("/images/{filename}", get(serve_image))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(shared_service)
}

fn multipart_error(err: MultipartError, limit: usize) -> CatalogError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CatalogError::PayloadTooLarge { limit }
    } else {
        CatalogError::InvalidArgument(err.body_text())
    }
}

fn parse_field<T: std::str::FromStr>(name: &str, raw: &str) -> CatalogResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| CatalogError::InvalidArgument(format!("Invalid value for {}: {}", name, raw)))
}

/// Text fields plus the optional `image` file of a multipart form.
struct ProductForm {
    fields: std::collections::HashMap<String, String>,
    image: Option<ImageUpload>,
}

impl ProductForm {
    async fn read(mut multipart: Multipart, limit: usize) -> CatalogResult<Self> {
        let mut form = ProductForm {
            fields: Default::default(),
            image: None,
        };

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, limit))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "image" {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                if bytes.is_empty() {
                    continue;
                }
                if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
                    return Err(CatalogError::UnsupportedMediaType(content_type));
                }
                if bytes.len() > limit {
                    return Err(CatalogError::PayloadTooLarge { limit });
                }
                form.image = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            } else {
                let value = field.text().await.map_err(|e| multipart_error(e, limit))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    fn optional<T: std::str::FromStr>(&self, name: &str) -> CatalogResult<Option<T>> {
        match self.fields.get(name).filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_field(name, raw).map(Some),
            None => Ok(None),
        }
    }

    fn required<T: std::str::FromStr>(&self, name: &str) -> CatalogResult<T> {
        self.optional(name)?
            .ok_or_else(|| CatalogError::InvalidArgument(format!("Missing field: {}", name)))
    }
}

/// List products, newest first
#[utoipa::path(
    get,
    path = "/products",
    tag = "catalog",
    params(ListProductsParams),
    responses(
        (status = 200, description = "Page of products", body = Paginated<ProductListItem>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    ValidatedQuery(params): ValidatedQuery<ListProductsParams>,
) -> CatalogResult<Json<Paginated<ProductListItem>>> {
    let page = service
        .list_products(params.category_id, PageRequest::new(params.page, params.limit))
        .await?;
    Ok(Json(page))
}

/// Relevance-ranked product search
#[utoipa::path(
    get,
    path = "/products/search",
    tag = "catalog",
    params(SearchProductsParams),
    responses(
        (status = 200, description = "Page of matching products", body = Paginated<ProductListItem>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    ValidatedQuery(params): ValidatedQuery<SearchProductsParams>,
) -> CatalogResult<Json<Paginated<ProductListItem>>> {
    let page = service
        .search_products(
            &params.term,
            PageRequest::new(params.page, params.limit),
            params.category_id,
        )
        .await?;
    Ok(Json(page))
}

/// Create a product from a multipart form
#[utoipa::path(
    post,
    path = "/products",
    tag = "catalog",
    request_body(content = CreateProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created", body = ProductCreated),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 415, response = UnsupportedMediaTypeResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    multipart: Multipart,
) -> CatalogResult<impl IntoResponse> {
    let form = ProductForm::read(multipart, service.max_upload_bytes()).await?;
    let input = CreateProduct {
        merchandise_code: form.required::<String>("merchandise_code")?.trim().to_string(),
        name: form.required::<String>("name")?.trim().to_string(),
        category_id: form.required("category_id")?,
        unit_price: form.required("unit_price")?,
    };

    let created = service.create_product(input, form.image).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "catalog",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = ProductDetail),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<ProductDetail>> {
    Ok(Json(service.get_product(id).await?))
}

/// Update a product from a multipart form
#[utoipa::path(
    patch,
    path = "/products/{id}",
    tag = "catalog",
    params(("id" = i32, Path, description = "Product ID")),
    request_body(content = UpdateProductForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated", body = ProductDetail),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 415, response = UnsupportedMediaTypeResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    IdPath(id): IdPath,
    multipart: Multipart,
) -> CatalogResult<Json<ProductDetail>> {
    let form = ProductForm::read(multipart, service.max_upload_bytes()).await?;
    let input = UpdateProduct {
        name: form.optional::<String>("name")?.map(|n| n.trim().to_string()),
        category_id: form.optional("category_id")?,
        unit_price: form.optional("unit_price")?,
    };

    Ok(Json(service.update_product(id, input, form.image).await?))
}

/// Soft-delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "catalog",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    IdPath(id): IdPath,
) -> CatalogResult<StatusCode> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace a product's image with an upload
#[utoipa::path(
    post,
    path = "/products/{id}/image",
    tag = "catalog",
    params(("id" = i32, Path, description = "Product ID")),
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = ImageUploaded),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 415, response = UnsupportedMediaTypeResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upload_product_image<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    IdPath(id): IdPath,
    multipart: Multipart,
) -> CatalogResult<Json<ImageUploaded>> {
    let upload = ProductForm::read(multipart, service.max_upload_bytes())
        .await?
        .image
        .ok_or_else(|| CatalogError::InvalidArgument("Missing file field: image".to_string()))?;

    Ok(Json(service.upload_product_image(id, upload).await?))
}

/// Download an image by URL and attach it to a product
#[utoipa::path(
    post,
    path = "/products/{id}/image/import",
    tag = "catalog",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = ImportImageRequest,
    responses(
        (status = 200, description = "Image imported", body = ImageUploaded),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 413, response = PayloadTooLargeResponse),
        (status = 422, response = UnprocessableEntityResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 504, description = "Image download timed out"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn import_product_image<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<ImportImageRequest>,
) -> CatalogResult<Json<ImageUploaded>> {
    Ok(Json(service.import_product_image(id, input.image_url.trim()).await?))
}

/// Remove a product's image
#[utoipa::path(
    delete,
    path = "/products/{id}/image",
    tag = "catalog",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Image removed", body = MessageResponse),
        (status = 400, description = "Invalid id or product has no image"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product_image<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    IdPath(id): IdPath,
) -> CatalogResult<Json<MessageResponse>> {
    Ok(Json(service.delete_product_image(id).await?))
}

/// List product families
#[utoipa::path(
    get,
    path = "/families",
    tag = "catalog",
    responses(
        (status = 200, description = "Families ordered by name", body = Vec<Category>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_families<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<Category>>> {
    Ok(Json(service.list_families().await?))
}

/// Create a product family
#[utoipa::path(
    post,
    path = "/families",
    tag = "catalog",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Family created", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_family<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<impl IntoResponse> {
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Generate an unused merchandise code
#[utoipa::path(
    get,
    path = "/generate-code",
    tag = "catalog",
    responses(
        (status = 200, description = "Unused code", body = GeneratedCode),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn generate_code<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<GeneratedCode>> {
    Ok(Json(service.generate_product_code().await?))
}

/// Search the external image index
#[utoipa::path(
    get,
    path = "/images/search",
    tag = "catalog",
    params(ImageSearchParams),
    responses(
        (status = 200, description = "Candidate image URLs", body = ImageSearchResults),
        (status = 400, response = BadRequestValidationResponse),
        (status = 429, description = "Search quota exhausted"),
        (status = 502, response = BadGatewayResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn search_images<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    ValidatedQuery(params): ValidatedQuery<ImageSearchParams>,
) -> CatalogResult<Json<ImageSearchResults>> {
    Ok(Json(service.search_images(&params.term, params.count).await?))
}

/// Serve one variant of a stored image
#[utoipa::path(
    get,
    path = "/images/{filename}",
    tag = "catalog",
    params(
        ("filename" = String, Path, description = "Stored image filename"),
        ImageVariantParams
    ),
    responses(
        (status = 200, description = "JPEG bytes", content_type = "image/jpeg", body = Vec<u8>),
        (status = 400, description = "Invalid filename"),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn serve_image<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path(filename): Path<String>,
    Query(params): Query<ImageVariantParams>,
) -> CatalogResult<Response> {
    let size = ImageSize::from_query(params.size.as_deref());
    let path = service.image_path(&filename, size).await?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| CatalogError::Internal(format!("{}: {}", path.display(), e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        Body::from(bytes),
    )
        .into_response())
}
