//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Product catalog: listing, search, product images and image import",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/catalog", api = domain_catalog::ApiDoc)
    ),
    tags(
        (name = "catalog", description = "Products, families and product images")
    )
)]
pub struct ApiDoc;
