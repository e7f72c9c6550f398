use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Wire shape of `service::products::Product`.
#[derive(ToSchema)]
pub struct ProductDoc {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub thumbnail: String,
    pub code: String,
    pub stock: i64,
}

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String, pub message: Option<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::products::list,
        crate::routes::products::get,
    ),
    components(
        schemas(
            HealthResponse,
            ProductDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "products")
    )
)]
pub struct ApiDoc;
