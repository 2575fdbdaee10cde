use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MessageDoc {
    pub message: String,
    pub error: Option<String>,
}

#[derive(ToSchema)]
pub struct CreateServiceForm {
    pub name: String,
    pub description: String,
    /// Decimal number sent as text.
    pub price: String,
    pub category: String,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[derive(ToSchema)]
pub struct ServiceDoc {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    /// Owner id
    pub provider: Uuid,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

#[derive(ToSchema)]
pub struct ProviderDoc { pub name: String, pub email: String }

#[derive(ToSchema)]
pub struct PopulatedServiceDoc {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: String,
    /// Null when the owner no longer exists.
    pub provider: Option<ProviderDoc>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::services::create,
        crate::routes::services::list_all,
        crate::routes::services::list_mine,
        crate::routes::services::get,
        crate::routes::services::delete,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            CreateServiceForm,
            ServiceDoc,
            ProviderDoc,
            PopulatedServiceDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "services")
    )
)]
pub struct ApiDoc;
