pub mod auth;
pub mod services;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::{Health, MessageBody};

use crate::openapi::ApiDoc;
use auth::ServerState;

/// Filesystem and size settings the router needs beyond state.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub uploads_dir: String,
    pub public_dir: String,
    pub max_upload_bytes: usize,
}

impl From<&configs::AppConfig> for RouterOptions {
    fn from(cfg: &configs::AppConfig) -> Self {
        Self {
            uploads_dir: cfg.assets.uploads_dir.clone(),
            public_dir: cfg.server.public_dir.clone(),
            max_upload_bytes: cfg.server.max_upload_bytes,
        }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn root() -> &'static str {
    "Backend working"
}

pub async fn not_found() -> (StatusCode, Json<MessageBody>) {
    (StatusCode::NOT_FOUND, Json(MessageBody::new("Route not found")))
}

/// Build the full application router: public routes, the service API, static files and docs
pub fn build_router(state: ServerState, cors: CorsLayer, opts: &RouterOptions) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest_service("/uploads", ServeDir::new(&opts.uploads_dir))
        .nest_service("/public", ServeDir::new(&opts.public_dir));

    let api = Router::new()
        .route("/api/services", get(services::list_all).post(services::create))
        .route("/api/services/provider", get(services::list_mine))
        .route("/api/services/:id", get(services::get).delete(services::delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::identify_caller))
        .layer(DefaultBodyLimit::max(opts.max_upload_bytes));

    public
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses are recorded at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
