use axum::http::{header, HeaderValue, Method};
use configs::CorsConfig;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// Exact match against the allow list, or a host ending in one of the suffixes.
pub fn origin_allowed(origin: &str, exact: &[String], suffixes: &[String]) -> bool {
    if exact.iter().any(|o| o == origin) {
        return true;
    }
    let host = origin
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(origin)
        .split(['/', ':'])
        .next()
        .unwrap_or_default();
    !host.is_empty() && suffixes.iter().any(|s| host.ends_with(s.as_str()))
}

/// Requests without an `Origin` header never reach the predicate and pass through.
pub fn build_cors(cfg: &CorsConfig) -> CorsLayer {
    let exact = cfg.allowed_origins.clone();
    let suffixes = cfg.allowed_origin_suffixes.clone();
    let allow = AllowOrigin::predicate(move |origin: &HeaderValue, _| {
        let Ok(origin) = origin.to_str() else { return false };
        let ok = origin_allowed(origin, &exact, &suffixes);
        if !ok {
            warn!(%origin, "CORS blocked origin");
        }
        ok
    });
    CorsLayer::new()
        .allow_origin(allow)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
