use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::catalog::ServiceManager;
use service::identity::{CallerIdentity, Role};

use crate::errors::JsonApiError;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub manager: Arc<ServiceManager>,
    pub auth: ServerAuthConfig,
}

/// Claims carried by tokens from the user/admin login flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub exp: usize,
}

impl From<Claims> for CallerIdentity {
    fn from(c: Claims) -> Self {
        CallerIdentity::new(c.sub, c.role, c.email, c.name)
    }
}

fn bearer_or_cookie(req: &Request, jar: &CookieJar) -> Option<String> {
    let from_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    from_header.or_else(|| {
        jar.get(AUTH_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// Token that was presented but failed verification.
#[derive(Debug, Clone)]
pub struct RejectedToken(pub String);

/// Resolve the caller from `Authorization: Bearer` or the `auth_token` cookie.
/// No token leaves the request anonymous. A bad token is recorded as [`RejectedToken`];
/// routes that read [`Caller`] answer 401, public routes ignore it.
pub async fn identify_caller(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_or_cookie(&req, &jar) else {
        return next.run(req).await;
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    match decode::<Claims>(&token, &key, &validation) {
        Ok(data) => {
            let caller = CallerIdentity::from(data.claims);
            tracing::debug!(caller_id = %caller.id, role = ?caller.role, "caller identified");
            req.extensions_mut().insert(caller);
        }
        Err(e) => {
            tracing::warn!(path = %req.uri().path(), err = %e, "token validation failed");
            req.extensions_mut().insert(RejectedToken(e.to_string()));
        }
    }
    next.run(req).await
}

/// Optional caller identity placed in request extensions by [`identify_caller`].
/// Rejects with 401 when the request carried a token that failed verification.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<CallerIdentity>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(RejectedToken(reason)) = parts.extensions.get::<RejectedToken>() {
            return Err(JsonApiError::new(StatusCode::UNAUTHORIZED, "Not authorized", Some(reason.clone())));
        }
        Ok(Caller(parts.extensions.get::<CallerIdentity>().cloned()))
    }
}
