use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::errors::ApiError;
use crate::auth::{AuthError, AuthUser, JwtService};

/// Bearer-token authentication for handlers that modify data.
///
/// Read-only handlers simply do not ask for an `AuthUser`. Failures are
/// rendered through `ApiError` as 401 with a `detail` body.
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    JwtService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or(AuthError::MissingAuthHeader)?;

        let user = JwtService::from_ref(state).authenticate(auth_header)?;
        tracing::debug!(subject = %user.subject, "authenticated request");

        Ok(user)
    }
}

/// CORS configuration for the public API
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
