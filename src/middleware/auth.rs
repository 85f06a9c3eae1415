//! Authentication middleware
//!
//! Verifies the bearer token on protected routes, loads the user row and
//! injects an [`AuthContext`] into request extensions. Rate limiting is
//! applied here as well, after the caller is identified.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::services::auth::AuthContext;
use crate::state::AppState;
use crate::utils::errors::{AvishkarError, Result};

/// Middleware guarding authenticated routes
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = match authenticate(&state, request.headers()).await {
        Ok(context) => context,
        Err(e) => return e.into_response(),
    };

    if let Err(e) = state.rate_limiter.check(&context) {
        return e.into_response();
    }

    debug!(user_id = context.user_id, role = %context.role, "Request authenticated");
    request.extensions_mut().insert(context);
    next.run(request).await
}

async fn authenticate(state: &AppState, headers: &header::HeaderMap) -> Result<AuthContext> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AvishkarError::Authentication("missing bearer token".to_string()))?;

    let claims = state.services.auth_service.verify_token(token)?;

    let user = state
        .services
        .user_service
        .find_by_firebase_uid(&claims.sub)
        .await?
        .ok_or_else(|| AvishkarError::Authentication("unknown user".to_string()))?;

    state.services.auth_service.context_for_user(&user)
}
