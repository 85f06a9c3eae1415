//! Authenticated user profile endpoints

use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Deserialize;

use crate::models::user::User;
use crate::services::auth::AuthContext;
use crate::state::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub mobile: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FcmTokenRequest {
    pub token: String,
}

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<User>> {
    let user = state.services.user_service.get(context.user_id).await?;
    Ok(Json(user))
}

/// PATCH /api/users/me
pub async fn update_me(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    let user = state
        .services
        .user_service
        .update_profile(&context, body.display_name, body.mobile)
        .await?;
    Ok(Json(user))
}

/// POST /api/users/me/fcm-token — register a device for push
pub async fn register_fcm_token(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(body): Json<FcmTokenRequest>,
) -> Result<Json<User>> {
    let user = state
        .services
        .user_service
        .register_fcm_token(&context, &body.token)
        .await?;
    Ok(Json(user))
}

/// POST /api/users/me/organizer-request
pub async fn request_organizer(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> Result<Json<User>> {
    let user = state
        .services
        .user_service
        .request_organizer(&context)
        .await?;
    Ok(Json(user))
}
