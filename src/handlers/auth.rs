//! Login-time profile sync
//!
//! The frontend authenticates against the external identity provider and
//! then calls this endpoint to upsert its profile row and obtain the API
//! bearer token used for every subsequent request.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::models::user::{CreateUserRequest, User};
use crate::state::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub firebase_uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub mobile: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub user: User,
    pub token: String,
}

/// POST /api/auth/sync
pub async fn sync(
    State(state): State<AppState>,
    Json(body): Json<SyncRequest>,
) -> Result<Json<SyncResponse>> {
    let (user, token) = state
        .services
        .user_service
        .sync_profile(CreateUserRequest {
            firebase_uid: body.firebase_uid,
            email: body.email,
            display_name: body.display_name,
            mobile: body.mobile,
        })
        .await?;

    Ok(Json(SyncResponse { user, token }))
}
