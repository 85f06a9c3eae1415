//! User account service
//!
//! Login-time profile sync keyed by the external auth uid, profile
//! updates, device-token registration, and the organizer promotion and
//! ban workflows handled by admins.

use tracing::{info, warn};

use crate::database::DatabaseService;
use crate::models::user::{CreateUserRequest, UpdateUserRequest, User, UserRole};
use crate::services::auth::{AuthContext, AuthService};
use crate::utils::errors::{AvishkarError, Result};
use crate::utils::helpers;
use crate::utils::logging;

#[derive(Debug, Clone)]
pub struct UserService {
    db: DatabaseService,
    auth: AuthService,
}

impl UserService {
    pub fn new(db: DatabaseService, auth: AuthService) -> Self {
        Self { db, auth }
    }

    /// Upsert the caller's profile on login. An unknown firebase uid gets
    /// a fresh participant row; a known one has its display fields
    /// refreshed. Returns the row together with an API bearer token.
    pub async fn sync_profile(&self, request: CreateUserRequest) -> Result<(User, String)> {
        if !helpers::is_valid_email(&request.email) {
            return Err(AvishkarError::InvalidInput("invalid email".to_string()));
        }

        let user = match self
            .db
            .users
            .find_by_firebase_uid(&request.firebase_uid)
            .await?
        {
            Some(existing) => {
                if existing.is_banned {
                    warn!(user_id = existing.id, "Banned user attempted login");
                    return Err(AvishkarError::PermissionDenied(
                        "account is banned".to_string(),
                    ));
                }

                self.db
                    .users
                    .update(
                        existing.id,
                        UpdateUserRequest {
                            display_name: request.display_name,
                            mobile: request.mobile,
                            ..Default::default()
                        },
                    )
                    .await?
            }
            None => {
                let created = self.db.users.create(request).await?;
                info!(user_id = created.id, "New user registered");
                created
            }
        };

        let token = self.auth.issue_token(&user)?;
        Ok((user, token))
    }

    pub async fn get(&self, user_id: i64) -> Result<User> {
        self.db
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AvishkarError::UserNotFound { user_id })
    }

    pub async fn find_by_firebase_uid(&self, uid: &str) -> Result<Option<User>> {
        self.db.users.find_by_firebase_uid(uid).await
    }

    /// Update the caller's own profile fields
    pub async fn update_profile(
        &self,
        context: &AuthContext,
        display_name: Option<String>,
        mobile: Option<String>,
    ) -> Result<User> {
        if let Some(ref m) = mobile {
            if !helpers::is_valid_mobile(m) {
                return Err(AvishkarError::InvalidInput(
                    "invalid mobile number".to_string(),
                ));
            }
        }

        self.db
            .users
            .update(
                context.user_id,
                UpdateUserRequest {
                    display_name,
                    mobile,
                    ..Default::default()
                },
            )
            .await
    }

    /// Register a device token for push notifications
    pub async fn register_fcm_token(&self, context: &AuthContext, token: &str) -> Result<User> {
        if token.trim().is_empty() {
            return Err(AvishkarError::InvalidInput(
                "device token is required".to_string(),
            ));
        }

        self.db.users.add_fcm_token(context.user_id, token).await
    }

    /// Participant asks to become an organizer; an admin reviews it later
    pub async fn request_organizer(&self, context: &AuthContext) -> Result<User> {
        let user = self.get(context.user_id).await?;
        if user.role()? >= UserRole::Organizer {
            return Err(AvishkarError::InvalidInput(
                "user already has organizer access".to_string(),
            ));
        }

        let updated = self
            .db
            .users
            .update(
                context.user_id,
                UpdateUserRequest {
                    organizer_request: Some(true),
                    ..Default::default()
                },
            )
            .await?;

        info!(user_id = context.user_id, "Organizer access requested");
        Ok(updated)
    }

    /// Admin decides an organizer request. Approval promotes the user;
    /// either way the pending flag is cleared.
    pub async fn review_organizer_request(
        &self,
        context: &AuthContext,
        user_id: i64,
        approve: bool,
    ) -> Result<User> {
        self.auth.require_role(context, UserRole::Admin)?;

        let user = self.get(user_id).await?;
        if !user.organizer_request {
            return Err(AvishkarError::InvalidInput(format!(
                "user {} has no pending organizer request",
                user_id
            )));
        }

        let role = if approve {
            UserRole::Organizer
        } else {
            user.role()?
        };

        // set_role clears the pending request flag
        let updated = self.db.users.set_role(user_id, role).await?;

        info!(
            user_id = user_id,
            admin_id = context.user_id,
            approved = approve,
            "Organizer request reviewed"
        );
        Ok(updated)
    }

    /// Admin changes a user's role directly
    pub async fn set_role(
        &self,
        context: &AuthContext,
        user_id: i64,
        role: UserRole,
    ) -> Result<User> {
        self.auth.require_role(context, UserRole::Admin)?;

        if user_id == context.user_id && role != UserRole::Admin {
            return Err(AvishkarError::InvalidInput(
                "admins cannot demote themselves".to_string(),
            ));
        }

        let updated = self.db.users.set_role(user_id, role).await?;
        logging::log_admin_action(
            context.user_id,
            "set_role",
            Some(&user_id.to_string()),
            Some(role.as_str()),
        );
        Ok(updated)
    }

    /// Admin bans or unbans an account
    pub async fn set_banned(
        &self,
        context: &AuthContext,
        user_id: i64,
        banned: bool,
    ) -> Result<User> {
        self.auth.require_role(context, UserRole::Admin)?;

        if user_id == context.user_id {
            return Err(AvishkarError::InvalidInput(
                "admins cannot ban themselves".to_string(),
            ));
        }

        let updated = self
            .db
            .users
            .update(
                user_id,
                UpdateUserRequest {
                    is_banned: Some(banned),
                    ..Default::default()
                },
            )
            .await?;

        logging::log_admin_action(
            context.user_id,
            if banned { "ban" } else { "unban" },
            Some(&user_id.to_string()),
            None,
        );
        Ok(updated)
    }

    /// Pending organizer requests for the admin dashboard
    pub async fn list_organizer_requests(&self, context: &AuthContext) -> Result<Vec<User>> {
        self.auth.require_role(context, UserRole::Admin)?;
        self.db.users.list_organizer_requests().await
    }

    /// Paged user listing for the admin dashboard
    pub async fn list(&self, context: &AuthContext, limit: i64, offset: i64) -> Result<Vec<User>> {
        self.auth.require_role(context, UserRole::Admin)?;
        self.db.users.list(limit, offset).await
    }

    /// Device tokens of every non-banned user, for fest-wide broadcasts
    pub async fn all_fcm_tokens(&self, context: &AuthContext) -> Result<Vec<String>> {
        self.auth.require_role(context, UserRole::Admin)?;
        self.db.users.all_fcm_tokens().await
    }
}
