//! User repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::user::{CreateUserRequest, UpdateUserRequest, User, UserRole};
use crate::utils::errors::AvishkarError;

const USER_COLUMNS: &str = "id, firebase_uid, email, display_name, mobile, role, organizer_request, fcm_tokens, is_banned, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with the default participant role
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, AvishkarError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (firebase_uid, email, display_name, mobile, role, organizer_request, fcm_tokens, is_banned, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 'participant', false, '{}', false, $5, $5)
            RETURNING id, firebase_uid, email, display_name, mobile, role, organizer_request, fcm_tokens, is_banned, created_at, updated_at
            "#,
        )
        .bind(request.firebase_uid)
        .bind(request.email)
        .bind(request.display_name)
        .bind(request.mobile)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AvishkarError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by the external auth subject
    pub async fn find_by_firebase_uid(&self, uid: &str) -> Result<Option<User>, AvishkarError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE firebase_uid = $1",
            USER_COLUMNS
        ))
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user profile fields
    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<User, AvishkarError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET display_name = COALESCE($2, display_name),
                mobile = COALESCE($3, mobile),
                organizer_request = COALESCE($4, organizer_request),
                is_banned = COALESCE($5, is_banned),
                updated_at = $6
            WHERE id = $1
            RETURNING id, firebase_uid, email, display_name, mobile, role, organizer_request, fcm_tokens, is_banned, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.display_name)
        .bind(request.mobile)
        .bind(request.organizer_request)
        .bind(request.is_banned)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Change user role
    pub async fn set_role(&self, id: i64, role: UserRole) -> Result<User, AvishkarError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $2, organizer_request = false, updated_at = $3
            WHERE id = $1
            RETURNING id, firebase_uid, email, display_name, mobile, role, organizer_request, fcm_tokens, is_banned, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Register a device push token, deduplicated
    pub async fn add_fcm_token(&self, id: i64, token: &str) -> Result<User, AvishkarError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET fcm_tokens = array_append(array_remove(fcm_tokens, $2), $2),
                updated_at = $3
            WHERE id = $1
            RETURNING id, firebase_uid, email, display_name, mobile, role, organizer_request, fcm_tokens, is_banned, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(token)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Collect every registered device token across non-banned users
    pub async fn all_fcm_tokens(&self) -> Result<Vec<String>, AvishkarError> {
        let tokens: Vec<(String,)> = sqlx::query_as(
            "SELECT unnest(fcm_tokens) FROM users WHERE is_banned = false",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tokens.into_iter().map(|t| t.0).collect())
    }

    /// List users with pending organizer requests
    pub async fn list_organizer_requests(&self) -> Result<Vec<User>, AvishkarError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE organizer_request = true AND role = 'participant' ORDER BY updated_at ASC",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// List users with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, AvishkarError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at ASC LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, AvishkarError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
