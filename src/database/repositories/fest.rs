//! Fest settings and contact message repository

use chrono::Utc;
use sqlx::PgPool;

use crate::models::fest::{
    ContactMessage, CreateContactMessageRequest, FestSettings, UpdateFestSettingsRequest,
};
use crate::utils::errors::AvishkarError;

#[derive(Debug, Clone)]
pub struct FestRepository {
    pool: PgPool,
}

impl FestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the singleton settings row
    pub async fn get_settings(&self) -> Result<FestSettings, AvishkarError> {
        let settings = sqlx::query_as::<_, FestSettings>(
            "SELECT id, fest_name, edition, registrations_open, payment_upi_id, support_email, support_phone, updated_at FROM fest_settings WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Update fest-wide settings
    pub async fn update_settings(
        &self,
        request: UpdateFestSettingsRequest,
    ) -> Result<FestSettings, AvishkarError> {
        let settings = sqlx::query_as::<_, FestSettings>(
            r#"
            UPDATE fest_settings
            SET fest_name = COALESCE($1, fest_name),
                edition = COALESCE($2, edition),
                registrations_open = COALESCE($3, registrations_open),
                payment_upi_id = COALESCE($4, payment_upi_id),
                support_email = COALESCE($5, support_email),
                support_phone = COALESCE($6, support_phone),
                updated_at = $7
            WHERE id = 1
            RETURNING id, fest_name, edition, registrations_open, payment_upi_id, support_email, support_phone, updated_at
            "#,
        )
        .bind(request.fest_name)
        .bind(request.edition)
        .bind(request.registrations_open)
        .bind(request.payment_upi_id)
        .bind(request.support_email)
        .bind(request.support_phone)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Store a contact form message
    pub async fn create_contact_message(
        &self,
        request: CreateContactMessageRequest,
    ) -> Result<ContactMessage, AvishkarError> {
        let message = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, subject, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, subject, message, created_at
            "#,
        )
        .bind(request.name)
        .bind(request.email)
        .bind(request.subject)
        .bind(request.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// List contact messages, newest first (admin view)
    pub async fn list_contact_messages(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContactMessage>, AvishkarError> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            "SELECT id, name, email, subject, message, created_at FROM contact_messages ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}
