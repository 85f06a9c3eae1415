//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    DatabasePool, EventRepository, FestRepository, RegistrationRepository, UserRepository,
};
use crate::utils::errors::AvishkarError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
    pub fest: FestRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            fest: FestRepository::new(pool),
        }
    }

    /// Get system statistics for the admin dashboard
    pub async fn get_system_stats(&self) -> Result<serde_json::Value, AvishkarError> {
        let total_users = self.users.count().await?;
        let total_events = self.events.count().await?;
        let total_registrations = self.registrations.count().await?;

        let stats = serde_json::json!({
            "total_users": total_users,
            "total_events": total_events,
            "total_registrations": total_registrations,
        });

        Ok(stats)
    }
}
