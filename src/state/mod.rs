//! Application state shared across request handlers

use crate::config::settings::Settings;
use crate::database::{DatabasePool, DatabaseService};
use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter};
use crate::services::ServiceFactory;

/// Shared state injected into every handler by the router
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub pool: DatabasePool,
    pub db: DatabaseService,
    pub services: ServiceFactory,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(
        settings: Settings,
        pool: DatabasePool,
        db: DatabaseService,
        services: ServiceFactory,
    ) -> Self {
        Self {
            settings,
            pool,
            db,
            services,
            rate_limiter: RateLimiter::new(RateLimitConfig::default()),
        }
    }
}
