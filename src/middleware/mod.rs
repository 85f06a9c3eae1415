//! Middleware module
//!
//! Request authentication and rate limiting for the API router

pub mod auth;
pub mod rate_limit;

pub use auth::require_auth;
pub use rate_limit::{RateLimitConfig, RateLimiter};
