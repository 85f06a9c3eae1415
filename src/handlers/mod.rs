//! HTTP handlers module
//!
//! Route handlers grouped by surface, plus the router assembly. Public
//! routes serve the catalogue and contact form; everything else sits
//! behind the bearer-token middleware. Role checks live in the services,
//! so a mis-wired route fails closed.

pub mod admin;
pub mod attendance;
pub mod auth;
pub mod events;
pub mod health;
pub mod registrations;
pub mod settings;
pub mod upload;
pub mod users;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::auth::require_auth;
use crate::state::AppState;

/// Assemble the application router
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/events", get(events::list_public))
        .route("/api/events/:id", get(events::get))
        .route("/api/settings", get(settings::get_public))
        .route("/api/contact", post(settings::submit_contact))
        .route("/api/auth/sync", post(auth::sync));

    let protected_routes = Router::new()
        // Profile
        .route("/api/users/me", get(users::me).patch(users::update_me))
        .route("/api/users/me/fcm-token", post(users::register_fcm_token))
        .route(
            "/api/users/me/organizer-request",
            post(users::request_organizer),
        )
        // Registrations
        .route("/api/registrations", post(registrations::create))
        .route("/api/registrations/mine", get(registrations::list_mine))
        .route(
            "/api/registrations/:id/payment",
            post(registrations::upload_payment),
        )
        .route(
            "/api/registrations/:id/review",
            post(registrations::review),
        )
        .route("/api/registrations/:id/pass", get(registrations::get_pass))
        .route("/api/registrations/:id", delete(registrations::cancel))
        // Organizer event management
        .route("/api/events", post(events::create))
        .route("/api/events/mine", get(events::list_mine))
        .route("/api/events/:id", patch(events::update))
        .route(
            "/api/events/:id/registrations",
            get(events::list_registrations),
        )
        // Attendance
        .route("/api/attendance/mark", post(attendance::scan))
        // Uploads
        .route("/api/upload", post(upload::upload))
        // Admin dashboard
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/events", get(admin::list_events))
        .route("/api/admin/events/pending", get(admin::list_pending_events))
        .route("/api/admin/events/:id/review", post(admin::review_event))
        .route(
            "/api/admin/events/:id/complete",
            post(admin::complete_event),
        )
        .route("/api/admin/events/:id", delete(admin::delete_event))
        .route("/api/admin/users", get(admin::list_users))
        .route(
            "/api/admin/organizer-requests",
            get(admin::list_organizer_requests),
        )
        .route(
            "/api/admin/organizer-requests/:id/review",
            post(admin::review_organizer_request),
        )
        .route("/api/admin/users/:id/role", post(admin::set_role))
        .route("/api/admin/users/:id/ban", post(admin::set_banned))
        .route("/api/admin/settings", patch(admin::update_settings))
        .route(
            "/api/admin/contact-messages",
            get(admin::list_contact_messages),
        )
        .route("/api/notifications/broadcast", post(admin::broadcast))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service(
            &state.settings.uploads.public_base_path,
            ServeDir::new(&state.settings.uploads.directory),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
