//! Data models

pub mod event;
pub mod fest;
pub mod pass;
pub mod registration;
pub mod user;

pub use event::{CreateEventRequest, Event, EventStatus, UpdateEventRequest};
pub use fest::{
    ContactMessage, CreateContactMessageRequest, FestSettings, UpdateFestSettingsRequest,
};
pub use pass::PassPayload;
pub use registration::{
    CreateRegistrationRequest, Registration, RegistrationStatus, ReviewDecision,
};
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserRole};
