//! Database repositories
//!
//! One repository per aggregate, each owning its SQL.

pub mod event;
pub mod fest;
pub mod registration;
pub mod user;

pub use event::EventRepository;
pub use fest::FestRepository;
pub use registration::RegistrationRepository;
pub use user::UserRepository;
