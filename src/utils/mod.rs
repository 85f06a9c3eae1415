//! Utility modules

pub mod errors;
pub mod helpers;
pub mod logging;

pub use errors::{AvishkarError, Result};
