//! Data Models
//!
//! Settings structures shared by the CLI and the services.

pub mod settings;

pub use settings::*;
