//! Storage Layer
//!
//! Settings file persistence and environment overrides.

pub mod config;

pub use config::*;
