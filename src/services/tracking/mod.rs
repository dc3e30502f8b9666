//! Funnel Tracking
//!
//! Delivers `FunnelEvent`s to HTTP collectors and the log without ever
//! feeding back into the quiz flow.

pub mod channels;
pub mod service;
pub mod types;

pub use channels::{HttpTrackingChannel, LogTrackingChannel, TrackingChannel};
pub use service::TrackingService;
pub use types::{TrackingError, TrackingPayload};
