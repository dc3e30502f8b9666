//! Presentation
//!
//! Front-end independent view model and the analyzing ticker.

pub mod ticker;
pub mod view;

pub use ticker::{AnalyzingTicker, TickerFrame, TICK_INTERVAL};
pub use view::{render, QuizView, ViewAction, ANALYZING_MESSAGE, PREPARING_MESSAGE};
