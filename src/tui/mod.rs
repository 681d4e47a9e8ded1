//! TUI module: Terminal User Interface using Ratatui.
//!
//! Screens:
//! - Dashboard with artifact status and session counters
//! - Policyholder form for single predictions
//! - Prediction result
//! - Batch prediction over an uploaded file

mod app;
mod styles;
mod ui;

pub use app::{App, Screen};
pub use styles::ClaimTheme;
