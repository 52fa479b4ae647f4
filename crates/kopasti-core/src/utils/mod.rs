//! Display formatting helpers.

pub mod format;

pub use format::{format_percentage, format_score};
