//! Utility modules shared across the crate.
//!
//! - [`datetime`] - Date parsing, formatting and the notion of "today"

pub mod datetime;
