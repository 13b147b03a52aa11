//! Terminal reporting for forecast runs.
//!
//! We keep formatting code in one place so:
//! - the math/forecast code stays clean and testable
//! - output changes are localized

pub mod format;

pub use format::*;
