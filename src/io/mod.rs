//! Input/output helpers.
//!
//! - CSV ingest of sale records (`ingest`)
//! - forecast CSV export (`export`)
//! - forecast JSON read/write (`forecast`)

pub mod export;
pub mod forecast;
pub mod ingest;

pub use export::*;
pub use forecast::*;
pub use ingest::*;
