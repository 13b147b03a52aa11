//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the run configuration (`ForecastConfig`, `Target`, `Horizon`)
//! - loaded and derived sale records (`SaleRecord`, `DerivedSale`, `YearlyCount`)
//! - forecast outputs (`LinearFit`, `ForecastSeries`, `ForecastFile`)

pub mod types;

pub use types::*;
