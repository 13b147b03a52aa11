//! `coffee-forecast` library crate.
//!
//! The binary (`coffee`) is a thin wrapper around this library so that:
//!
//! - the forecast pipeline is testable without spawning processes
//! - the chart, dashboard and report share one set of results
//!
//! Data flows one way: `io::ingest` -> `features` -> `aggregate` -> `forecast`,
//! and the presentations (`tui`, `dashboard`, `report`, `plot`) only read the result.

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod forecast;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
