//! Mathematical utilities: least-squares linear regression.

pub mod ols;

pub use ols::*;
