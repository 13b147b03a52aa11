//! Data sources other than the user's CSV.
//!
//! - `sample`: deterministic synthetic coffee-sales generator

pub mod sample;

pub use sample::{MENU, SampleConfig, SaleRow, generate_sales, write_sales_csv};
