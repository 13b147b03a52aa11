//! Feature derivation: calendar fields and category ids.
//!
//! Takes the loaded records by reference and returns a new `DerivedSales`; the
//! timestamps and amounts of the input are never touched.

pub mod category;

pub use category::*;

use chrono::Datelike;

use crate::domain::DerivedSale;
use crate::io::ingest::LoadedSales;

/// Every sale is assumed to happen at noon; the source has no time of day.
pub const ASSUMED_HOUR: u32 = 12;

/// Loaded records with derived features and the category encoding used.
#[derive(Debug, Clone)]
pub struct DerivedSales {
    pub sales: Vec<DerivedSale>,
    pub categories: CategoryIndex,
}

impl DerivedSales {
    /// Rows belonging to one category id, in input order.
    pub fn for_category(&self, category_id: u32) -> impl Iterator<Item = &DerivedSale> + '_ {
        self.sales.iter().filter(move |s| s.category_id == category_id)
    }
}

/// Attach `year`, `day_of_week`, `hour` and `category_id` to every record.
pub fn derive_features(loaded: &LoadedSales) -> DerivedSales {
    let categories = CategoryIndex::from_labels(loaded.records.iter().map(|r| r.category.as_str()));

    let sales = loaded
        .records
        .iter()
        .map(|r| DerivedSale {
            category: r.category.clone(),
            // Built from these same labels, so the lookup always succeeds.
            category_id: categories.id_of(&r.category).unwrap_or_default(),
            year: r.timestamp.year(),
            day_of_week: r.timestamp.weekday().num_days_from_monday(),
            hour: ASSUMED_HOUR,
            amount: r.amount,
        })
        .collect();

    DerivedSales { sales, categories }
}
