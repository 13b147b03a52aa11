//! Yearly transaction counts per category.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::YearlyCount;
use crate::features::DerivedSales;

/// Count sales per (category, year).
///
/// Only non-empty pairs produce a row; output is sorted by category then year.
pub fn yearly_counts(derived: &DerivedSales) -> Vec<YearlyCount> {
    let mut counts: BTreeMap<(&str, i32), usize> = BTreeMap::new();
    for sale in &derived.sales {
        *counts.entry((sale.category.as_str(), sale.year)).or_default() += 1;
    }

    debug!(groups = counts.len(), "aggregated yearly counts");

    counts
        .into_iter()
        .map(|((category, year), count)| YearlyCount {
            category: category.to_string(),
            year,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DerivedSale;
    use crate::features::CategoryIndex;

    fn sale(category: &str, year: i32) -> DerivedSale {
        DerivedSale {
            category: category.to_string(),
            category_id: 0,
            year,
            day_of_week: 0,
            hour: 12,
            amount: None,
        }
    }

    #[test]
    fn counts_per_category_and_year() {
        let derived = DerivedSales {
            sales: vec![
                sale("Latte", 2023),
                sale("Latte", 2022),
                sale("Espresso", 2022),
                sale("Latte", 2023),
            ],
            categories: CategoryIndex::from_labels(["Latte", "Espresso"]),
        };

        let counts = yearly_counts(&derived);
        let rows: Vec<_> = counts.iter().map(|c| (c.category.as_str(), c.year, c.count)).collect();
        assert_eq!(
            rows,
            vec![("Espresso", 2022, 1), ("Latte", 2022, 1), ("Latte", 2023, 2)]
        );
    }

    #[test]
    fn years_without_sales_have_no_row() {
        let derived = DerivedSales {
            sales: vec![sale("Mocha", 2020), sale("Mocha", 2023)],
            categories: CategoryIndex::from_labels(["Mocha"]),
        };
        let counts = yearly_counts(&derived);
        assert_eq!(counts.len(), 2);
        assert!(counts.iter().all(|c| c.count > 0));
    }
}
