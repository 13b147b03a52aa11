//! Category label → integer id encoding.

use std::collections::BTreeMap;

/// Dense, 1-indexed ids for every distinct category label.
///
/// Labels are sorted (byte order) before numbering, so the same set of labels
/// always maps to the same ids regardless of row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    ids: BTreeMap<String, u32>,
    labels: Vec<String>,
}

impl CategoryIndex {
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids: BTreeMap<String, u32> = labels
            .into_iter()
            .map(|s| (s.as_ref().to_string(), 0))
            .collect();

        let mut ordered = Vec::with_capacity(ids.len());
        for (idx, (label, id)) in ids.iter_mut().enumerate() {
            *id = idx as u32 + 1;
            ordered.push(label.clone());
        }

        Self { ids, labels: ordered }
    }

    pub fn id_of(&self, label: &str) -> Option<u32> {
        self.ids.get(label).copied()
    }

    pub fn label_of(&self, id: u32) -> Option<&str> {
        let idx = usize::try_from(id).ok()?.checked_sub(1)?;
        self.labels.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(id, label)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (idx as u32 + 1, label.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_alphabetical_and_dense() {
        let index = CategoryIndex::from_labels(["Latte", "Espresso", "Latte", "Americano"]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.id_of("Americano"), Some(1));
        assert_eq!(index.id_of("Espresso"), Some(2));
        assert_eq!(index.id_of("Latte"), Some(3));
        assert_eq!(index.id_of("Mocha"), None);
    }

    #[test]
    fn encoding_is_stable_within_a_run() {
        let index = CategoryIndex::from_labels(["Cortado", "Cocoa"]);
        assert_eq!(index.id_of("Cortado"), index.id_of("Cortado"));
        assert_eq!(index.label_of(2), Some("Cortado"));
        assert_eq!(index.label_of(0), None);
        assert_eq!(index.label_of(3), None);
    }

    #[test]
    fn row_order_does_not_change_ids() {
        let a = CategoryIndex::from_labels(["b", "a", "c"]);
        let b = CategoryIndex::from_labels(["c", "b", "a", "a"]);
        assert_eq!(a, b);
        let pairs: Vec<_> = a.iter().collect();
        assert_eq!(pairs, vec![(1, "a"), (2, "b"), (3, "c")]);
    }
}
