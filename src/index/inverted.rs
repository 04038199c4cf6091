//! In-memory inverted index.

use crate::index::builder::IndexBuilder;
use std::collections::HashMap;

/// Maps index keys to the ordered list of row ids reachable through them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<usize>>,
}

impl InvertedIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Row ids stored under `key`, in insertion order.
    pub fn get(&self, key: &str) -> &[usize] {
        self.postings.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

impl IndexBuilder for InvertedIndex {
    fn insert(&mut self, key: &str, row_id: usize) {
        let rows = self.postings.entry(key.to_string()).or_default();
        // Keys repeated within one identifier must not list the row twice.
        if rows.last() != Some(&row_id) {
            rows.push(row_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order_and_skips_repeats() {
        let mut index = InvertedIndex::new();
        index.insert("ab", 0);
        index.insert("ab", 0);
        index.insert("ab", 2);
        index.insert("cd", 1);
        assert_eq!(index.get("ab"), &[0, 2]);
        assert_eq!(index.get("cd"), &[1]);
        assert!(index.get("zz").is_empty());
        assert_eq!(index.len(), 2);
    }
}
