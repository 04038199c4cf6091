//! Defines the `IndexBuilder` trait that index capabilities write into.

/// A sink for `(key, row id)` pairs produced while indexing identifiers.
///
/// Index capabilities decide how an identifier fans out into keys (one per
/// n-gram, one per word, its first character, ...) and report each key
/// through `insert`. Implementations decide how the postings are stored.
pub trait IndexBuilder {
    /// Records that the row `row_id` is reachable through `key`.
    ///
    /// # Arguments
    ///
    /// * `key` - An index key derived from a transformed identifier.
    /// * `row_id` - The position of the identifier's row in the synonym table.
    fn insert(&mut self, key: &str, row_id: usize);
}
