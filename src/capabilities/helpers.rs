//! The reserved `helper` namespace.
//!
//! Helpers exist only while the classifier is being built: `helper.words`
//! turns prepared stop words into a [`StopWordSet`](crate::stop_words::StopWordSet)
//! and `helper.index` creates the inverted index. They resolve like any other
//! name so that misuse is reported as disallowed rather than unknown.

use super::{Capability, Registry};

/// Namespace prefix of construction-time helpers.
pub const HELPER_NAMESPACE: &str = "helper.";

pub fn register(registry: &mut Registry) {
  registry
    .register_prepare("helper.words", Capability::Helper)
    .register_prepare("helper.index", Capability::Helper);
}

/// Whether `name` belongs to the helper namespace.
pub fn is_helper(name: &str) -> bool {
  name.starts_with(HELPER_NAMESPACE)
}
