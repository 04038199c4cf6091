//! textfrc - A rule-driven fuzzy text classifier.
//!
//! A classifier is compiled from declarative [`Rules`](rules::Rules): text
//! preparation pipelines, a similarity measure, optional stop words, an
//! optional index builder and a list of categories with their identifiers.
//! Queries are mapped to the category whose identifier is most similar.

pub mod capabilities;
pub mod classifier;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod rules;
pub mod stop_words;
pub mod synonyms;
pub mod task;
pub mod types;

pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::capabilities::{Capability, Comparison, IndexMode, Measure, Phase, Registry, Transform};
    pub use crate::classifier::*;
    pub use crate::error::*;
    pub use crate::index::*;
    pub use crate::pipeline::*;
    pub use crate::rules::*;
    pub use crate::stop_words::*;
    pub use crate::synonyms::*;
    pub use crate::task::*;
    pub use crate::types::*;
}
