//! Inverted index over synonym rows.

pub mod builder;
pub mod inverted;
pub mod keyer;

pub use builder::IndexBuilder;
pub use inverted::InvertedIndex;
pub use keyer::{IndexKeyer, INDEX_USING};
