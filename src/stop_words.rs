//! The stop-word exclusion set.

use crate::error::{FrcError, FrcResult};
use crate::pipeline::Pipeline;
use std::collections::HashSet;
use tracing::debug;

/// An immutable set of prepared stop words.
///
/// Words are run through the stop-word preparation pipeline once, at build
/// time, so that `exclude` is a plain lookup at query time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopWordSet {
  words: HashSet<String>,
}

impl StopWordSet {
  /// Validates `words` and prepares each one with `prep`.
  ///
  /// `prep` must produce text; the pipeline compiler guarantees this for
  /// stop-word pipelines.
  pub fn build(words: &[String], prep: &Pipeline) -> FrcResult<Self> {
    let mut prepared = HashSet::with_capacity(words.len());
    for word in words {
      if word.is_empty() {
        return Err(FrcError::InvalidStopWord {
          found: "\"\"".to_string(),
        });
      }
      prepared.insert(prep.run(word).into_text());
    }
    debug!(count = prepared.len(), "prepared stop words");
    Ok(Self { words: prepared })
  }

  /// Creates a set from words that are already prepared.
  pub fn from_prepared<I, S>(words: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      words: words.into_iter().map(Into::into).collect(),
    }
  }

  /// Whether `token` must be removed.
  pub fn exclude(&self, token: &str) -> bool {
    self.words.contains(token)
  }

  pub fn len(&self) -> usize {
    self.words.len()
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }
}
