//! The synonym database: a denormalized table of `(category, identifier)`
//! rows plus an optional inverted index over them.

use crate::error::{FrcError, FrcResult};
use crate::index::{IndexKeyer, InvertedIndex};
use crate::pipeline::Pipeline;
use crate::types::{Data, Synonym};
use std::collections::HashSet;
use tracing::debug;

/// One denormalized row. Its position in the table is its row id.
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymRow {
  pub category: String,
  pub transformed: Data,
}

/// The inverted index together with the keyer that built it.
#[derive(Debug, Clone)]
pub struct SynonymIndex {
  keyer: IndexKeyer,
  postings: InvertedIndex,
}

impl SynonymIndex {
  /// Keys of `raw`, derived exactly as identifiers were keyed.
  pub fn keys(&self, raw: &str) -> Vec<String> {
    self.keyer.keys(raw)
  }

  /// Row ids stored under `key`.
  pub fn rows(&self, key: &str) -> &[usize] {
    self.postings.get(key)
  }

  pub fn postings(&self) -> &InvertedIndex {
    &self.postings
  }
}

/// Rows in category order, then identifier order, plus the optional index.
#[derive(Debug, Clone)]
pub struct SynonymDb {
  rows: Vec<SynonymRow>,
  index: Option<SynonymIndex>,
}

impl SynonymDb {
  /// Validates `synonyms` and builds the table and, when `keyer` is given,
  /// the index.
  ///
  /// Fails on the first invalid synonym; nothing is kept on failure.
  pub fn build(synonyms: &[Synonym], transform: &Pipeline, keyer: Option<IndexKeyer>) -> FrcResult<Self> {
    let mut categories = HashSet::with_capacity(synonyms.len());
    let mut rows = Vec::new();
    let mut postings = InvertedIndex::new();

    for synonym in synonyms {
      if synonym.category.is_empty() {
        return Err(FrcError::InvalidCategory {
          found: "\"\"".to_string(),
        });
      }
      if !categories.insert(synonym.category.as_str()) {
        return Err(FrcError::DuplicateCategory {
          category: synonym.category.clone(),
        });
      }
      if synonym.identifiers.is_empty() {
        return Err(FrcError::EmptyIdentifiers {
          category: synonym.category.clone(),
          found: "[]".to_string(),
        });
      }

      for identifier in &synonym.identifiers {
        if identifier.is_empty() {
          return Err(FrcError::InvalidIdentifier {
            category: synonym.category.clone(),
            found: "\"\"".to_string(),
          });
        }
        if let Some(keyer) = &keyer {
          keyer.index(identifier, &mut postings, rows.len());
        }
        rows.push(SynonymRow {
          category: synonym.category.clone(),
          transformed: transform.run(identifier),
        });
      }
    }

    debug!(
      categories = categories.len(),
      rows = rows.len(),
      index_keys = postings.len(),
      indexed = keyer.is_some(),
      "built synonym database"
    );

    Ok(Self {
      rows,
      index: keyer.map(|keyer| SynonymIndex { keyer, postings }),
    })
  }

  pub fn rows(&self) -> &[SynonymRow] {
    &self.rows
  }

  pub fn row(&self, row_id: usize) -> Option<&SynonymRow> {
    self.rows.get(row_id)
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }

  /// The index, or `None` when the database is searched linearly.
  pub fn index(&self) -> Option<&SynonymIndex> {
    self.index.as_ref()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::capabilities::Registry;
  use crate::task::compile_step;
  use crate::types::TaskDescriptor;

  fn lower_case() -> Pipeline {
    Pipeline::compile(
      "similarityPrepTasks",
      &[TaskDescriptor::new("string.lowerCase")],
      &Registry::standard(),
      None,
    )
    .unwrap()
  }

  #[test]
  fn test_rows_follow_category_then_identifier_order() {
    let synonyms = vec![
      Synonym::new("set", ["Set Theory", "Object Set"]),
      Synonym::new("map", ["Hash Map"]),
    ];
    let db = SynonymDb::build(&synonyms, &lower_case(), None).unwrap();
    let rows: Vec<_> = db
      .rows()
      .iter()
      .map(|r| (r.category.as_str(), r.transformed.clone().into_text()))
      .collect();
    assert_eq!(
      rows,
      vec![
        ("set", "set theory".to_string()),
        ("set", "object set".to_string()),
        ("map", "hash map".to_string()),
      ]
    );
    assert!(db.index().is_none());
  }

  #[test]
  fn test_index_points_at_row_ids() {
    let registry = Registry::standard();
    let prep = Pipeline::compile(
      "indexPrepTasks",
      &[TaskDescriptor::new("string.tokenize0")],
      &registry,
      None,
    )
    .unwrap();
    let keyer = IndexKeyer::new(prep, compile_step("indexUsing", &TaskDescriptor::new("tokens.sow"), &registry).unwrap())
      .unwrap();
    let synonyms = vec![
      Synonym::new("set", ["set theory", "object set"]),
      Synonym::new("map", ["object map"]),
    ];
    let db = SynonymDb::build(&synonyms, &lower_case(), Some(keyer)).unwrap();
    let index = db.index().unwrap();
    assert_eq!(index.rows("object"), &[1, 2]);
    assert_eq!(index.rows("set"), &[0, 1]);
    assert_eq!(index.rows("theory"), &[0]);
  }

  #[test]
  fn test_validation_errors() {
    let prep = lower_case();
    let cases = vec![
      (vec![Synonym::new("", ["a"])], "InvalidCategory"),
      (vec![Synonym::new("a", ["x"]), Synonym::new("a", ["y"])], "DuplicateCategory"),
      (vec![Synonym::new("a", Vec::<String>::new())], "EmptyIdentifiers"),
      (vec![Synonym::new("a", ["x", ""])], "InvalidIdentifier"),
    ];
    for (synonyms, expected) in cases {
      let err = SynonymDb::build(&synonyms, &prep, None).unwrap_err();
      assert!(format!("{:?}", err).starts_with(expected), "{:?}", err);
    }
  }
}
