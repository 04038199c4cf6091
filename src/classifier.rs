//! The rule-driven fuzzy classifier.

use crate::capabilities::{Measure, Registry};
use crate::error::{FrcError, FrcResult};
use crate::index::{IndexKeyer, INDEX_USING};
use crate::pipeline::Pipeline;
use crate::rules::Rules;
use crate::stop_words::StopWordSet;
use crate::synonyms::SynonymDb;
use crate::task::{compile_measure, compile_step, CompiledTask};
use crate::types::{Data, Prediction};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A classifier compiled from [`Rules`].
///
/// `TextFrc` maps free text onto one of the categories declared in the
/// rules. Every identifier of every category is transformed once, at
/// construction, by the similarity prep pipeline. A query goes through the
/// same pipeline and is compared with the stored identifiers using the
/// similarity measure; the category of the best scoring identifier wins.
///
/// When the rules declare `indexUsing`, identifiers are also keyed into an
/// inverted index and a query is only compared with the identifiers that
/// share at least one key with it. Otherwise every identifier is compared.
///
/// Construction validates the whole configuration and fails on the first
/// problem. Once built the classifier is immutable and `predict` never fails.
///
/// # Examples
///
/// ```rust
/// use textfrc::prelude::*;
///
/// let rules = Rules::builder()
///   .similarity_prep(TaskDescriptor::new("string.lowerCase"))
///   .similarity_prep(TaskDescriptor::new("string.tokenize"))
///   .similarity_prep(TaskDescriptor::new("tokens.sow"))
///   .similarity_measure(TaskDescriptor::new("set.jaccard"))
///   .synonym("set", ["set theory", "object set"])
///   .synonym("map", ["hash map", "object map"])
///   .build();
///
/// let frc = TextFrc::new(rules).unwrap();
/// let prediction = frc.predict("set & object").unwrap();
/// assert_eq!(prediction.label.as_deref(), Some("set"));
/// ```
#[derive(Debug, Clone)]
pub struct TextFrc {
  /// Transforms identifiers and queries before comparison.
  similarity_prep: Pipeline,
  /// Compares a transformed query with a transformed identifier.
  measure: CompiledTask<Measure>,
  /// The denormalized synonyms and the optional index.
  db: SynonymDb,
}

impl TextFrc {
  /// Compiles `rules` against the standard capabilities.
  pub fn new(rules: Rules) -> FrcResult<Self> {
    Self::with_registry(rules, &Registry::standard())
  }

  /// Compiles `rules` against `registry`.
  ///
  /// # Arguments
  ///
  /// * `rules` - The configuration to compile.
  /// * `registry` - Resolves every capability name used in `rules`.
  ///
  /// # Returns
  ///
  /// The ready classifier, or the first configuration error found. Stop words
  /// are checked first, then the index and similarity pipelines, the index
  /// builder, the synonyms and finally the similarity measure.
  pub fn with_registry(rules: Rules, registry: &Registry) -> FrcResult<Self> {
    let stop_words_prep = Pipeline::compile_stop_words(&rules.stop_words_prep_tasks, registry)?;
    let stop_words = match &rules.stop_words {
      Some(words) if !words.is_empty() => StopWordSet::build(words, &stop_words_prep)?,
      _ => StopWordSet::default(),
    };
    let stop_words = Arc::new(stop_words);

    let index_prep = Pipeline::compile("indexPrepTasks", &rules.index_prep_tasks, registry, Some(&stop_words))?;
    let similarity_prep = Pipeline::compile(
      "similarityPrepTasks",
      &rules.similarity_prep_tasks,
      registry,
      Some(&stop_words),
    )?;

    let keyer = match &rules.index_using {
      Some(descriptor) => Some(IndexKeyer::new(
        index_prep,
        compile_step(INDEX_USING, descriptor, registry)?,
      )?),
      None => None,
    };

    let db = SynonymDb::build(&rules.synonyms, &similarity_prep, keyer)?;

    let measure = rules
      .similarity_measure
      .as_ref()
      .ok_or_else(|| FrcError::ConfigShape {
        field: "similarityMeasure".to_string(),
        expected: "an array",
        found: "undefined".to_string(),
      })
      .and_then(|descriptor| compile_measure("similarityMeasure", descriptor, registry))?;

    debug!(
      rows = db.len(),
      indexed = db.index().is_some(),
      measure = measure.name(),
      stop_words = stop_words.len(),
      "classifier ready"
    );

    Ok(Self {
      similarity_prep,
      measure,
      db,
    })
  }

  /// Parses and compiles rules given as a JSON value.
  pub fn from_value(rules: &Value) -> FrcResult<Self> {
    Self::new(Rules::from_value(rules)?)
  }

  /// Parses and compiles rules given as a JSON string.
  pub fn from_json(rules: &str) -> FrcResult<Self> {
    Self::new(Rules::from_json(rules)?)
  }

  /// Predicts the category of `input`.
  ///
  /// # Returns
  ///
  /// `None` for an empty input. Otherwise the category of the identifier
  /// with the highest similarity, and that similarity. On ties the first
  /// identifier visited wins. When nothing scores above zero the label is
  /// `None` and the score is `0.0`.
  pub fn predict(&self, input: &str) -> Option<Prediction> {
    if input.is_empty() {
      return None;
    }

    let prototype = self.similarity_prep.run(input);
    let mut best: Option<usize> = None;
    let mut score = 0.0;
    let mut compared = 0usize;
    let mut consider = |row_id: usize, variant: &Data| {
      compared += 1;
      let similarity = self.measure.compare(&prototype, variant).similarity;
      if similarity > score {
        score = similarity;
        best = Some(row_id);
      }
    };

    match self.db.index() {
      Some(index) => {
        let mut searched = vec![false; self.db.len()];
        for key in index.keys(input) {
          for &row_id in index.rows(&key) {
            match searched.get_mut(row_id) {
              Some(seen) if !*seen => *seen = true,
              _ => continue,
            }
            if let Some(row) = self.db.row(row_id) {
              consider(row_id, &row.transformed);
            }
          }
        }
      }
      None => {
        for (row_id, row) in self.db.rows().iter().enumerate() {
          consider(row_id, &row.transformed);
        }
      }
    }

    let label = best.and_then(|row_id| self.db.row(row_id)).map(|row| row.category.clone());
    trace!(input, compared, ?label, score, "predicted");
    Some(Prediction { label, score })
  }

  /// Predicts the category of a dynamically typed input.
  ///
  /// Only strings are classified; `null`, booleans, numbers, arrays and
  /// objects give `None`, as does the empty string.
  pub fn predict_value(&self, input: &Value) -> Option<Prediction> {
    match input {
      Value::String(text) => self.predict(text),
      _ => None,
    }
  }

  /// Predicts every input, preserving order.
  ///
  /// With the `parallel` feature the inputs are classified on rayon's pool.
  pub fn predict_batch(&self, inputs: &[&str]) -> Vec<Option<Prediction>> {
    #[cfg(feature = "parallel")]
    let predictions = inputs.par_iter().map(|input| self.predict(input)).collect();

    #[cfg(not(feature = "parallel"))]
    let predictions = inputs.iter().map(|input| self.predict(input)).collect();

    predictions
  }

  /// Whether predictions go through the inverted index.
  pub fn is_indexed(&self) -> bool {
    self.db.index().is_some()
  }

  /// The synonym database built from the rules.
  pub fn synonyms(&self) -> &SynonymDb {
    &self.db
  }

  /// Name of the compiled similarity measure.
  pub fn measure(&self) -> &str {
    self.measure.name()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::TaskDescriptor;

  fn set_rules() -> Rules {
    Rules::builder()
      .similarity_prep(TaskDescriptor::new("string.lowerCase"))
      .similarity_prep(TaskDescriptor::new("string.tokenize"))
      .similarity_prep(TaskDescriptor::new("tokens.sow"))
      .similarity_measure(TaskDescriptor::new("set.jaccard"))
      .synonym("set", ["set theory", "object set"])
      .synonym("map", ["hash map", "object map"])
      .build()
  }

  #[test]
  fn test_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TextFrc>();
  }

  #[test]
  fn test_linear_prediction() {
    let frc = TextFrc::new(set_rules()).unwrap();
    assert!(!frc.is_indexed());
    assert_eq!(frc.measure(), "set.jaccard");
    let p = frc.predict("set & object").unwrap();
    assert_eq!(p.label.as_deref(), Some("set"));
    assert!((p.score - 2.0 / 3.0).abs() < 1e-12);
  }

  #[test]
  fn test_empty_input() {
    let frc = TextFrc::new(set_rules()).unwrap();
    assert_eq!(frc.predict(""), None);
    assert_eq!(frc.predict_value(&Value::Null), None);
    assert_eq!(frc.predict_value(&Value::Bool(true)), None);
  }

  #[test]
  fn test_missing_measure() {
    let mut rules = set_rules();
    rules.similarity_measure = None;
    let err = TextFrc::new(rules).unwrap_err();
    assert_eq!(
      err.to_string(),
      "similarityMeasure should be an array, instead found: undefined"
    );
  }

  #[test]
  fn test_batch_preserves_order() {
    let frc = TextFrc::new(set_rules()).unwrap();
    let labels: Vec<_> = frc
      .predict_batch(&["hash map", "", "set theory"])
      .into_iter()
      .map(|p| p.and_then(|p| p.label))
      .collect();
    assert_eq!(labels, vec![Some("map".to_string()), None, Some("set".to_string())]);
  }
}
