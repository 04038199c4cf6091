//! The capability registry.
//!
//! A [`Registry`] maps dotted names such as `"string.lowerCase"` to typed
//! callables. It is split into two repositories: *prepare* capabilities
//! (pipeline steps and index builders) and *similarity* capabilities
//! (comparators and comparator factories). The classifier resolves every
//! name once, at construction time, and never dispatches by name afterwards.
//!
//! # Example: registering a custom step
//!
//! ```rust
//! use textfrc::prelude::*;
//!
//! let mut registry = Registry::standard();
//! registry.register_prepare(
//!   "string.reverse",
//!   Capability::Transform(Transform::string(DataKind::Text, |s, _| {
//!     Data::Text(s.chars().rev().collect())
//!   })),
//! );
//! assert!(registry.prepare("string.reverse").is_some());
//! ```

/// Construction-time helper capabilities.
pub mod helpers;
/// Built-in similarity measures.
pub mod similarity;
/// Porter2 stemming, shared by `string.stem` and `tokens.stem`.
pub mod stem;
/// Built-in string-phase transformations.
pub mod string;
/// Built-in token-phase transformations.
pub mod tokens;

use crate::types::{Data, DataKind, Similarity, TaskArg};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Whether a task consumes a whole string or a token collection.
///
/// The ordering is meaningful: a pipeline's phases must never decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
  /// Operates on a whole string.
  String,
  /// Operates on a token collection.
  Token,
}

/// How an indexable transformation derives index keys from an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
  /// Keys are the unique keys of the transformation's output.
  Keys,
  /// The only key is the first character of the raw, untransformed input.
  FirstChar,
}

type TransformFn = Arc<dyn Fn(Data, &[TaskArg]) -> Data + Send + Sync>;

/// A pipeline step: a phase, the shape it produces and the function itself.
#[derive(Clone)]
pub struct Transform {
  phase: Phase,
  output: DataKind,
  index: Option<IndexMode>,
  apply: TransformFn,
}

impl Transform {
  /// Creates a string-phase transformation.
  pub fn string<F>(output: DataKind, f: F) -> Self
  where
    F: Fn(&str, &[TaskArg]) -> Data + Send + Sync + 'static,
  {
    Self {
      phase: Phase::String,
      output,
      index: None,
      apply: Arc::new(move |data: Data, args: &[TaskArg]| f(&data.into_text(), args)),
    }
  }

  /// Creates a token-phase transformation.
  pub fn tokens<F>(output: DataKind, f: F) -> Self
  where
    F: Fn(Vec<String>, &[TaskArg]) -> Data + Send + Sync + 'static,
  {
    Self {
      phase: Phase::Token,
      output,
      index: None,
      apply: Arc::new(move |data: Data, args: &[TaskArg]| f(data.into_tokens(), args)),
    }
  }

  /// Marks the transformation as usable for building an inverted index.
  pub fn indexed(mut self, mode: IndexMode) -> Self {
    self.index = Some(mode);
    self
  }

  /// The phase this transformation belongs to.
  pub fn phase(&self) -> Phase {
    self.phase
  }

  /// The shape of the value this transformation produces.
  pub fn output(&self) -> DataKind {
    self.output
  }

  /// The index mode, if this transformation can build an index.
  pub fn index_mode(&self) -> Option<IndexMode> {
    self.index
  }

  /// Applies the transformation with its bound arguments.
  pub fn apply(&self, data: Data, args: &[TaskArg]) -> Data {
    (self.apply)(data, args)
  }
}

impl fmt::Debug for Transform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Transform")
      .field("phase", &self.phase)
      .field("output", &self.output)
      .field("index", &self.index)
      .finish_non_exhaustive()
  }
}

/// A capability of the prepare repository.
#[derive(Debug, Clone)]
pub enum Capability {
  /// A string- or token-phase transformation.
  Transform(Transform),
  /// Removes stop words from tokens. The stop-word set is injected by the
  /// pipeline compiler, never passed as a literal argument.
  RemoveWords,
  /// A construction-time utility. Resolvable, but never a pipeline step.
  Helper,
}

impl Capability {
  /// The phase of this capability, if it can run inside a pipeline.
  pub fn phase(&self) -> Option<Phase> {
    match self {
      Capability::Transform(t) => Some(t.phase),
      Capability::RemoveWords => Some(Phase::Token),
      Capability::Helper => None,
    }
  }
}

/// A 2-ary `(prototype, variant)` comparator.
pub type Comparator = Arc<dyn Fn(&Data, &Data) -> Similarity + Send + Sync>;

/// A 4-ary `(prototype, variant, a, b)` comparator.
pub type ParameterizedComparator =
  Arc<dyn Fn(&Data, &Data, Option<f64>, Option<f64>) -> Similarity + Send + Sync>;

/// A capability that builds a comparator from literal arguments.
pub type ComparatorFactory = Arc<dyn Fn(&[TaskArg]) -> Comparator + Send + Sync>;

/// A comparator, tagged by its invocation arity.
#[derive(Clone)]
pub enum Measure {
  Binary(Comparator),
  Parameterized(ParameterizedComparator),
}

impl Measure {
  /// Number of arguments the comparator is invoked with.
  pub fn arity(&self) -> usize {
    match self {
      Measure::Binary(_) => 2,
      Measure::Parameterized(_) => 4,
    }
  }
}

impl fmt::Debug for Measure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Measure(arity = {})", self.arity())
  }
}

/// A capability of the similarity repository.
#[derive(Clone)]
pub enum Comparison {
  /// A comparator used as-is.
  Measure(Measure),
  /// A higher-order capability applied once, at compile time.
  Factory(ComparatorFactory),
}

impl fmt::Debug for Comparison {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Comparison::Measure(m) => fmt::Debug::fmt(m, f),
      Comparison::Factory(_) => f.write_str("Factory"),
    }
  }
}

/// An explicit set of named capabilities handed to the classifier.
#[derive(Debug, Clone, Default)]
pub struct Registry {
  prepare: HashMap<String, Capability>,
  similarity: HashMap<String, Comparison>,
}

impl Registry {
  /// Creates a registry with no capabilities.
  pub fn empty() -> Self {
    Self::default()
  }

  /// Creates a registry holding every built-in capability.
  pub fn standard() -> Self {
    let mut registry = Self::empty();
    string::register(&mut registry);
    tokens::register(&mut registry);
    helpers::register(&mut registry);
    similarity::register(&mut registry);
    registry
  }

  /// Adds or replaces a prepare capability.
  pub fn register_prepare(&mut self, name: impl Into<String>, capability: Capability) -> &mut Self {
    self.prepare.insert(name.into(), capability);
    self
  }

  /// Adds or replaces a similarity capability.
  pub fn register_similarity(&mut self, name: impl Into<String>, comparison: Comparison) -> &mut Self {
    self.similarity.insert(name.into(), comparison);
    self
  }

  /// Looks up a prepare capability by dotted name.
  pub fn prepare(&self, name: &str) -> Option<&Capability> {
    self.prepare.get(name)
  }

  /// Looks up a similarity capability by dotted name.
  pub fn similarity(&self, name: &str) -> Option<&Comparison> {
    self.similarity.get(name)
  }
}

/// Reads a count argument, falling back to `default`.
pub(crate) fn count_arg(args: &[TaskArg], position: usize, default: usize) -> usize {
  args
    .get(position)
    .and_then(TaskArg::as_count)
    .unwrap_or(default)
}
