//! Error types raised while compiling a classifier from its rules.
//!
//! Every variant is fatal to construction. Prediction never fails, so there
//! is no query-time error type.

use thiserror::Error;

/// Errors that can occur while validating rules and building the classifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrcError {
  /// A configuration field does not have the expected shape.
  #[error("{field} should be {expected}, instead found: {found}")]
  ConfigShape {
    field: String,
    expected: &'static str,
    found: String,
  },

  /// A dotted capability name does not resolve in the registry.
  #[error("{kind} function is invalid: {name:?}")]
  UnknownCapability { kind: String, name: String },

  /// A task argument is neither a number nor a boolean.
  #[error("{kind} argument should be a number/boolean, instead found: {found}")]
  ArgumentType { kind: String, found: String },

  /// A capability that takes no literal arguments was given some.
  #[error("{name} in {kind} should not have any arguments; but found: {found}")]
  UnexpectedArguments {
    kind: String,
    name: String,
    found: String,
  },

  /// A construction-time capability was used where it is not allowed.
  #[error("invalid function usage in {kind}: {name:?}")]
  DisallowedCapability { kind: String, name: String },

  /// A pipeline breaks the string-then-tokens ordering.
  #[error("{kind} {reason}: {name:?}")]
  OrderingViolation {
    kind: String,
    name: String,
    reason: &'static str,
  },

  /// A synonym category is missing or empty.
  #[error("invalid category found: {found}")]
  InvalidCategory { found: String },

  /// Two synonyms share the same category.
  #[error("duplicate category found: {category:?}")]
  DuplicateCategory { category: String },

  /// A synonym has no identifiers, or they are not a list.
  #[error("identifiers of {category:?} should be a non-empty array of strings, instead found: {found}")]
  EmptyIdentifiers { category: String, found: String },

  /// An identifier is not a non-empty string.
  #[error("identifier of {category:?} should be a non-empty string, instead found: {found}")]
  InvalidIdentifier { category: String, found: String },

  /// A stop word is not a non-empty string.
  #[error("stop word should be a non-empty string, instead found: {found}")]
  InvalidStopWord { found: String },
}

/// Result type for classifier construction.
pub type FrcResult<T> = Result<T, FrcError>;

/// Renders a value the way it appears in error messages.
pub(crate) fn render(value: &serde_json::Value) -> String {
  serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}
