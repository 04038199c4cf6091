//! Core data types shared by the task compiler, the synonym database and the
//! predictor.

use crate::error::{render, FrcError, FrcResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// A literal argument of a task descriptor.
///
/// The rules DSL only allows numbers and booleans as arguments; anything
/// richer (such as the stop-word set) is supplied out-of-band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskArg {
  /// A boolean flag.
  Bool(bool),
  /// A numeric parameter, e.g. an n-gram size or a Tversky weight.
  Number(f64),
}

impl TaskArg {
  /// Returns the numeric value, if this argument is a number.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      TaskArg::Number(n) => Some(*n),
      TaskArg::Bool(_) => None,
    }
  }

  /// Returns the value as a positive count, if this argument is a number >= 1.
  pub fn as_count(&self) -> Option<usize> {
    self
      .as_f64()
      .filter(|n| n.is_finite() && *n >= 1.0)
      .map(|n| n as usize)
  }

  fn to_value(self) -> Value {
    match self {
      TaskArg::Bool(b) => Value::Bool(b),
      TaskArg::Number(n) => serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null),
    }
  }
}

impl From<f64> for TaskArg {
  fn from(n: f64) -> Self {
    TaskArg::Number(n)
  }
}

impl From<u32> for TaskArg {
  fn from(n: u32) -> Self {
    TaskArg::Number(n as f64)
  }
}

impl From<bool> for TaskArg {
  fn from(b: bool) -> Self {
    TaskArg::Bool(b)
  }
}

impl fmt::Display for TaskArg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TaskArg::Bool(b) => write!(f, "{}", b),
      TaskArg::Number(n) => write!(f, "{}", n),
    }
  }
}

/// A declarative, unvalidated pipeline step: `["namespace.function", args...]`.
///
/// In JSON a descriptor is written as an array whose first element is the
/// capability name, e.g. `["string.ngram", 3]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDescriptor {
  /// The dotted capability name, e.g. `"string.lowerCase"`.
  pub capability: String,
  /// Literal arguments bound to the capability.
  pub args: Vec<TaskArg>,
}

impl TaskDescriptor {
  /// Creates a descriptor without arguments.
  pub fn new(capability: impl Into<String>) -> Self {
    Self {
      capability: capability.into(),
      args: Vec::new(),
    }
  }

  /// Appends a literal argument.
  pub fn arg(mut self, arg: impl Into<TaskArg>) -> Self {
    self.args.push(arg.into());
    self
  }

  /// Parses a descriptor from its JSON array form.
  ///
  /// `kind` names the location of the descriptor in the rules and is carried
  /// into error messages, e.g. `"A task inside similarityPrepTasks"`.
  pub fn from_value(kind: &str, value: &Value) -> FrcResult<Self> {
    let items = value.as_array().ok_or_else(|| FrcError::ConfigShape {
      field: kind.to_string(),
      expected: "an array",
      found: render(value),
    })?;

    let capability = match items.first() {
      Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
      other => {
        return Err(FrcError::ConfigShape {
          field: format!("{} function name", kind),
          expected: "a non-empty string",
          found: other.map(render).unwrap_or_else(|| "undefined".to_string()),
        })
      }
    };

    let args = items[1..]
      .iter()
      .map(|arg| match arg {
        Value::Bool(b) => Ok(TaskArg::Bool(*b)),
        Value::Number(n) => n.as_f64().map(TaskArg::Number).ok_or_else(|| FrcError::ArgumentType {
          kind: kind.to_string(),
          found: render(arg),
        }),
        _ => Err(FrcError::ArgumentType {
          kind: kind.to_string(),
          found: render(arg),
        }),
      })
      .collect::<FrcResult<Vec<_>>>()?;

    Ok(Self { capability, args })
  }

  /// Renders the descriptor back into its JSON array form.
  pub fn to_value(&self) -> Value {
    let mut items = Vec::with_capacity(self.args.len() + 1);
    items.push(Value::String(self.capability.clone()));
    items.extend(self.args.iter().map(|a| a.to_value()));
    Value::Array(items)
  }
}

impl Serialize for TaskDescriptor {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.to_value().serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for TaskDescriptor {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value = Value::deserialize(deserializer)?;
    TaskDescriptor::from_value("task", &value).map_err(serde::de::Error::custom)
  }
}

/// The shape of a value flowing through a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
  /// A whole string.
  Text,
  /// An ordered token collection.
  Tokens,
  /// A bag of keys with their counts.
  Bag,
  /// A set of unique keys.
  Set,
}

/// A value flowing through a pipeline.
///
/// Bags and sets are ordered maps so that key iteration, and therefore index
/// traversal, is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Data {
  Text(String),
  Tokens(Vec<String>),
  Bag(BTreeMap<String, usize>),
  Set(BTreeSet<String>),
}

impl Data {
  /// Returns the shape of this value.
  pub fn kind(&self) -> DataKind {
    match self {
      Data::Text(_) => DataKind::Text,
      Data::Tokens(_) => DataKind::Tokens,
      Data::Bag(_) => DataKind::Bag,
      Data::Set(_) => DataKind::Set,
    }
  }

  /// Converts the value into a single string; collections are space-joined.
  pub fn into_text(self) -> String {
    match self {
      Data::Text(s) => s,
      Data::Tokens(tokens) => tokens.join(" "),
      Data::Bag(bag) => bag.into_keys().collect::<Vec<_>>().join(" "),
      Data::Set(set) => set.into_iter().collect::<Vec<_>>().join(" "),
    }
  }

  /// Converts the value into tokens. A non-empty string becomes one token.
  pub fn into_tokens(self) -> Vec<String> {
    match self {
      Data::Text(s) if s.is_empty() => Vec::new(),
      Data::Text(s) => vec![s],
      Data::Tokens(tokens) => tokens,
      Data::Bag(bag) => bag.into_keys().collect(),
      Data::Set(set) => set.into_iter().collect(),
    }
  }

  /// Borrows the value as a set of keys.
  pub fn to_set(&self) -> BTreeSet<&str> {
    match self {
      Data::Text(s) if s.is_empty() => BTreeSet::new(),
      Data::Text(s) => BTreeSet::from([s.as_str()]),
      Data::Tokens(tokens) => tokens.iter().map(String::as_str).collect(),
      Data::Bag(bag) => bag.keys().map(String::as_str).collect(),
      Data::Set(set) => set.iter().map(String::as_str).collect(),
    }
  }

  /// Borrows the value as a bag of keys with counts.
  pub fn to_bag(&self) -> BTreeMap<&str, usize> {
    let mut bag = BTreeMap::new();
    match self {
      Data::Text(s) if s.is_empty() => {}
      Data::Text(s) => {
        bag.insert(s.as_str(), 1);
      }
      Data::Tokens(tokens) => {
        for token in tokens {
          *bag.entry(token.as_str()).or_insert(0) += 1;
        }
      }
      Data::Bag(b) => bag.extend(b.iter().map(|(k, v)| (k.as_str(), *v))),
      Data::Set(set) => bag.extend(set.iter().map(|k| (k.as_str(), 1))),
    }
    bag
  }

  /// Returns the unique keys of this value in traversal order.
  ///
  /// Tokens keep their first-appearance order; bags and sets are sorted.
  pub fn keys(&self) -> Vec<String> {
    match self {
      Data::Tokens(tokens) => {
        let mut seen = HashSet::new();
        tokens
          .iter()
          .filter(|t| seen.insert(t.as_str()))
          .cloned()
          .collect()
      }
      other => other.to_set().into_iter().map(str::to_string).collect(),
    }
  }
}

/// The result of comparing a prototype with a variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Similarity {
  /// Similarity in `[0, 1]`, higher is better.
  pub similarity: f64,
  /// The measure's own notion of distance.
  pub distance: f64,
}

impl Similarity {
  /// Builds a similarity whose distance is `1 - similarity`.
  pub fn from_similarity(similarity: f64) -> Self {
    Self {
      similarity,
      distance: 1.0 - similarity,
    }
  }
}

/// A category together with the identifiers that describe it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synonym {
  /// Unique, non-empty category label returned by predictions.
  pub category: String,
  /// Non-empty list of non-empty identifier strings.
  pub identifiers: Vec<String>,
}

impl Synonym {
  /// Creates a synonym from a category and its identifiers.
  pub fn new<I, S>(category: impl Into<String>, identifiers: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      category: category.into(),
      identifiers: identifiers.into_iter().map(Into::into).collect(),
    }
  }
}

/// The best match found for a query.
///
/// `label` is `None` when no candidate scored above zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
  pub label: Option<String>,
  pub score: f64,
}

impl Prediction {
  /// A prediction with no label and a zero score.
  pub fn unmatched() -> Self {
    Self {
      label: None,
      score: 0.0,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_descriptor_from_value() {
    let d = TaskDescriptor::from_value("indexUsing", &json!([" string.ngram ", 3, true])).unwrap();
    assert_eq!(d.capability, "string.ngram");
    assert_eq!(d.args, vec![TaskArg::Number(3.0), TaskArg::Bool(true)]);
    assert_eq!(d.to_value(), json!(["string.ngram", 3.0, true]));
  }

  #[test]
  fn test_descriptor_rejects_bad_shapes() {
    let err = TaskDescriptor::from_value("similarityMeasure", &json!([])).unwrap_err();
    assert!(matches!(err, FrcError::ConfigShape { .. }));
    assert!(err.to_string().ends_with("instead found: undefined"));

    let err = TaskDescriptor::from_value("x", &json!(1)).unwrap_err();
    assert!(matches!(err, FrcError::ConfigShape { .. }));

    let err = TaskDescriptor::from_value("x", &json!(["string.trim", {}])).unwrap_err();
    assert_eq!(
      err,
      FrcError::ArgumentType {
        kind: "x".to_string(),
        found: "{}".to_string()
      }
    );
  }

  #[test]
  fn test_token_keys_keep_first_appearance_order() {
    let data = Data::Tokens(vec!["b".into(), "a".into(), "b".into()]);
    assert_eq!(data.keys(), vec!["b", "a"]);
    assert_eq!(data.to_bag().get("b"), Some(&2));
  }
}
