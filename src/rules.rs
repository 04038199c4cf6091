//! Rules DSL for configuring a classifier.
//!
//! Rules can be written in JSON, with camelCase keys and tasks as arrays
//! (`["string.ngram", 3]`), or assembled in Rust with [`Rules::builder`].

use crate::error::{render, FrcError, FrcResult};
use crate::types::{Synonym, TaskDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declarative configuration of a classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rules {
    /// Tasks applied to every identifier and to every query before comparison.
    pub similarity_prep_tasks: Vec<TaskDescriptor>,
    /// The similarity measure. Required.
    pub similarity_measure: Option<TaskDescriptor>,
    /// Words removed by `tokens.removeWords`.
    pub stop_words: Option<Vec<String>>,
    /// Tasks applied to each stop word; must leave a string.
    pub stop_words_prep_tasks: Vec<TaskDescriptor>,
    /// Tasks applied before keying identifiers and queries for the index.
    pub index_prep_tasks: Vec<TaskDescriptor>,
    /// The index builder; without it every query is compared with every row.
    pub index_using: Option<TaskDescriptor>,
    /// Categories and the identifiers that describe them.
    pub synonyms: Vec<Synonym>,
}

impl Rules {
    /// Create a new rules builder.
    pub fn builder() -> RulesBuilder {
        RulesBuilder::default()
    }

    /// Parses rules from a JSON string. See [`Rules::from_value`].
    pub fn from_json(json: &str) -> FrcResult<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| FrcError::ConfigShape {
            field: "rules".to_string(),
            expected: "valid JSON",
            found: e.to_string(),
        })?;
        Self::from_value(&value)
    }

    /// Parses rules from a JSON value, checking the shape of every field.
    ///
    /// Missing or `null` task lists are empty, and a missing or `null`
    /// `stopWords` or `indexUsing` means none. `synonyms` must be present.
    /// Errors name the field and the offending value.
    pub fn from_value(value: &Value) -> FrcResult<Self> {
        let rules = value.as_object().ok_or_else(|| FrcError::ConfigShape {
            field: "rules".to_string(),
            expected: "an object",
            found: render(value),
        })?;

        Ok(Self {
            stop_words_prep_tasks: tasks(rules, "stopWordsPrepTasks")?,
            stop_words: stop_words(rules)?,
            index_prep_tasks: tasks(rules, "indexPrepTasks")?,
            similarity_prep_tasks: tasks(rules, "similarityPrepTasks")?,
            index_using: optional_task(rules, "indexUsing")?,
            synonyms: synonyms(rules)?,
            similarity_measure: optional_task(rules, "similarityMeasure")?,
        })
    }
}

/// `null`, `false`, `0` and `""`: values treated as absent.
pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn present<'a>(rules: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    rules.get(field).filter(|v| !is_falsy(v))
}

fn tasks(rules: &Map<String, Value>, field: &str) -> FrcResult<Vec<TaskDescriptor>> {
    let Some(value) = present(rules, field) else {
        return Ok(Vec::new());
    };
    let items = value.as_array().ok_or_else(|| FrcError::ConfigShape {
        field: field.to_string(),
        expected: "an array of array",
        found: render(value),
    })?;
    let kind = format!("A task inside {}", field);
    items
        .iter()
        .map(|item| TaskDescriptor::from_value(&kind, item))
        .collect()
}

fn optional_task(rules: &Map<String, Value>, field: &str) -> FrcResult<Option<TaskDescriptor>> {
    present(rules, field)
        .map(|value| TaskDescriptor::from_value(field, value))
        .transpose()
}

fn stop_words(rules: &Map<String, Value>) -> FrcResult<Option<Vec<String>>> {
    let Some(value) = present(rules, "stopWords") else {
        return Ok(None);
    };
    let items = value.as_array().ok_or_else(|| FrcError::ConfigShape {
        field: "stopWords".to_string(),
        expected: "an array",
        found: render(value),
    })?;
    items
        .iter()
        .map(|item| match item {
            Value::String(word) if !word.is_empty() => Ok(word.clone()),
            other => Err(FrcError::InvalidStopWord { found: render(other) }),
        })
        .collect::<FrcResult<Vec<_>>>()
        .map(Some)
}

fn synonyms(rules: &Map<String, Value>) -> FrcResult<Vec<Synonym>> {
    let value = rules.get("synonyms");
    let items = value.and_then(Value::as_array).ok_or_else(|| FrcError::ConfigShape {
        field: "synonyms".to_string(),
        expected: "an array",
        found: value.map(render).unwrap_or_else(|| "undefined".to_string()),
    })?;
    items.iter().map(synonym).collect()
}

fn synonym(value: &Value) -> FrcResult<Synonym> {
    let object = value.as_object().ok_or_else(|| FrcError::ConfigShape {
        field: "synonym".to_string(),
        expected: "an object",
        found: render(value),
    })?;

    let category = match object.get("category") {
        Some(Value::String(category)) if !category.is_empty() => category.clone(),
        other => {
            return Err(FrcError::InvalidCategory {
                found: other.map(render).unwrap_or_else(|| "undefined".to_string()),
            })
        }
    };

    let identifiers = object.get("identifiers");
    let items = identifiers
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| FrcError::EmptyIdentifiers {
            category: category.clone(),
            found: identifiers.map(render).unwrap_or_else(|| "undefined".to_string()),
        })?;

    let identifiers = items
        .iter()
        .map(|item| match item {
            Value::String(id) if !id.is_empty() => Ok(id.clone()),
            other => Err(FrcError::InvalidIdentifier {
                category: category.clone(),
                found: render(other),
            }),
        })
        .collect::<FrcResult<Vec<_>>>()?;

    Ok(Synonym { category, identifiers })
}

/// Builder for [`Rules`].
#[derive(Debug, Default)]
pub struct RulesBuilder {
    rules: Rules,
}

impl RulesBuilder {
    /// Append a similarity prep task.
    pub fn similarity_prep(mut self, task: TaskDescriptor) -> Self {
        self.rules.similarity_prep_tasks.push(task);
        self
    }

    /// Set the similarity measure.
    pub fn similarity_measure(mut self, task: TaskDescriptor) -> Self {
        self.rules.similarity_measure = Some(task);
        self
    }

    /// Set the stop words.
    pub fn stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.stop_words = Some(words.into_iter().map(Into::into).collect());
        self
    }

    /// Append a stop-word prep task.
    pub fn stop_words_prep(mut self, task: TaskDescriptor) -> Self {
        self.rules.stop_words_prep_tasks.push(task);
        self
    }

    /// Append an index prep task.
    pub fn index_prep(mut self, task: TaskDescriptor) -> Self {
        self.rules.index_prep_tasks.push(task);
        self
    }

    /// Set the index builder.
    pub fn index_using(mut self, task: TaskDescriptor) -> Self {
        self.rules.index_using = Some(task);
        self
    }

    /// Add a category with its identifiers.
    pub fn synonym<I, S>(mut self, category: impl Into<String>, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.synonyms.push(Synonym::new(category, identifiers));
        self
    }

    /// Build the rules.
    pub fn build(self) -> Rules {
        self.rules
    }
}
