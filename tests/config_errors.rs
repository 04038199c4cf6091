use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use textfrc::prelude::*;

fn error(rules: Value) -> String {
  TextFrc::from_value(&rules).unwrap_err().to_string()
}

#[test]
fn test_rules_shape() {
  assert_eq!(error(json!(1)), "rules should be an object, instead found: 1");
  assert_eq!(error(json!({})), "synonyms should be an array, instead found: undefined");
  assert_eq!(
    error(json!({ "synonyms": [] })),
    "similarityMeasure should be an array, instead found: undefined"
  );
  assert_eq!(
    error(json!({ "synonyms": [], "similarityMeasure": [] })),
    "similarityMeasure function name should be a non-empty string, instead found: undefined"
  );
  assert_eq!(
    error(json!({ "synonyms": [], "similarityMeasure": ["junk"] })),
    "similarityMeasure function is invalid: \"junk\""
  );
}

#[test]
fn test_task_list_shape() {
  let base = |tasks: Value| json!({ "synonyms": [], "similarityMeasure": ["set.tversky"], "similarityPrepTasks": tasks });
  assert_eq!(
    error(base(json!(1))),
    "similarityPrepTasks should be an array of array, instead found: 1"
  );
  assert_eq!(
    error(base(json!([1]))),
    "A task inside similarityPrepTasks should be an array, instead found: 1"
  );
  assert_eq!(
    error(base(json!([[]]))),
    "A task inside similarityPrepTasks function name should be a non-empty string, instead found: undefined"
  );
  assert_eq!(
    error(base(json!([["junk"]]))),
    "A task inside similarityPrepTasks function is invalid: \"junk\""
  );
  assert_eq!(
    error(base(json!([["string.tokenize"], ["tokens.stem"], ["string.trim"]]))),
    "similarityPrepTasks expected a tokens function, instead found: \"string.trim\""
  );
}

#[test]
fn test_stop_words() {
  let base = |extra: Value| {
    let mut rules = json!({
      "synonyms": [],
      "similarityMeasure": ["set.tversky"],
      "similarityPrepTasks": [["string.trim"]]
    });
    if let (Some(rules), Some(extra)) = (rules.as_object_mut(), extra.as_object()) {
      rules.extend(extra.clone());
    }
    rules
  };

  assert_eq!(
    error(base(json!({ "stopWords": 1 }))),
    "stopWords should be an array, instead found: 1"
  );
  assert_eq!(
    error(base(json!({ "stopWords": [1] }))),
    "stop word should be a non-empty string, instead found: 1"
  );
  assert_eq!(
    error(base(json!({ "stopWords": [""] }))),
    "stop word should be a non-empty string, instead found: \"\""
  );
  assert_eq!(
    error(base(json!({ "stopWords": ["will"], "stopWordsPrepTasks": [["string.tokenize"]] }))),
    "stopWordsPrepTasks should return a string and not tokens: \"string.tokenize\""
  );
  assert_eq!(
    error(base(json!({ "stopWords": ["will"], "stopWordsPrepTasks": [["string.tokenize", {}]] }))),
    "A task inside stopWordsPrepTasks argument should be a number/boolean, instead found: {}"
  );
  assert_eq!(
    error(base(json!({ "stopWords": ["will"], "stopWordsPrepTasks": [["helper.index"]] }))),
    "invalid function usage in stopWordsPrepTasks: \"helper.index\""
  );
  assert_eq!(
    error(base(json!({
      "stopWords": ["will"],
      "stopWordsPrepTasks": [["string.tokenize"], ["tokens.removeWords", 2]]
    }))),
    "tokens.removeWords in A task inside stopWordsPrepTasks should not have any arguments; but found: 2"
  );
}

#[test]
fn test_synonyms() {
  let base = |synonyms: Value| json!({ "synonyms": synonyms, "similarityMeasure": ["set.tversky"] });
  assert_eq!(error(base(json!([1]))), "synonym should be an object, instead found: 1");
  assert_eq!(
    error(base(json!([{ "category": 10 }]))),
    "invalid category found: 10"
  );
  assert_eq!(
    error(base(json!([{ "category": "cat1" }]))),
    "identifiers of \"cat1\" should be a non-empty array of strings, instead found: undefined"
  );
  assert_eq!(
    error(base(json!([{ "category": "cat1", "identifiers": [] }]))),
    "identifiers of \"cat1\" should be a non-empty array of strings, instead found: []"
  );
  assert_eq!(
    error(base(json!([
      { "category": "cat1", "identifiers": ["id1 "] },
      { "category": "cat1", "identifiers": ["id2 "] }
    ]))),
    "duplicate category found: \"cat1\""
  );
  assert_eq!(
    error(base(json!([{ "category": "cat1", "identifiers": [1] }]))),
    "identifier of \"cat1\" should be a non-empty string, instead found: 1"
  );
}

#[test]
fn test_index_builder() {
  let base = |index_using: Value, index_prep: Value| {
    json!({
      "synonyms": [],
      "similarityMeasure": ["set.jaccard"],
      "indexPrepTasks": index_prep,
      "indexUsing": index_using
    })
  };

  assert_eq!(
    error(base(json!(["string.lowerCase"]), json!([]))),
    "invalid function usage in indexUsing: \"string.lowerCase\""
  );
  assert_eq!(
    error(base(json!(["tokens.bow"]), json!([["string.lowerCase"]]))),
    "indexUsing expected a tokenizer before: \"tokens.bow\""
  );
  assert!(TextFrc::from_value(&base(json!(["tokens.bow"]), json!([["string.tokenize0"]]))).is_ok());
}

#[test]
fn test_errors_are_typed() {
  let rules = Rules::builder()
    .similarity_prep(TaskDescriptor::new("helper.words"))
    .similarity_measure(TaskDescriptor::new("set.jaccard"))
    .build();
  assert_eq!(
    TextFrc::new(rules).unwrap_err(),
    FrcError::DisallowedCapability {
      kind: "similarityPrepTasks".to_string(),
      name: "helper.words".to_string(),
    }
  );

  let rules = Rules::builder()
    .similarity_measure(TaskDescriptor::new("set.jaccard"))
    .synonym("a", ["x"])
    .synonym("a", ["y"])
    .build();
  assert_eq!(
    TextFrc::new(rules).unwrap_err(),
    FrcError::DuplicateCategory { category: "a".to_string() }
  );
}
