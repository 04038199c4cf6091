//! Indexed and linear search must report the same best score whenever every
//! row with a positive similarity shares an index key with the query.

use proptest::prelude::*;
use textfrc::prelude::*;

const VOCABULARY: &[&str] = &["set", "map", "hash", "object", "theory", "tree", "graph", "Sets"];

fn phrase() -> impl Strategy<Value = String> {
  prop::collection::vec(prop::sample::select(VOCABULARY), 1..4).prop_map(|words| words.join(" "))
}

fn synonyms() -> impl Strategy<Value = Vec<Vec<String>>> {
  prop::collection::vec(prop::collection::vec(phrase(), 1..4), 0..6)
}

fn with_synonyms(mut builder: RulesBuilder, synonyms: &[Vec<String>]) -> RulesBuilder {
  for (i, identifiers) in synonyms.iter().enumerate() {
    builder = builder.synonym(format!("c{}", i), identifiers.clone());
  }
  builder
}

fn word_rules(synonyms: &[Vec<String>], indexed: bool) -> Rules {
  let mut builder = Rules::builder()
    .similarity_prep(TaskDescriptor::new("string.lowerCase"))
    .similarity_prep(TaskDescriptor::new("string.tokenize0"))
    .similarity_prep(TaskDescriptor::new("tokens.sow"))
    .similarity_measure(TaskDescriptor::new("set.jaccard"));
  if indexed {
    builder = builder
      .index_prep(TaskDescriptor::new("string.lowerCase"))
      .index_prep(TaskDescriptor::new("string.tokenize0"))
      .index_using(TaskDescriptor::new("tokens.sow"));
  }
  with_synonyms(builder, synonyms).build()
}

fn ngram_rules(synonyms: &[Vec<String>], indexed: bool) -> Rules {
  let mut builder = Rules::builder()
    .similarity_prep(TaskDescriptor::new("string.lowerCase"))
    .similarity_prep(TaskDescriptor::new("string.ngram").arg(2u32))
    .similarity_measure(TaskDescriptor::new("bow.cosine"));
  if indexed {
    builder = builder
      .index_prep(TaskDescriptor::new("string.lowerCase"))
      .index_using(TaskDescriptor::new("string.ngram").arg(2u32));
  }
  with_synonyms(builder, synonyms).build()
}

proptest! {
  #[test]
  fn test_word_index_matches_linear_scan(synonyms in synonyms(), query in phrase()) {
    let linear = TextFrc::new(word_rules(&synonyms, false)).unwrap();
    let indexed = TextFrc::new(word_rules(&synonyms, true)).unwrap();
    prop_assert!(indexed.is_indexed());

    let expected = linear.predict(&query).unwrap();
    let actual = indexed.predict(&query).unwrap();
    prop_assert_eq!(actual.score, expected.score);
    prop_assert_eq!(actual.label.is_some(), expected.label.is_some());
  }

  #[test]
  fn test_ngram_index_matches_linear_scan(synonyms in synonyms(), query in phrase()) {
    let linear = TextFrc::new(ngram_rules(&synonyms, false)).unwrap();
    let indexed = TextFrc::new(ngram_rules(&synonyms, true)).unwrap();

    let expected = linear.predict(&query).unwrap();
    let actual = indexed.predict(&query).unwrap();
    prop_assert_eq!(actual.score, expected.score);
  }

  #[test]
  fn test_prediction_is_repeatable(synonyms in synonyms(), query in phrase()) {
    let frc = TextFrc::new(word_rules(&synonyms, true)).unwrap();
    prop_assert_eq!(frc.predict(&query), frc.predict(&query));
  }
}
