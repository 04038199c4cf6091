//! Token-phase capabilities: functions that consume a token collection.

use super::stem::stem;
use super::{Capability, IndexMode, Registry, Transform};
use crate::stop_words::StopWordSet;
use crate::types::{Data, DataKind};
use rphonetic::DoubleMetaphone;
use std::collections::{BTreeMap, BTreeSet};

/// Registers every token-phase capability under the `tokens` namespace.
pub fn register(registry: &mut Registry) {
  registry
    .register_prepare("tokens.removeWords", Capability::RemoveWords)
    .register_prepare(
      "tokens.phonetize",
      Capability::Transform(Transform::tokens(DataKind::Tokens, |tokens, _| {
        Data::Tokens(phonetize(tokens))
      })),
    )
    .register_prepare(
      "tokens.stem",
      Capability::Transform(Transform::tokens(DataKind::Tokens, |tokens, _| {
        Data::Tokens(tokens.iter().map(|t| stem(t)).collect())
      })),
    )
    .register_prepare(
      "tokens.bigrams",
      Capability::Transform(Transform::tokens(DataKind::Tokens, |tokens, _| {
        Data::Tokens(bigrams(&tokens))
      })),
    )
    .register_prepare(
      "tokens.sow",
      Capability::Transform(
        Transform::tokens(DataKind::Set, |tokens, _| Data::Set(sow(tokens))).indexed(IndexMode::Keys),
      ),
    )
    .register_prepare(
      "tokens.bow",
      Capability::Transform(
        Transform::tokens(DataKind::Bag, |tokens, _| Data::Bag(bow(tokens))).indexed(IndexMode::Keys),
      ),
    );
}

/// Drops every token the stop-word set excludes.
pub fn remove_words(mut tokens: Vec<String>, stop_words: &StopWordSet) -> Vec<String> {
  tokens.retain(|token| !stop_words.exclude(token));
  tokens
}

/// Replaces each ASCII token by its primary Double Metaphone code.
///
/// Tokens that are not ASCII, or that encode to nothing, are kept as-is.
pub fn phonetize(tokens: Vec<String>) -> Vec<String> {
  let encoder = DoubleMetaphone::default();
  tokens
    .into_iter()
    .map(|token| {
      if !token.is_ascii() {
        return token;
      }
      let code = encoder.double_metaphone(&token).primary().to_string();
      if code.is_empty() {
        token
      } else {
        code
      }
    })
    .collect()
}

/// Adjacent token pairs, each joined by a space.
pub fn bigrams(tokens: &[String]) -> Vec<String> {
  tokens
    .windows(2)
    .map(|pair| format!("{} {}", pair[0], pair[1]))
    .collect()
}

/// Set of words.
pub fn sow(tokens: Vec<String>) -> BTreeSet<String> {
  tokens.into_iter().collect()
}

/// Bag of words.
pub fn bow(tokens: Vec<String>) -> BTreeMap<String, usize> {
  let mut bag = BTreeMap::new();
  for token in tokens {
    *bag.entry(token).or_insert(0) += 1;
  }
  bag
}
