//! Similarity measures.
//!
//! Every measure is called as `(prototype, variant)`: the query is always the
//! prototype and the stored identifier the variant. Only asymmetric measures
//! such as Tversky are sensitive to the order.

use super::{count_arg, Comparator, Comparison, Measure, Registry};
use crate::types::{Data, Similarity, TaskArg};
use std::sync::Arc;
use strsim::{damerau_levenshtein, jaro_winkler, levenshtein};

/// Registers the built-in measures under the `set`, `bow` and `string` namespaces.
pub fn register(registry: &mut Registry) {
  registry
    .register_similarity(
      "set.jaccard",
      Comparison::Measure(Measure::Binary(Arc::new(|a: &Data, b: &Data| jaccard(a, b)))),
    )
    .register_similarity(
      "set.tversky",
      Comparison::Measure(Measure::Parameterized(Arc::new(
        |a: &Data, b: &Data, alpha: Option<f64>, beta: Option<f64>| tversky(a, b, alpha, beta),
      ))),
    )
    .register_similarity(
      "bow.cosine",
      Comparison::Measure(Measure::Binary(Arc::new(|a: &Data, b: &Data| cosine(a, b)))),
    )
    .register_similarity(
      "string.jaroWinkler",
      Comparison::Measure(Measure::Binary(Arc::new(|a: &Data, b: &Data| {
        let (a, b) = (a.clone().into_text(), b.clone().into_text());
        Similarity::from_similarity(jaro_winkler(&a, &b))
      }))),
    )
    .register_similarity(
      "string.levenshtein",
      Comparison::Measure(Measure::Binary(Arc::new(|a: &Data, b: &Data| {
        let (a, b) = (a.clone().into_text(), b.clone().into_text());
        edit_similarity(levenshtein(&a, &b), &a, &b)
      }))),
    )
    .register_similarity(
      "string.createDLFunction",
      Comparison::Factory(Arc::new(|args: &[TaskArg]| create_dl_function(args))),
    );
}

fn intersection_size(a: &Data, b: &Data) -> (usize, usize, usize) {
  let (sa, sb) = (a.to_set(), b.to_set());
  let (small, large) = if sa.len() < sb.len() { (&sa, &sb) } else { (&sb, &sa) };
  let shared = small.iter().filter(|k| large.contains(*k)).count();
  (shared, sa.len(), sb.len())
}

/// Jaccard index between the key sets of `a` and `b`.
pub fn jaccard(a: &Data, b: &Data) -> Similarity {
  let (shared, na, nb) = intersection_size(a, b);
  let union = na + nb - shared;
  if union == 0 {
    return Similarity::from_similarity(0.0);
  }
  Similarity::from_similarity(shared as f64 / union as f64)
}

/// Tversky index of prototype `a` against variant `b`.
///
/// `alpha` weighs what only the prototype has, `beta` what only the variant
/// has. Both default to `0.5` (Dice); `1.0, 1.0` is Jaccard.
pub fn tversky(a: &Data, b: &Data, alpha: Option<f64>, beta: Option<f64>) -> Similarity {
  let alpha = alpha.unwrap_or(0.5);
  let beta = beta.unwrap_or(0.5);
  let (shared, na, nb) = intersection_size(a, b);
  let shared = shared as f64;
  let denominator = shared + alpha * (na as f64 - shared) + beta * (nb as f64 - shared);
  if denominator <= 0.0 {
    return Similarity::from_similarity(0.0);
  }
  Similarity::from_similarity(shared / denominator)
}

/// Cosine similarity between the bags of `a` and `b`.
pub fn cosine(a: &Data, b: &Data) -> Similarity {
  let (ba, bb) = (a.to_bag(), b.to_bag());
  let dot: f64 = ba
    .iter()
    .filter_map(|(k, va)| bb.get(k).map(|vb| (*va * *vb) as f64))
    .sum();
  let norm = |bag: &std::collections::BTreeMap<&str, usize>| {
    bag.values().map(|v| (*v * *v) as f64).sum::<f64>().sqrt()
  };
  let denominator = norm(&ba) * norm(&bb);
  if denominator == 0.0 {
    return Similarity::from_similarity(0.0);
  }
  Similarity::from_similarity(dot / denominator)
}

fn edit_similarity(distance: usize, a: &str, b: &str) -> Similarity {
  let longest = a.chars().count().max(b.chars().count());
  let similarity = if longest == 0 {
    1.0
  } else {
    1.0 - distance as f64 / longest as f64
  };
  Similarity {
    similarity,
    distance: distance as f64,
  }
}

/// Builds a Damerau-Levenshtein comparator bounded to `args[0]` characters.
///
/// Both strings are truncated to the bound before comparison; without a
/// bound the full strings are compared.
pub fn create_dl_function(args: &[TaskArg]) -> Comparator {
  let max_len = count_arg(args, 0, usize::MAX);
  Arc::new(move |a: &Data, b: &Data| {
    let a: String = a.clone().into_text().chars().take(max_len).collect();
    let b: String = b.clone().into_text().chars().take(max_len).collect();
    edit_similarity(damerau_levenshtein(&a, &b), &a, &b)
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tokens(s: &str) -> Data {
    Data::Tokens(s.split_whitespace().map(str::to_string).collect())
  }

  #[test]
  fn test_jaccard() {
    let s = jaccard(&tokens("set & object"), &tokens("object set"));
    assert!((s.similarity - 2.0 / 3.0).abs() < 1e-12);
    assert_eq!(jaccard(&tokens(""), &tokens("")).similarity, 0.0);
  }

  #[test]
  fn test_tversky_is_asymmetric() {
    let (a, b) = (tokens("a b c d"), tokens("a"));
    let forward = tversky(&a, &b, Some(0.9), Some(0.1)).similarity;
    let backward = tversky(&b, &a, Some(0.9), Some(0.1)).similarity;
    assert!((forward - 1.0 / 3.7).abs() < 1e-12);
    assert!((backward - 1.0 / 1.3).abs() < 1e-12);
    let jaccard_like = tversky(&a, &b, Some(1.0), Some(1.0)).similarity;
    assert!((jaccard_like - 0.25).abs() < 1e-12);
  }

  #[test]
  fn test_cosine() {
    let s = cosine(&tokens("a a b"), &tokens("a b b"));
    assert!((s.similarity - 0.8).abs() < 1e-12);
  }

  #[test]
  fn test_dl_function() {
    let dl = create_dl_function(&[TaskArg::Number(10.0)]);
    let s = dl(&Data::Text("rchna".into()), &Data::Text("rachna".into()));
    assert!((s.similarity - 5.0 / 6.0).abs() < 1e-12);
    assert_eq!(s.distance, 1.0);

    let bounded = create_dl_function(&[TaskArg::Number(3.0)]);
    let s = bounded(&Data::Text("abcxyz".into()), &Data::Text("abcdef".into()));
    assert_eq!(s.similarity, 1.0);
  }
}
