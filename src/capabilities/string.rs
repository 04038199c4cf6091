//! String-phase capabilities: functions that consume a whole string.

use super::stem::stem;
use super::{count_arg, Capability, IndexMode, Registry, Transform};
use crate::types::{Data, DataKind};
use std::collections::{BTreeMap, BTreeSet};
use unicode_segmentation::UnicodeSegmentation;

const PUNCTUATIONS: &[char] = &[
  '’', '\'', '‘', '`', '“', '”', '"', '[', ']', '(', ')', '{', '}', '…', ',', '.', '!', ';', '?',
  '/', '-', ':',
];

const SPECIAL_CHARS: &[char] = &['*', '+', '%', '#', '@', '^', '=', '~', '|', '\\'];

/// Registers every string-phase capability under the `string` namespace.
pub fn register(registry: &mut Registry) {
  let text = |f: fn(&str) -> String| {
    Capability::Transform(Transform::string(DataKind::Text, move |s, _| Data::Text(f(s))))
  };

  registry
    .register_prepare("string.lowerCase", text(lower_case))
    .register_prepare("string.upperCase", text(upper_case))
    .register_prepare("string.trim", text(trim))
    .register_prepare("string.removeExtraSpaces", text(remove_extra_spaces))
    .register_prepare("string.retainAlphaNums", text(retain_alpha_nums))
    .register_prepare("string.removePunctuations", text(remove_punctuations))
    .register_prepare("string.removeSplChars", text(remove_spl_chars))
    .register_prepare("string.removeElisions", text(remove_elisions))
    .register_prepare("string.amplifyNotElision", text(amplify_not_elision))
    .register_prepare("string.marker", text(marker))
    .register_prepare("string.stem", text(stem));

  registry
    .register_prepare(
      "string.tokenize",
      Capability::Transform(Transform::string(DataKind::Tokens, |s, _| {
        Data::Tokens(tokenize(s))
      })),
    )
    .register_prepare(
      "string.tokenize0",
      Capability::Transform(Transform::string(DataKind::Tokens, |s, _| {
        Data::Tokens(tokenize0(s))
      })),
    )
    .register_prepare(
      "string.soc",
      Capability::Transform(
        Transform::string(DataKind::Set, |s, _| Data::Set(soc(s))).indexed(IndexMode::FirstChar),
      ),
    )
    .register_prepare(
      "string.ngram",
      Capability::Transform(
        Transform::string(DataKind::Bag, |s, args| Data::Bag(ngram(s, count_arg(args, 0, 2))))
          .indexed(IndexMode::Keys),
      ),
    );
}

pub fn lower_case(s: &str) -> String {
  s.to_lowercase()
}

pub fn upper_case(s: &str) -> String {
  s.to_uppercase()
}

pub fn trim(s: &str) -> String {
  s.trim().to_string()
}

/// Trims the string and collapses every run of whitespace into one space.
pub fn remove_extra_spaces(s: &str) -> String {
  s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lower-cases the string and keeps only ASCII letters, digits and single spaces.
pub fn retain_alpha_nums(s: &str) -> String {
  let kept: String = s
    .to_lowercase()
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
    .collect();
  remove_extra_spaces(&kept)
}

pub fn remove_punctuations(s: &str) -> String {
  s.chars().filter(|c| !PUNCTUATIONS.contains(c)).collect()
}

pub fn remove_spl_chars(s: &str) -> String {
  s.chars().filter(|c| !SPECIAL_CHARS.contains(c)).collect()
}

/// Removes the English elisions `'s 'd 'm 'll 've 're n't`.
pub fn remove_elisions(s: &str) -> String {
  rewrite_elisions(s, false)
}

/// Replaces `n't` with ` not`; must run before [`remove_elisions`].
pub fn amplify_not_elision(s: &str) -> String {
  rewrite_elisions(s, true)
}

fn is_word_char(c: char) -> bool {
  c.is_alphanumeric() || c == '_'
}

/// Length of the elision starting at `i` and whether it is the `n't` form.
fn elision_at(chars: &[char], i: usize) -> Option<(usize, bool)> {
  let rest = &chars[i..];
  let at_boundary = |len: usize| chars.get(i + len).map_or(true, |c| !is_word_char(*c));

  if rest.starts_with(&['n', '\'', 't']) && at_boundary(3) {
    return Some((3, true));
  }
  if rest.first() == Some(&'\'') {
    for suffix in ["s", "d", "m", "ll", "ve", "re"] {
      let suffix: Vec<char> = suffix.chars().collect();
      if rest[1..].starts_with(&suffix) && at_boundary(suffix.len() + 1) {
        return Some((suffix.len() + 1, false));
      }
    }
  }
  None
}

fn rewrite_elisions(s: &str, amplify_not: bool) -> String {
  let chars: Vec<char> = s.chars().collect();
  let mut out = String::with_capacity(s.len());
  let mut i = 0;

  while i < chars.len() {
    match elision_at(&chars, i) {
      Some((len, true)) if amplify_not => {
        out.push_str(" not");
        i += len;
      }
      Some((len, _)) if !amplify_not => i += len,
      _ => {
        out.push(chars[i]);
        i += 1;
      }
    }
  }

  out
}

/// The unique characters of the string, sorted and joined back together.
pub fn marker(s: &str) -> String {
  s.chars().collect::<BTreeSet<_>>().into_iter().collect()
}

/// The set of characters of the string.
pub fn soc(s: &str) -> BTreeSet<String> {
  s.chars().map(String::from).collect()
}

/// Bag of character n-grams of size `n`.
pub fn ngram(s: &str, n: usize) -> BTreeMap<String, usize> {
  let chars: Vec<char> = s.chars().collect();
  let mut bag = BTreeMap::new();
  if n == 0 {
    return bag;
  }
  for window in chars.windows(n) {
    *bag.entry(window.iter().collect::<String>()).or_insert(0) += 1;
  }
  bag
}

/// Splits on word boundaries, keeping punctuation and symbols as tokens.
pub fn tokenize(s: &str) -> Vec<String> {
  s.split_word_bounds()
    .filter(|segment| !segment.trim().is_empty())
    .map(str::to_string)
    .collect()
}

/// Splits into words only; every non-word character acts as a separator.
pub fn tokenize0(s: &str) -> Vec<String> {
  s.unicode_words().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tokenize_keeps_symbols() {
    assert_eq!(tokenize("set & object"), vec!["set", "&", "object"]);
    assert_eq!(tokenize("Hello, World!"), vec!["Hello", ",", "World", "!"]);
  }

  #[test]
  fn test_tokenize0() {
    let tokens = tokenize0("Hello, World! This is a test.");
    assert_eq!(tokens, vec!["Hello", "World", "This", "is", "a", "test"]);
  }

  #[test]
  fn test_spaces_and_alpha_nums() {
    assert_eq!(remove_extra_spaces("  a \t b\n\nc "), "a b c");
    assert_eq!(retain_alpha_nums(" Hash-Map (v2) "), "hash map v2");
  }

  #[test]
  fn test_elisions() {
    assert_eq!(amplify_not_elision("I can't go"), "I ca not go");
    assert_eq!(remove_elisions("it's John's and I'll don't"), "it John and I do");
    assert_eq!(remove_elisions("the 'sound'"), "the 'sound'");
  }

  #[test]
  fn test_marker_and_ngram() {
    assert_eq!(marker("banana"), "abn");
    let bag = ngram("banana", 2);
    assert_eq!(bag.get("an"), Some(&2));
    assert_eq!(bag.get("ba"), Some(&1));
    assert!(ngram("a", 2).is_empty());
  }
}
