//! English Porter2 stemmer.
//!
//! Follows the Snowball English algorithm. Words are lower-cased first;
//! words with fewer than three letters, and words containing non-ASCII
//! characters, are returned lower-cased but otherwise unchanged.

const DOUBLES: &[&[u8]] = &[b"bb", b"dd", b"ff", b"gg", b"mm", b"nn", b"pp", b"rr", b"tt"];
const LI_ENDINGS: &[u8] = b"cdeghkmnrt";
const REGION_PREFIXES: &[&[u8]] = &[b"gener", b"commun", b"arsen"];

const EXCEPTIONS: &[(&str, &str)] = &[
  ("skis", "ski"),
  ("skies", "sky"),
  ("dying", "die"),
  ("lying", "lie"),
  ("tying", "tie"),
  ("idly", "idl"),
  ("gently", "gentl"),
  ("ugly", "ugli"),
  ("early", "earli"),
  ("only", "onli"),
  ("singly", "singl"),
  ("sky", "sky"),
  ("news", "news"),
  ("howe", "howe"),
  ("atlas", "atlas"),
  ("cosmos", "cosmos"),
  ("bias", "bias"),
  ("andes", "andes"),
];

/// Left unchanged once step 1a has run.
const INVARIANTS_AFTER_1A: &[&str] = &[
  "inning", "outing", "canning", "herring", "earring", "proceed", "exceed", "succeed",
];

// Longest suffixes first, so the first hit is the longest match.
const STEP2: &[(&str, &str)] = &[
  ("ization", "ize"),
  ("ational", "ate"),
  ("fulness", "ful"),
  ("ousness", "ous"),
  ("iveness", "ive"),
  ("tional", "tion"),
  ("biliti", "ble"),
  ("lessli", "less"),
  ("entli", "ent"),
  ("ation", "ate"),
  ("alism", "al"),
  ("aliti", "al"),
  ("ousli", "ous"),
  ("iviti", "ive"),
  ("fulli", "ful"),
  ("enci", "ence"),
  ("anci", "ance"),
  ("abli", "able"),
  ("izer", "ize"),
  ("ator", "ate"),
  ("alli", "al"),
  ("bli", "ble"),
  ("ogi", "og"),
  ("li", ""),
];

const STEP3: &[(&str, &str)] = &[
  ("ational", "ate"),
  ("tional", "tion"),
  ("alize", "al"),
  ("icate", "ic"),
  ("iciti", "ic"),
  ("ative", ""),
  ("ical", "ic"),
  ("ness", ""),
  ("ful", ""),
];

const STEP4: &[&str] = &[
  "ement", "ance", "ence", "able", "ible", "ment", "ant", "ent", "ism", "ate", "iti", "ous", "ive", "ize",
  "ion", "al", "er", "ic",
];

/// Stems a single word.
pub fn stem(word: &str) -> String {
  let lower = word.to_lowercase().replace('\u{2019}', "'");
  if lower.len() < 3 || !lower.is_ascii() {
    return lower;
  }
  if let Some((_, stemmed)) = EXCEPTIONS.iter().find(|(w, _)| *w == lower) {
    return stemmed.to_string();
  }

  let mut w = Word::new(lower.into_bytes());
  w.step0();
  w.step1a();
  if !INVARIANTS_AFTER_1A.iter().any(|inv| inv.as_bytes() == w.chars.as_slice()) {
    w.step1b();
    w.step1c();
    w.step2();
    w.step3();
    w.step4();
    w.step5();
  }
  w.finish()
}

fn is_vowel(c: u8) -> bool {
  matches!(c, b'a' | b'e' | b'i' | b'o' | b'u' | b'y')
}

/// A word being stemmed. `Y` marks a consonant `y`.
struct Word {
  chars: Vec<u8>,
  r1: usize,
  r2: usize,
}

impl Word {
  fn new(mut chars: Vec<u8>) -> Self {
    if chars.first() == Some(&b'\'') {
      chars.remove(0);
    }
    for i in 0..chars.len() {
      if chars[i] == b'y' && (i == 0 || is_vowel(chars[i - 1])) {
        chars[i] = b'Y';
      }
    }

    let r1 = REGION_PREFIXES
      .iter()
      .find(|prefix| chars.starts_with(prefix))
      .map(|prefix| prefix.len())
      .unwrap_or_else(|| region_start(&chars, 0));
    let r2 = region_start(&chars, r1);
    Self { chars, r1, r2 }
  }

  fn len(&self) -> usize {
    self.chars.len()
  }

  fn ends_with(&self, suffix: &str) -> bool {
    self.chars.ends_with(suffix.as_bytes())
  }

  fn truncate(&mut self, by: usize) {
    let len = self.len().saturating_sub(by);
    self.chars.truncate(len);
  }

  fn replace_suffix(&mut self, suffix: &str, with: &str) {
    self.truncate(suffix.len());
    self.chars.extend_from_slice(with.as_bytes());
  }

  fn in_r1(&self, suffix: &str) -> bool {
    self.len() - suffix.len() >= self.r1
  }

  fn in_r2(&self, suffix: &str) -> bool {
    self.len() - suffix.len() >= self.r2
  }

  fn has_vowel(&self, end: usize) -> bool {
    self.chars[..end].iter().any(|&c| is_vowel(c))
  }

  fn ends_in_short_syllable(&self) -> bool {
    ends_in_short_syllable(&self.chars)
  }

  fn is_short(&self) -> bool {
    self.r1 >= self.len() && self.ends_in_short_syllable()
  }

  fn step0(&mut self) {
    for suffix in ["'s'", "'s", "'"] {
      if self.ends_with(suffix) {
        self.truncate(suffix.len());
        return;
      }
    }
  }

  fn step1a(&mut self) {
    if self.ends_with("sses") {
      self.replace_suffix("sses", "ss");
    } else if self.ends_with("ied") || self.ends_with("ies") {
      let with = if self.len() > 4 { "i" } else { "ie" };
      self.replace_suffix("ies", with);
    } else if self.ends_with("s")
      && !self.ends_with("us")
      && !self.ends_with("ss")
      && self.len() >= 2
      && self.has_vowel(self.len() - 2)
    {
      self.truncate(1);
    }
  }

  fn step1b(&mut self) {
    let Some(suffix) = ["eedly", "ingly", "edly", "eed", "ing", "ed"]
      .into_iter()
      .find(|s| self.ends_with(s))
    else {
      return;
    };

    if suffix.starts_with("ee") {
      if self.in_r1(suffix) {
        self.replace_suffix(suffix, "ee");
      }
      return;
    }

    let stem_len = self.len() - suffix.len();
    if !self.has_vowel(stem_len) {
      return;
    }
    self.truncate(suffix.len());

    if self.ends_with("at") || self.ends_with("bl") || self.ends_with("iz") {
      self.chars.push(b'e');
    } else if DOUBLES.iter().any(|d| self.chars.ends_with(d)) {
      self.truncate(1);
    } else if self.is_short() {
      self.chars.push(b'e');
    }
  }

  fn step1c(&mut self) {
    let n = self.len();
    if n > 2 && matches!(self.chars[n - 1], b'y' | b'Y') && !is_vowel(self.chars[n - 2]) {
      self.chars[n - 1] = b'i';
    }
  }

  fn step2(&mut self) {
    let Some(&(suffix, with)) = STEP2.iter().find(|(s, _)| self.ends_with(s)) else {
      return;
    };
    if !self.in_r1(suffix) {
      return;
    }
    let before = self.len() - suffix.len();
    let allowed = match suffix {
      "ogi" => before > 0 && self.chars[before - 1] == b'l',
      "li" => before > 0 && LI_ENDINGS.contains(&self.chars[before - 1]),
      _ => true,
    };
    if allowed {
      self.replace_suffix(suffix, with);
    }
  }

  fn step3(&mut self) {
    let Some(&(suffix, with)) = STEP3.iter().find(|(s, _)| self.ends_with(s)) else {
      return;
    };
    if !self.in_r1(suffix) || (suffix == "ative" && !self.in_r2(suffix)) {
      return;
    }
    self.replace_suffix(suffix, with);
  }

  fn step4(&mut self) {
    let Some(&suffix) = STEP4.iter().find(|s| self.ends_with(s)) else {
      return;
    };
    if !self.in_r2(suffix) {
      return;
    }
    if suffix == "ion" {
      let before = self.len() - suffix.len();
      if before == 0 || !matches!(self.chars[before - 1], b's' | b't') {
        return;
      }
    }
    self.truncate(suffix.len());
  }

  fn step5(&mut self) {
    if self.ends_with("e") {
      let preceding = &self.chars[..self.len() - 1];
      if self.in_r2("e") || (self.in_r1("e") && !ends_in_short_syllable(preceding)) {
        self.truncate(1);
      }
    } else if self.ends_with("ll") && self.in_r2("l") {
      self.truncate(1);
    }
  }

  fn finish(self) -> String {
    self
      .chars
      .into_iter()
      .map(|c| if c == b'Y' { 'y' } else { c as char })
      .collect()
  }
}

fn ends_in_short_syllable(c: &[u8]) -> bool {
  match c.len() {
    0 | 1 => false,
    2 => is_vowel(c[0]) && !is_vowel(c[1]),
    n => !is_vowel(c[n - 3]) && is_vowel(c[n - 2]) && !is_vowel(c[n - 1]) && !matches!(c[n - 1], b'w' | b'x' | b'Y'),
  }
}

/// Start of the region after the first non-vowel following a vowel, at or
/// after `from`.
fn region_start(chars: &[u8], from: usize) -> usize {
  (from.max(1)..chars.len())
    .find(|&i| is_vowel(chars[i - 1]) && !is_vowel(chars[i]) && i > from)
    .map(|i| i + 1)
    .unwrap_or(chars.len())
}
