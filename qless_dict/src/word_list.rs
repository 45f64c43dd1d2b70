use std::{
  borrow::Borrow,
  collections::{HashMap, HashSet},
};

use bitcode::{Decode, Encode};
use itertools::Itertools;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use util::{
  error::{QlessError, QlessResult},
  letters::LetterCounts,
};

use crate::WordSource;

/// Q-Less only counts words of three or more letters.
pub const DEFAULT_MIN_LENGTH: usize = 3;

const DEFAULT_WORDS: &str = include_str!("default_words.txt");

/// A word, optionally followed by whitespace and a usage frequency.
static LINE_PATTERN: Lazy<Result<Regex, regex::Error>> =
  Lazy::new(|| Regex::new(r"^(\S+)(?:\s+(\d+))?$"));

static DEFAULT_LIST: Lazy<QlessResult<WordList>> =
  Lazy::new(|| WordList::parse_word_file(DEFAULT_WORDS.lines(), DEFAULT_MIN_LENGTH));

/// The built-in word list, parsed once on first use.
pub fn default_words() -> QlessResult<&'static WordList> {
  DEFAULT_LIST
    .as_ref()
    .map_err(|err| QlessError::Internal(format!("Built-in word list is malformed: {err}")).into())
}

fn line_pattern() -> QlessResult<&'static Regex> {
  LINE_PATTERN
    .as_ref()
    .map_err(|err| QlessError::Internal(format!("Invalid word list pattern: {err}")).into())
}

/// In-memory dictionary mapping each word to how often it was seen.
#[derive(Clone, Debug, Encode, Decode)]
pub struct WordList {
  words: HashMap<String, u32>,
  min_length: u32,
}

impl WordList {
  fn canonicalize_word(word: &str) -> Option<String> {
    word
      .chars()
      .all(|c| c.is_ascii_alphabetic())
      .then(|| word.to_ascii_lowercase())
  }

  fn parse_line(line: &str) -> QlessResult<Option<(String, u32)>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      return Ok(None);
    }

    let captures = line_pattern()?
      .captures(line)
      .ok_or_else(|| QlessError::Parse(format!("Failed to parse \"{line}\" as a word entry")))?;
    let frequency = match captures.get(2) {
      Some(frequency) => frequency.as_str().parse()?,
      None => 1,
    };

    Ok(
      captures
        .get(1)
        .and_then(|word| Self::canonicalize_word(word.as_str()))
        .map(|word| (word, frequency)),
    )
  }

  /// Parses a word list, one word per line. Blank lines and `#` comments are
  /// skipped, as are words shorter than `min_length` and words containing
  /// anything other than letters. Repeated words have their frequencies summed.
  pub fn parse_word_file<S>(
    lines: impl IntoIterator<Item = S>,
    min_length: usize,
  ) -> QlessResult<Self>
  where
    S: Borrow<str>,
  {
    let words = lines.into_iter().try_fold(
      HashMap::<String, u32>::new(),
      |mut words, line| -> QlessResult<_> {
        let entry = Self::parse_line(line.borrow())?.filter(|(word, _)| word.len() >= min_length);
        if let Some((word, frequency)) = entry {
          *words.entry(word).or_default() += frequency;
        }
        Ok(words)
      },
    )?;
    debug!("Parsed word list with {} words", words.len());

    Ok(Self { words, min_length: min_length as u32 })
  }

  pub fn from_words<S>(words: impl IntoIterator<Item = S>) -> Self
  where
    S: AsRef<str>,
  {
    let mut list = Self { words: HashMap::new(), min_length: DEFAULT_MIN_LENGTH as u32 };
    list.add_words(words);
    list
  }

  pub fn with_min_length(self, min_length: usize) -> Self {
    Self { min_length: min_length as u32, ..self }
  }

  pub fn min_length(&self) -> usize {
    self.min_length as usize
  }

  pub fn add_words<S>(&mut self, words: impl IntoIterator<Item = S>)
  where
    S: AsRef<str>,
  {
    for word in words {
      if let Some(word) = Self::canonicalize_word(word.as_ref()) {
        *self.words.entry(word).or_default() += 1;
      }
    }
  }

  pub fn len(&self) -> usize {
    self.words.len()
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  /// The `n` most frequent words, ties broken alphabetically.
  pub fn top_n_words(&self, n: usize) -> Vec<&str> {
    self
      .words
      .iter()
      .map(|(word, &frequency)| (word.as_str(), frequency))
      .sorted_by_key(|&(word, frequency)| (!frequency, word))
      .map(|(word, _)| word)
      .take(n)
      .collect()
  }

  /// A copy keeping only the `n` most frequent words.
  pub fn truncated(&self, n: usize) -> Self {
    let words = self
      .top_n_words(n)
      .into_iter()
      .filter_map(|word| {
        self
          .words
          .get(word)
          .map(|&frequency| (word.to_owned(), frequency))
      })
      .collect();
    Self { words, min_length: self.min_length }
  }

  pub fn encode(&self) -> Vec<u8> {
    bitcode::encode(self)
  }

  pub fn decode(bytes: &[u8]) -> QlessResult<Self> {
    Ok(bitcode::decode(bytes)?)
  }
}

impl WordSource for WordList {
  fn contains(&self, word: &str) -> bool {
    word.len() >= self.min_length() && self.words.contains_key(word)
  }

  fn candidates_for(&self, letters: &str) -> HashSet<String> {
    let Some(available) = LetterCounts::from_word(letters) else {
      return HashSet::new();
    };

    self
      .words
      .keys()
      .filter(|word| word.len() >= self.min_length() && word.len() <= available.total())
      .filter(|word| {
        LetterCounts::from_word(word).is_some_and(|needed| available.contains_all(&needed))
      })
      .cloned()
      .collect()
  }
}
