use std::fmt::Display;

use bitcode::{Decode, Encode};
use util::{
  error::{QlessError, QlessResult},
  letters::LetterCounts,
};

/// The letters rolled for one game, tracking how many of each are still
/// unplaced. The original roll never changes; only `remaining` moves.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct LetterPool {
  original: LetterCounts,
  remaining: LetterCounts,
}

impl LetterPool {
  pub fn from_counts(counts: LetterCounts) -> Self {
    Self { original: counts, remaining: counts }
  }

  pub fn from_letters(letters: &str) -> QlessResult<Self> {
    let counts = LetterCounts::from_word(letters).ok_or_else(|| {
      QlessError::Parse(format!("Letters must be a-z only, found \"{letters}\""))
    })?;
    Ok(Self::from_counts(counts))
  }

  fn word_counts(word: &str) -> QlessResult<LetterCounts> {
    LetterCounts::from_word(word)
      .ok_or_else(|| QlessError::Parse(format!("\"{word}\" is not a lowercase word")).into())
  }

  pub fn can_afford(&self, word: &str) -> bool {
    LetterCounts::from_word(word).is_some_and(|counts| self.can_afford_counts(&counts))
  }

  pub fn can_afford_counts(&self, counts: &LetterCounts) -> bool {
    self.remaining.contains_all(counts)
  }

  pub fn consume(&mut self, word: &str) -> QlessResult {
    self.consume_counts(&Self::word_counts(word)?)
  }

  /// Removes `counts` from the pool. Leaves the pool untouched on failure.
  pub fn consume_counts(&mut self, counts: &LetterCounts) -> QlessResult {
    self.remaining = self.remaining.checked_sub(counts).ok_or_else(|| {
      QlessError::InsufficientLetters(format!("need \"{counts}\", have \"{}\"", self.remaining))
    })?;
    Ok(())
  }

  pub fn release(&mut self, word: &str) -> QlessResult {
    self.release_counts(&Self::word_counts(word)?)
  }

  /// Returns previously consumed letters to the pool. Releasing letters that
  /// were never consumed is an error and leaves the pool untouched.
  pub fn release_counts(&mut self, counts: &LetterCounts) -> QlessResult {
    let restored = self.remaining + *counts;
    if !self.original.contains_all(&restored) {
      return Err(
        QlessError::Internal(format!(
          "Releasing \"{counts}\" would exceed the original letters \"{}\"",
          self.original
        ))
        .into(),
      );
    }
    self.remaining = restored;
    Ok(())
  }

  pub fn remaining_total(&self) -> usize {
    self.remaining.total()
  }

  pub fn count(&self, letter: char) -> u32 {
    self.remaining.count(letter)
  }

  pub fn original(&self) -> &LetterCounts {
    &self.original
  }

  pub fn remaining(&self) -> &LetterCounts {
    &self.remaining
  }

  pub fn used(&self) -> LetterCounts {
    // remaining is always a sub-multiset of original.
    self.original.checked_sub(&self.remaining).unwrap_or_default()
  }

  pub fn is_empty(&self) -> bool {
    self.remaining.is_empty()
  }
}

impl Display for LetterPool {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.remaining)
  }
}
