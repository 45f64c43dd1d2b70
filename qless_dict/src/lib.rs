#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod word_list;

use std::collections::HashSet;

pub use word_list::{default_words, WordList, DEFAULT_MIN_LENGTH};

/// Everything the solver needs to know about a dictionary.
pub trait WordSource {
  /// Whether `word` (lowercase) is an acceptable word on its own.
  fn contains(&self, word: &str) -> bool;

  /// All acceptable words that can be spelled from the multiset `letters`.
  fn candidates_for(&self, letters: &str) -> HashSet<String>;
}

impl<W> WordSource for &W
where
  W: WordSource + ?Sized,
{
  fn contains(&self, word: &str) -> bool {
    (**self).contains(word)
  }

  fn candidates_for(&self, letters: &str) -> HashSet<String> {
    (**self).candidates_for(letters)
  }
}
