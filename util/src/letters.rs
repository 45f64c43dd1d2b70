use std::{
  fmt::Display,
  ops::{Add, AddAssign},
};

use bitcode::{Decode, Encode};

const ALPHABET_SIZE: usize = 26;

/// Histogram of lowercase ascii letters. Letters are case-folded on the way in,
/// anything outside a-z is rejected.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Encode, Decode)]
pub struct LetterCounts {
  counts: [u32; ALPHABET_SIZE],
}

impl LetterCounts {
  pub const fn new() -> Self {
    Self { counts: [0; ALPHABET_SIZE] }
  }

  fn slot(letter: char) -> Option<usize> {
    let letter = letter.to_ascii_lowercase();
    letter
      .is_ascii_lowercase()
      .then(|| (letter as u8 - b'a') as usize)
  }

  const fn letter(slot: usize) -> char {
    (b'a' + slot as u8) as char
  }

  pub fn from_word(word: &str) -> Option<Self> {
    word.chars().try_fold(Self::new(), |mut counts, letter| {
      counts.insert(letter).then_some(counts)
    })
  }

  /// Adds one occurrence of `letter`, returning false if it is not a letter.
  pub fn insert(&mut self, letter: char) -> bool {
    match Self::slot(letter) {
      Some(slot) => {
        self.counts[slot] += 1;
        true
      }
      None => false,
    }
  }

  pub fn count(&self, letter: char) -> u32 {
    Self::slot(letter).map_or(0, |slot| self.counts[slot])
  }

  pub fn total(&self) -> usize {
    self.counts.iter().map(|&count| count as usize).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.counts.iter().all(|&count| count == 0)
  }

  /// True if every letter in `other` is present here at least as many times.
  pub fn contains_all(&self, other: &LetterCounts) -> bool {
    self
      .counts
      .iter()
      .zip(other.counts.iter())
      .all(|(&have, &need)| need <= have)
  }

  pub fn checked_sub(&self, other: &LetterCounts) -> Option<Self> {
    let mut result = *self;
    for (have, &take) in result.counts.iter_mut().zip(other.counts.iter()) {
      *have = have.checked_sub(take)?;
    }
    Some(result)
  }

  /// Per-letter difference, clamped at zero.
  pub fn saturating_sub(&self, other: &LetterCounts) -> Self {
    let mut result = *self;
    for (have, &take) in result.counts.iter_mut().zip(other.counts.iter()) {
      *have = have.saturating_sub(take);
    }
    result
  }

  /// Distinct letters with a non-zero count, alphabetically.
  pub fn iter(&self) -> impl Iterator<Item = (char, u32)> + '_ {
    self
      .counts
      .iter()
      .enumerate()
      .filter(|(_, &count)| count > 0)
      .map(|(slot, &count)| (Self::letter(slot), count))
  }
}

impl Add for LetterCounts {
  type Output = Self;

  fn add(mut self, rhs: Self) -> Self {
    self += rhs;
    self
  }
}

impl AddAssign for LetterCounts {
  fn add_assign(&mut self, rhs: Self) {
    for (count, &more) in self.counts.iter_mut().zip(rhs.counts.iter()) {
      *count += more;
    }
  }
}

impl Display for LetterCounts {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.iter().try_fold((), |_, (letter, count)| {
      (0..count).try_fold((), |_, _| write!(f, "{letter}"))
    })
  }
}
