use rand::{Rng, SeedableRng, rngs::StdRng};
use util::{
  error::{QlessError, QlessResult},
  letters::LetterCounts,
};

pub const FACES: usize = 6;

/// The twelve Q-Less dice.
pub const QLESS_DICE: [[char; FACES]; 12] = [
  ['m', 'm', 'l', 'l', 'b', 'y'],
  ['v', 'f', 'g', 'k', 'p', 'p'],
  ['h', 'h', 'n', 'n', 'r', 'r'],
  ['d', 'f', 'r', 'l', 'l', 'w'],
  ['r', 'r', 'd', 'l', 'g', 'g'],
  ['x', 'k', 'b', 's', 'z', 'n'],
  ['w', 'h', 'h', 't', 't', 'p'],
  ['c', 'c', 'b', 't', 'j', 'd'],
  ['c', 'c', 'm', 't', 't', 's'],
  ['o', 'i', 'i', 'n', 'n', 'y'],
  ['a', 'e', 'i', 'o', 'u', 'u'],
  ['a', 'a', 'e', 'e', 'o', 'o'],
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiceSet {
  dice: Vec<[char; FACES]>,
}

impl DiceSet {
  pub fn standard() -> Self {
    Self { dice: QLESS_DICE.to_vec() }
  }

  pub fn from_dice(dice: Vec<[char; FACES]>) -> QlessResult<Self> {
    if let Some(face) = dice.iter().flatten().find(|face| !face.is_ascii_lowercase()) {
      return Err(QlessError::Parse(format!("Die face '{face}' is not a lowercase letter")).into());
    }
    Ok(Self { dice })
  }

  pub fn len(&self) -> usize {
    self.dice.len()
  }

  pub fn is_empty(&self) -> bool {
    self.dice.is_empty()
  }

  /// One letter per die, in die order.
  pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
    self
      .dice
      .iter()
      .map(|die| die[rng.random_range(0..FACES)])
      .collect()
  }

  /// Reads off the given face of each die.
  pub fn roll_with_faces(&self, faces: &[usize]) -> QlessResult<String> {
    if faces.len() != self.dice.len() {
      return Err(
        QlessError::Parse(format!(
          "Expected {} face indices, found {}",
          self.dice.len(),
          faces.len()
        ))
        .into(),
      );
    }

    self
      .dice
      .iter()
      .zip(faces)
      .map(|(die, &face)| {
        die.get(face).copied().ok_or_else(|| {
          QlessError::Parse(format!("Face index {face} is out of range 0..{FACES}")).into()
        })
      })
      .collect()
  }

  pub fn roll_seeded(&self, seed: u64) -> String {
    self.roll(&mut StdRng::seed_from_u64(seed))
  }

  /// How many faces across all dice show each letter.
  pub fn letter_frequency(&self) -> LetterCounts {
    let mut counts = LetterCounts::new();
    for &face in self.dice.iter().flatten() {
      counts.insert(face);
    }
    counts
  }
}

impl Default for DiceSet {
  fn default() -> Self {
    Self::standard()
  }
}

/// Rolls the standard dice with a fresh random generator.
pub fn roll_letters() -> String {
  DiceSet::standard().roll(&mut rand::rng())
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use rand::{SeedableRng, rngs::StdRng};

  use super::{DiceSet, QLESS_DICE, roll_letters};

  #[gtest]
  fn test_roll_uses_each_die() {
    let dice = DiceSet::standard();
    let mut rng = StdRng::seed_from_u64(27418995609531717);
    for _ in 0..20 {
      let letters = dice.roll(&mut rng);
      expect_that!(letters.len(), eq(12));
      expect_true!(letters
        .chars()
        .zip(QLESS_DICE.iter())
        .all(|(letter, die)| die.contains(&letter)));
    }
  }

  #[gtest]
  fn test_seeded_roll_is_deterministic() {
    let dice = DiceSet::standard();
    expect_true!(dice.roll_seeded(7) == dice.roll_seeded(7));
  }

  #[gtest]
  fn test_roll_with_faces() {
    let dice = DiceSet::standard();
    expect_that!(dice.roll_with_faces(&[0; 12]).unwrap().as_str(), eq("mvhdrxwccoaa"));
    expect_that!(dice.roll_with_faces(&[5; 12]).unwrap().as_str(), eq("yprwgnpdsyuo"));
    expect_that!(dice.roll_with_faces(&[0; 11]), err(anything()));
    expect_that!(dice.roll_with_faces(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 6]), err(anything()));
  }

  #[gtest]
  fn test_letter_frequency() {
    let frequency = DiceSet::standard().letter_frequency();
    expect_that!(frequency.total(), eq(72));
    expect_that!(frequency.count('c'), eq(4));
    expect_that!(frequency.count('h'), eq(4));
    expect_that!(frequency.count('q'), eq(0));
  }

  #[gtest]
  fn test_custom_dice() {
    let dice = DiceSet::from_dice(vec![['a'; 6], ['b', 'b', 'b', 'c', 'c', 'c']]).unwrap();
    expect_that!(dice.len(), eq(2));
    expect_that!(dice.roll_with_faces(&[0, 4]).unwrap().as_str(), eq("ac"));
    expect_that!(DiceSet::from_dice(vec![['A'; 6]]), err(anything()));
  }

  #[gtest]
  fn test_roll_letters() {
    let letters = roll_letters();
    expect_that!(letters.len(), eq(12));
    expect_true!(letters.chars().all(|letter| letter.is_ascii_lowercase()));
  }
}
