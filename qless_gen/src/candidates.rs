use qless_dict::WordSource;
use util::letters::LetterCounts;

use crate::letter_pool::LetterPool;

/// Letters the pool holds at most this many of count as scarce.
const SCARCE_COUNT: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
  word: String,
  counts: LetterCounts,
  scarce: usize,
}

impl Candidate {
  pub fn word(&self) -> &str {
    &self.word
  }

  pub fn counts(&self) -> &LetterCounts {
    &self.counts
  }
}

/// Words spellable from a letter pool, in the order the search should try
/// them: longest first, then those using up the most scarce letters, then
/// alphabetical.
#[derive(Clone, Debug, Default)]
pub struct CandidateIndex {
  candidates: Vec<Candidate>,
}

impl CandidateIndex {
  pub fn build<D>(source: &D, pool: &LetterPool, min_word_length: usize) -> Self
  where
    D: WordSource + ?Sized,
  {
    let mut candidates: Vec<_> = source
      .candidates_for(&pool.to_string())
      .into_iter()
      .filter(|word| word.len() >= min_word_length)
      .filter_map(|word| {
        let counts = LetterCounts::from_word(&word)?;
        pool.can_afford_counts(&counts).then(|| {
          let scarce = counts
            .iter()
            .filter(|&(letter, _)| pool.count(letter) <= SCARCE_COUNT)
            .map(|(_, count)| count as usize)
            .sum();
          Candidate { word, counts, scarce }
        })
      })
      .collect();

    candidates.sort_by(|a, b| {
      b.word
        .len()
        .cmp(&a.word.len())
        .then(b.scarce.cmp(&a.scarce))
        .then_with(|| a.word.cmp(&b.word))
    });

    Self { candidates }
  }

  pub fn candidates(&self) -> &[Candidate] {
    &self.candidates
  }

  pub fn ordered_words(&self) -> impl Iterator<Item = &str> + '_ {
    self.candidates.iter().map(Candidate::word)
  }

  pub fn len(&self) -> usize {
    self.candidates.len()
  }

  pub fn is_empty(&self) -> bool {
    self.candidates.is_empty()
  }
}
