use log::debug;
use util::error::QlessResult;

use crate::{
  candidates::{Candidate, CandidateIndex},
  letter_pool::LetterPool,
  search::SearchConfig,
};

struct CoverSearch<'s> {
  words: &'s [Candidate],
  pool: LetterPool,
  chosen: Vec<&'s str>,
  covers: Vec<Vec<String>>,
  limit: usize,
  nodes: u64,
  max_nodes: Option<u64>,
}

impl CoverSearch<'_> {
  /// Extends the current choice with words at `start` or later. Returns true
  /// once the search should stop.
  fn cover(&mut self, start: usize) -> QlessResult<bool> {
    self.nodes += 1;
    if self.max_nodes.is_some_and(|max_nodes| self.nodes > max_nodes) {
      return Ok(true);
    }
    if self.pool.is_empty() {
      self.covers.push(self.chosen.iter().map(|&word| word.to_owned()).collect());
      return Ok(self.covers.len() >= self.limit);
    }

    let words = self.words;
    for (idx, candidate) in words.iter().enumerate().skip(start) {
      if !self.pool.can_afford_counts(candidate.counts()) {
        continue;
      }

      self.pool.consume_counts(candidate.counts())?;
      self.chosen.push(candidate.word());
      let stop = self.cover(idx)?;
      self.chosen.pop();
      self.pool.release_counts(candidate.counts())?;

      if stop {
        return Ok(true);
      }
    }
    Ok(false)
  }
}

/// Sets of words which together spell every letter in `pool` exactly once,
/// ignoring whether they could be laid out on a grid. Each set lists its words
/// in candidate order, and a word may repeat if the pool has letters for it.
pub fn find_letter_covers(
  index: &CandidateIndex,
  pool: &LetterPool,
  config: &SearchConfig,
) -> QlessResult<Vec<Vec<String>>> {
  if pool.is_empty() || config.max_solutions == 0 {
    return Ok(Vec::new());
  }

  let mut search = CoverSearch {
    words: index.candidates(),
    pool: pool.clone(),
    chosen: Vec::new(),
    covers: Vec::new(),
    limit: config.max_solutions,
    nodes: 0,
    max_nodes: config.max_nodes,
  };
  search.cover(0)?;
  debug!(
    "Found {} letter covers for \"{pool}\" after {} nodes",
    search.covers.len(),
    search.nodes
  );
  Ok(search.covers)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use qless_dict::WordList;

  use super::find_letter_covers;
  use crate::{candidates::CandidateIndex, letter_pool::LetterPool, search::SearchConfig};

  fn covers(words: &[&str], letters: &str, config: SearchConfig) -> Vec<Vec<String>> {
    let dict = WordList::from_words(words);
    let pool = LetterPool::from_letters(letters).unwrap();
    let index = CandidateIndex::build(&dict, &pool, config.min_word_length);
    find_letter_covers(&index, &pool, &config).unwrap()
  }

  #[gtest]
  fn test_finds_every_cover() {
    let found = covers(&["act", "cat", "dog", "god"], "catdog", SearchConfig::default());
    expect_true!(
      found
        == vec![
          vec!["act", "dog"],
          vec!["act", "god"],
          vec!["cat", "dog"],
          vec!["cat", "god"],
        ]
    );
  }

  #[gtest]
  fn test_repeated_word() {
    let found = covers(&["tot", "toot"], "tottot", SearchConfig::default());
    expect_true!(found == vec![vec!["tot", "tot"]]);
  }

  #[gtest]
  fn test_limit() {
    let config = SearchConfig { max_solutions: 2, ..SearchConfig::default() };
    let found = covers(&["act", "cat", "dog", "god"], "catdog", config);
    expect_that!(found.len(), eq(2));
  }

  #[gtest]
  fn test_node_budget() {
    let config = SearchConfig { max_nodes: Some(1), ..SearchConfig::default() };
    let found = covers(&["act", "cat", "dog", "god"], "catdog", config);
    expect_true!(found.is_empty());
  }

  #[gtest]
  fn test_no_cover() {
    expect_true!(covers(&["art", "rat"], "arts", SearchConfig::default()).is_empty());
    expect_true!(covers(&["art"], "", SearchConfig::default()).is_empty());
  }
}
