use std::fmt::Display;

use bitcode::{Decode, Encode};
use itertools::Itertools;
use qless_dict::WordSource;
use util::{
  grid::Grid,
  letters::LetterCounts,
  pos::Pos,
};

use crate::{
  board::{Board, PlacedWord},
  letter_pool::LetterPool,
};

/// A finished arrangement, copied out of the search so it outlives the board
/// it was found on.
#[derive(Clone, Debug, PartialEq, Encode, Decode)]
pub struct GridSolution {
  words: Vec<PlacedWord>,
  /// Filled cells in row-major order.
  cells: Vec<(Pos, char)>,
  used: LetterCounts,
  remaining: LetterCounts,
  score: f64,
}

impl GridSolution {
  pub fn from_board<D>(board: &Board<'_, D>, pool: &LetterPool) -> Self
  where
    D: WordSource + ?Sized,
  {
    let snapshot = board.snapshot();
    Self {
      words: snapshot.words,
      cells: snapshot.cells,
      used: pool.used(),
      remaining: *pool.remaining(),
      score: 0.,
    }
  }

  pub fn with_score(self, score: f64) -> Self {
    Self { score, ..self }
  }

  pub fn words(&self) -> &[PlacedWord] {
    &self.words
  }

  pub fn cells(&self) -> &[(Pos, char)] {
    &self.cells
  }

  pub fn used(&self) -> &LetterCounts {
    &self.used
  }

  pub fn remaining(&self) -> &LetterCounts {
    &self.remaining
  }

  pub fn original(&self) -> LetterCounts {
    self.used + self.remaining
  }

  pub fn score(&self) -> f64 {
    self.score
  }

  pub fn word_count(&self) -> usize {
    self.words.len()
  }

  pub fn unused_count(&self) -> usize {
    self.remaining.total()
  }

  /// Top-left and bottom-right filled corners, inclusive.
  pub fn bounds(&self) -> Option<(Pos, Pos)> {
    let (min_x, max_x) = self.cells.iter().map(|(pos, _)| pos.x).minmax().into_option()?;
    let (min_y, max_y) = self.cells.iter().map(|(pos, _)| pos.y).minmax().into_option()?;
    Some((Pos { x: min_x, y: min_y }, Pos { x: max_x, y: max_y }))
  }

  pub fn bounding_area(&self) -> usize {
    self.bounds().map_or(0, |(min, max)| {
      let size = max - min;
      (size.x as usize + 1) * (size.y as usize + 1)
    })
  }

  /// Cells shifted so the top-left corner of the bounding box is (0, 0).
  /// Two solutions with the same key are the same picture.
  pub fn layout_key(&self) -> Vec<(i32, i32, char)> {
    let origin = self.bounds().map_or(Pos::zero(), |(min, _)| min);
    self
      .cells
      .iter()
      .map(|&(pos, letter)| (pos.x - origin.x, pos.y - origin.y, letter))
      .collect()
  }

  /// Dense copy of the layout, cropped to its bounding box.
  pub fn to_grid(&self) -> Grid<Option<char>> {
    let Some((min, max)) = self.bounds() else {
      return Grid::new(0, 0);
    };
    let size = max - min;
    let mut grid = Grid::new(size.x as u32 + 1, size.y as u32 + 1);
    for &(pos, letter) in &self.cells {
      if let Some(tile) = grid.get_mut(Pos::zero() + (pos - min)) {
        *tile = Some(letter);
      }
    }
    grid
  }
}

impl Display for GridSolution {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.to_grid().map(|tile| tile.unwrap_or('.')))
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use qless_dict::WordList;
  use util::{
    grid::Gridlike,
    pos::{Direction, Pos},
  };

  use super::GridSolution;
  use crate::{
    board::{Board, GridPosition},
    letter_pool::LetterPool,
  };

  fn cat_tea() -> GridSolution {
    let dict = WordList::from_words(["cat", "tea"]);
    let mut board = Board::new(&dict);
    let mut pool = LetterPool::from_letters("cateax").unwrap();
    let fresh = board
      .place_word("cat", GridPosition::new(-1, 4, Direction::Across))
      .unwrap();
    pool.consume_counts(&fresh).unwrap();
    let fresh = board
      .place_word("tea", GridPosition::new(1, 4, Direction::Down))
      .unwrap();
    pool.consume_counts(&fresh).unwrap();
    GridSolution::from_board(&board, &pool)
  }

  #[gtest]
  fn test_letters_are_conserved() {
    let solution = cat_tea();
    expect_that!(solution.used().to_string().as_str(), eq("aacet"));
    expect_that!(solution.remaining().to_string().as_str(), eq("x"));
    expect_that!(solution.original().to_string().as_str(), eq("aacetx"));
  }

  #[gtest]
  fn test_bounds_and_area() {
    let solution = cat_tea();
    expect_that!(
      solution.bounds(),
      some(eq((Pos { x: -1, y: 4 }, Pos { x: 1, y: 6 })))
    );
    expect_that!(solution.bounding_area(), eq(9));
  }

  #[gtest]
  fn test_to_grid() {
    let solution = cat_tea();
    let grid = solution.to_grid();
    expect_that!(grid.width(), eq(3));
    expect_that!(grid.height(), eq(3));
    expect_that!(grid.get(Pos { x: 0, y: 0 }).cloned().flatten(), some(eq('c')));
    expect_that!(grid.get(Pos { x: 2, y: 2 }).cloned().flatten(), some(eq('a')));
    expect_that!(grid.get(Pos { x: 0, y: 2 }).cloned().flatten(), none());
    expect_that!(solution.to_string().as_str(), eq("c a t\n. . e\n. . a\n"));
  }

  #[gtest]
  fn test_layout_key_ignores_translation() {
    let solution = cat_tea();
    expect_that!(
      solution.layout_key(),
      container_eq([(0, 0, 'c'), (1, 0, 'a'), (2, 0, 't'), (2, 1, 'e'), (2, 2, 'a')])
    );
  }
}
