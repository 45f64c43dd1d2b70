use std::collections::{hash_map::Entry, HashMap};

use bitcode::{Decode, Encode};
use qless_dict::WordSource;
use util::{
  error::{QlessError, QlessResult},
  letters::LetterCounts,
  pos::{Direction, Pos},
};

/// Where a word starts, and which way it reads.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Encode, Decode)]
pub struct GridPosition {
  pub pos: Pos,
  pub direction: Direction,
}

impl GridPosition {
  pub const fn new(x: i32, y: i32, direction: Direction) -> Self {
    Self { pos: Pos { x, y }, direction }
  }

  /// The cell `offset` letters along from the start.
  pub fn cell(&self, offset: usize) -> Pos {
    self.pos + offset as i32 * self.direction.step()
  }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, Encode, Decode)]
pub struct PlacedWord {
  pub word: String,
  pub position: GridPosition,
}

impl PlacedWord {
  pub fn cells(&self) -> impl Iterator<Item = (Pos, char)> + '_ {
    self
      .word
      .chars()
      .enumerate()
      .map(|(offset, letter)| (self.position.cell(offset), letter))
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
  letter: char,
  across: bool,
  down: bool,
}

impl Cell {
  fn new(letter: char) -> Self {
    Self { letter, across: false, down: false }
  }

  fn owned(&self, direction: Direction) -> bool {
    match direction {
      Direction::Across => self.across,
      Direction::Down => self.down,
    }
  }

  fn set_owned(&mut self, direction: Direction, owned: bool) {
    match direction {
      Direction::Across => self.across = owned,
      Direction::Down => self.down = owned,
    }
  }

  fn unowned(&self) -> bool {
    !self.across && !self.down
  }
}

/// What a placement would do to the board, if it is geometrically possible.
struct Plan {
  fresh: LetterCounts,
  shared: usize,
}

/// Deep copy of the board contents, comparable for equality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSnapshot {
  /// Filled cells in row-major order.
  pub cells: Vec<(Pos, char)>,
  pub words: Vec<PlacedWord>,
}

/// Shortest run any board accepts; a lone letter is never a word.
pub const MIN_RUN_LENGTH: usize = 2;

/// Sparse, unbounded letter grid. Each cell remembers which directions have a
/// word running through it, which doubles as the undo record when words are
/// removed: a cell disappears only once no word owns it.
pub struct Board<'a, D: ?Sized> {
  dict: &'a D,
  min_word_length: usize,
  cells: HashMap<Pos, Cell>,
  words: Vec<PlacedWord>,
}

impl<D: ?Sized> Clone for Board<'_, D> {
  fn clone(&self) -> Self {
    Self {
      dict: self.dict,
      min_word_length: self.min_word_length,
      cells: self.cells.clone(),
      words: self.words.clone(),
    }
  }
}

impl<'a, D> Board<'a, D>
where
  D: WordSource + ?Sized,
{
  pub fn new(dict: &'a D) -> Self {
    Self { dict, min_word_length: MIN_RUN_LENGTH, cells: HashMap::new(), words: Vec::new() }
  }

  /// A board that also rejects any word or cross-run shorter than
  /// `min_word_length`, whatever the dictionary allows.
  pub fn with_min_word_length(dict: &'a D, min_word_length: usize) -> Self {
    Self { min_word_length: min_word_length.max(MIN_RUN_LENGTH), ..Self::new(dict) }
  }

  pub fn min_word_length(&self) -> usize {
    self.min_word_length
  }

  pub fn set_min_word_length(&mut self, min_word_length: usize) {
    self.min_word_length = min_word_length.max(MIN_RUN_LENGTH);
  }

  fn is_word(&self, word: &str) -> bool {
    word.chars().count() >= self.min_word_length && self.dict.contains(word)
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  pub fn words(&self) -> &[PlacedWord] {
    &self.words
  }

  pub fn letter_at(&self, pos: Pos) -> Option<char> {
    self.cells.get(&pos).map(|cell| cell.letter)
  }

  fn occupied(&self, pos: Pos) -> bool {
    self.cells.contains_key(&pos)
  }

  pub fn cell_count(&self) -> usize {
    self.cells.len()
  }

  pub fn cells(&self) -> impl Iterator<Item = (Pos, char)> + '_ {
    self.cells.iter().map(|(&pos, cell)| (pos, cell.letter))
  }

  /// Every (cell, direction) a new word could cross through: each cell of each
  /// placed word, in the perpendicular direction, unless a word already runs
  /// that way through the cell. Ordered by placement order, then offset.
  pub fn anchor_points(&self) -> Vec<GridPosition> {
    if self.words.is_empty() {
      return vec![GridPosition::new(0, 0, Direction::Across)];
    }

    self
      .words
      .iter()
      .flat_map(|placed| {
        let direction = placed.position.direction.perpendicular();
        placed
          .cells()
          .filter(move |(pos, _)| {
            self
              .cells
              .get(pos)
              .is_some_and(|cell| !cell.owned(direction))
          })
          .map(move |(pos, _)| GridPosition { pos, direction })
      })
      .collect()
  }

  fn plan(&self, word: &str, position: GridPosition) -> Option<Plan> {
    word.chars().enumerate().try_fold(
      Plan { fresh: LetterCounts::new(), shared: 0 },
      |mut plan, (offset, letter)| {
        if !letter.is_ascii_lowercase() {
          return None;
        }
        match self.cells.get(&position.cell(offset)) {
          Some(cell) if cell.letter != letter || cell.owned(position.direction) => None,
          Some(_) => {
            plan.shared += 1;
            Some(plan)
          }
          None => {
            plan.fresh.insert(letter);
            Some(plan)
          }
        }
      },
    )
  }

  /// The letters a placement would newly put down, or `None` if the word
  /// clashes with a cell already on the board.
  pub fn fresh_letters(&self, word: &str, position: GridPosition) -> Option<LetterCounts> {
    self.plan(word, position).map(|plan| plan.fresh)
  }

  /// The maximal run through `pos` along `direction`, pretending `pos` holds
  /// `letter`. Returns `None` if the run is a single letter.
  fn run_through(&self, pos: Pos, letter: char, direction: Direction) -> Option<String> {
    let step = direction.step();
    if !self.occupied(pos - step) && !self.occupied(pos + step) {
      return None;
    }

    let mut start = pos;
    while self.occupied(start - step) {
      start -= step;
    }

    let mut run = String::new();
    let mut cursor = start;
    loop {
      match self.letter_at(cursor) {
        _ if cursor == pos => run.push(letter),
        Some(existing) => run.push(existing),
        None => break,
      }
      cursor += step;
    }
    Some(run)
  }

  /// Checks whether `word` may be written at `position` without mutating the
  /// board. The word must agree with every cell it shares, share at least one
  /// cell with the existing words (unless the board is empty), write at least
  /// one new cell, not already be on the board, and leave every run of two or
  /// more letters it touches spelling a dictionary word at least
  /// `min_word_length` long.
  pub fn validate_placement(&self, word: &str, position: GridPosition) -> bool {
    if word.is_empty() || self.words.iter().any(|placed| placed.word == word) {
      return false;
    }

    let step = position.direction.step();
    let len = word.chars().count();
    if self.occupied(position.pos - step) || self.occupied(position.cell(len)) {
      return false;
    }

    let Some(plan) = self.plan(word, position) else {
      return false;
    };
    if plan.fresh.is_empty() || (!self.is_empty() && plan.shared == 0) {
      return false;
    }
    if !self.is_word(word) {
      return false;
    }

    let cross = position.direction.perpendicular();
    word.chars().enumerate().all(|(offset, letter)| {
      let pos = position.cell(offset);
      self.occupied(pos)
        || self
          .run_through(pos, letter, cross)
          .is_none_or(|run| self.is_word(&run))
    })
  }

  /// Writes `word` at `position` if it is a valid placement, returning the
  /// letters newly put on the board. Nothing changes on failure.
  pub fn place_word(&mut self, word: &str, position: GridPosition) -> QlessResult<LetterCounts> {
    if !self.validate_placement(word, position) {
      return Err(
        QlessError::InvalidPlacement(format!(
          "\"{word}\" {} at {}",
          position.direction, position.pos
        ))
        .into(),
      );
    }

    let placed = PlacedWord { word: word.to_owned(), position };
    let mut fresh = LetterCounts::new();
    for (pos, letter) in placed.cells() {
      let cell = match self.cells.entry(pos) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => {
          fresh.insert(letter);
          entry.insert(Cell::new(letter))
        }
      };
      cell.set_owned(position.direction, true);
    }
    self.words.push(placed);

    Ok(fresh)
  }

  /// Undoes a placement of `word` at `position`, returning the letters taken
  /// off the board. Cells still crossed by another word stay put.
  pub fn remove_word(&mut self, word: &str, position: GridPosition) -> QlessResult<LetterCounts> {
    let idx = self
      .words
      .iter()
      .rposition(|placed| placed.word == word && placed.position == position)
      .ok_or_else(|| {
        QlessError::InvalidPlacement(format!(
          "\"{word}\" {} at {} is not on the board",
          position.direction, position.pos
        ))
      })?;
    let placed = self.words.remove(idx);

    let mut freed = LetterCounts::new();
    for (pos, _) in placed.cells() {
      let Entry::Occupied(mut entry) = self.cells.entry(pos) else {
        return Err(QlessError::Internal(format!("Missing cell {pos} for \"{word}\"")).into());
      };
      let cell = entry.get_mut();
      cell.set_owned(position.direction, false);
      if cell.unowned() {
        freed.insert(entry.remove().letter);
      }
    }

    Ok(freed)
  }

  pub fn snapshot(&self) -> BoardSnapshot {
    let mut cells: Vec<_> = self.cells().collect();
    cells.sort_by_key(|(pos, _)| pos.row_major());
    BoardSnapshot { cells, words: self.words.clone() }
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;
  use qless_dict::WordList;
  use util::pos::{Direction, Pos};

  use super::{Board, GridPosition};

  fn dict() -> WordList {
    WordList::from_words(["cat", "cats", "act", "tea", "eat", "art", "arts", "rat", "at"])
  }

  #[gtest]
  fn test_empty_board_anchor() {
    let dict = dict();
    let board = Board::new(&dict);
    expect_that!(
      board.anchor_points(),
      container_eq([GridPosition::new(0, 0, Direction::Across)])
    );
  }

  #[gtest]
  fn test_place_across_and_down() {
    let dict = dict();
    let mut board = Board::new(&dict);
    let fresh = board.place_word("cat", GridPosition::new(0, 0, Direction::Across));
    assert_that!(fresh, ok(anything()));
    expect_that!(fresh.unwrap().to_string().as_str(), eq("act"));
    expect_that!(board.letter_at(Pos { x: 2, y: 0 }), some(eq('t')));
    expect_that!(board.letter_at(Pos { x: 3, y: 0 }), none());

    let fresh = board.place_word("tea", GridPosition::new(2, 0, Direction::Down));
    assert_that!(fresh, ok(anything()));
    expect_that!(fresh.unwrap().to_string().as_str(), eq("ae"));
    expect_that!(board.letter_at(Pos { x: 2, y: 2 }), some(eq('a')));
    expect_that!(board.cell_count(), eq(5));
  }

  #[gtest]
  fn test_anchor_points_skip_crossed_cells() {
    let dict = dict();
    let mut board = Board::new(&dict);
    board
      .place_word("cat", GridPosition::new(0, 0, Direction::Across))
      .unwrap();
    board
      .place_word("tea", GridPosition::new(2, 0, Direction::Down))
      .unwrap();

    expect_that!(
      board.anchor_points(),
      container_eq([
        GridPosition::new(0, 0, Direction::Down),
        GridPosition::new(1, 0, Direction::Down),
        GridPosition::new(2, 1, Direction::Across),
        GridPosition::new(2, 2, Direction::Across),
      ])
    );
  }

  #[gtest]
  fn test_first_word_must_be_in_dictionary() {
    let dict = dict();
    let board = Board::new(&dict);
    expect_true!(board.validate_placement("cat", GridPosition::new(0, 0, Direction::Across)));
    expect_false!(board.validate_placement("cta", GridPosition::new(0, 0, Direction::Across)));
    expect_false!(board.validate_placement("", GridPosition::new(0, 0, Direction::Across)));
  }

  #[gtest]
  fn test_rejects_letter_conflict() {
    let dict = dict();
    let mut board = Board::new(&dict);
    board
      .place_word("cat", GridPosition::new(0, 0, Direction::Across))
      .unwrap();
    // 'e' would land on the existing 'a'.
    expect_false!(board.validate_placement("eat", GridPosition::new(1, 0, Direction::Down)));
    expect_true!(board.validate_placement("art", GridPosition::new(1, 0, Direction::Down)));
  }

  #[gtest]
  fn test_rejects_disconnected_word() {
    let dict = dict();
    let mut board = Board::new(&dict);
    board
      .place_word("cat", GridPosition::new(0, 0, Direction::Across))
      .unwrap();
    expect_false!(board.validate_placement("tea", GridPosition::new(5, 5, Direction::Down)));
  }

  #[gtest]
  fn test_rejects_duplicate_word() {
    let dict = dict();
    let mut board = Board::new(&dict);
    board
      .place_word("tea", GridPosition::new(0, 0, Direction::Across))
      .unwrap();
    expect_false!(board.validate_placement("tea", GridPosition::new(0, 0, Direction::Down)));
  }

  #[gtest]
  fn test_rejects_same_direction_overlap() {
    let dict = dict();
    let mut board = Board::new(&dict);
    board
      .place_word("cat", GridPosition::new(0, 0, Direction::Across))
      .unwrap();
    expect_false!(board.validate_placement("cats", GridPosition::new(0, 0, Direction::Across)));
    // Would butt up against the 'c' and read "artcat".
    expect_false!(board.validate_placement("art", GridPosition::new(-3, 0, Direction::Across)));
  }

  #[gtest]
  fn test_rejects_invalid_side_run() {
    let dict = dict();
    let mut board = Board::new(&dict);
    board
      .place_word("cat", GridPosition::new(0, 0, Direction::Across))
      .unwrap();
    board
      .place_word("tea", GridPosition::new(2, 0, Direction::Down))
      .unwrap();
    // 'c' at (1, 1) would sit beside 'e' at (2, 1) and read "ce".
    expect_false!(board.validate_placement("act", GridPosition::new(1, 0, Direction::Down)));
  }

  #[gtest]
  fn test_accepts_valid_side_run() {
    let dict = WordList::from_words(["cat", "tea", "at", "ate", "ta"]).with_min_length(2);
    let mut board = Board::new(&dict);
    board
      .place_word("cat", GridPosition::new(0, 0, Direction::Across))
      .unwrap();
    board
      .place_word("tea", GridPosition::new(2, 0, Direction::Down))
      .unwrap();
    // "at" down through the 'a' of cat puts 't' at (1, 1), reading "te" across.
    expect_false!(board.validate_placement("at", GridPosition::new(1, 0, Direction::Down)));
    // "ate" across from (0, 2) would put its 'e' on tea's final 'a'.
    expect_false!(board.validate_placement("ate", GridPosition::new(0, 2, Direction::Across)));
    // "ta" across ending on tea's final 'a' forms only itself.
    expect_true!(board.validate_placement("ta", GridPosition::new(1, 2, Direction::Across)));
  }

  #[gtest]
  fn test_min_word_length_applies_to_cross_runs() {
    let dict = WordList::from_words(["abcd", "aexx", "cgyy", "bhzz", "ehg", "xzy"]);
    let build = |min_word_length| {
      let mut board = Board::with_min_word_length(&dict, min_word_length);
      board
        .place_word("abcd", GridPosition::new(0, 0, Direction::Across))
        .unwrap();
      board
        .place_word("aexx", GridPosition::new(0, 0, Direction::Down))
        .unwrap();
      board
        .place_word("cgyy", GridPosition::new(2, 0, Direction::Down))
        .unwrap();
      board
    };

    // "bhzz" down between the two columns reads "ehg" and "xzy" across.
    let bhzz = GridPosition::new(1, 0, Direction::Down);
    expect_true!(build(3).validate_placement("bhzz", bhzz));
    expect_false!(build(4).validate_placement("bhzz", bhzz));
    expect_false!(build(4).validate_placement("ehg", GridPosition::new(0, 1, Direction::Across)));
    expect_that!(build(1).min_word_length(), eq(2));
  }

  #[gtest]
  fn test_place_invalid_does_not_mutate() {
    let dict = dict();
    let mut board = Board::new(&dict);
    board
      .place_word("cat", GridPosition::new(0, 0, Direction::Across))
      .unwrap();
    let before = board.snapshot();

    let result = board.place_word("eat", GridPosition::new(1, 0, Direction::Down));
    expect_true!(result.is_err_and(|err| err.to_string().contains("Invalid placement")));
    expect_true!(board.snapshot() == before);
  }

  #[gtest]
  fn test_remove_restores_shared_cells() {
    let dict = dict();
    let mut board = Board::new(&dict);
    board
      .place_word("cat", GridPosition::new(0, 0, Direction::Across))
      .unwrap();
    let before = board.snapshot();

    board
      .place_word("tea", GridPosition::new(2, 0, Direction::Down))
      .unwrap();
    let freed = board.remove_word("tea", GridPosition::new(2, 0, Direction::Down));
    assert_that!(freed, ok(anything()));
    expect_that!(freed.unwrap().to_string().as_str(), eq("ae"));
    expect_true!(board.snapshot() == before);
  }

  #[gtest]
  fn test_remove_out_of_order() {
    let dict = dict();
    let mut board = Board::new(&dict);
    board
      .place_word("cat", GridPosition::new(0, 0, Direction::Across))
      .unwrap();
    board
      .place_word("tea", GridPosition::new(2, 0, Direction::Down))
      .unwrap();

    let freed = board
      .remove_word("cat", GridPosition::new(0, 0, Direction::Across))
      .unwrap();
    expect_that!(freed.to_string().as_str(), eq("ac"));
    expect_that!(board.letter_at(Pos { x: 2, y: 0 }), some(eq('t')));
    expect_that!(board.cell_count(), eq(3));
    expect_that!(board.words().len(), eq(1));
  }

  #[gtest]
  fn test_remove_unknown_word() {
    let dict = dict();
    let mut board = Board::new(&dict);
    expect_that!(
      board.remove_word("cat", GridPosition::new(0, 0, Direction::Across)),
      err(anything())
    );
  }

  #[gtest]
  fn test_fresh_letters() {
    let dict = dict();
    let mut board = Board::new(&dict);
    board
      .place_word("cat", GridPosition::new(0, 0, Direction::Across))
      .unwrap();
    let fresh = board.fresh_letters("art", GridPosition::new(1, 0, Direction::Down));
    expect_that!(fresh.map(|fresh| fresh.total()), some(eq(2)));
    expect_that!(
      board.fresh_letters("eat", GridPosition::new(1, 0, Direction::Down)),
      none()
    );
  }
}
