use std::{
  collections::{HashSet, VecDeque},
  fmt::Display,
};

use qless_dict::WordSource;
use util::{
  error::{QlessError, QlessResult},
  grid::{Grid, Gridlike},
  letters::LetterCounts,
  pos::{Diff, Direction, Pos},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutIssue {
  /// Pool letters that do not appear on the grid.
  MissingLetters(LetterCounts),
  /// Grid letters the pool cannot supply.
  ExtraLetters(LetterCounts),
  InvalidWord { word: String, pos: Pos, direction: Direction },
  Disconnected { groups: usize },
}

impl Display for LayoutIssue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::MissingLetters(letters) => write!(f, "unused letters: {letters}"),
      Self::ExtraLetters(letters) => write!(f, "letters not in the pool: {letters}"),
      Self::InvalidWord { word, pos, direction } => {
        write!(f, "\"{word}\" at ({}, {}) {direction} is not a word", pos.x, pos.y)
      }
      Self::Disconnected { groups } => write!(f, "letters form {groups} separate groups"),
    }
  }
}

/// Parses a hand-written layout. Letters fill cells, '.' and '_' are empty
/// cells, and whitespace is skipped. Short rows are padded with empty cells.
pub fn parse_layout(text: &str) -> QlessResult<Grid<Option<char>>> {
  let rows = text
    .lines()
    .enumerate()
    .map(|(line_no, line)| {
      line
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
          '.' | '_' => Ok(None),
          c if c.is_ascii_alphabetic() => Ok(Some(c.to_ascii_lowercase())),
          c => Err(QlessError::Parse(format!(
            "Unexpected character '{c}' on line {}",
            line_no + 1
          ))),
        })
        .collect::<Result<Vec<_>, _>>()
    })
    .filter(|row| row.as_ref().map_or(true, |row| !row.is_empty()))
    .collect::<Result<Vec<_>, _>>()?;

  if rows.is_empty() {
    return Err(QlessError::Parse("Layout has no cells".to_owned()).into());
  }
  Grid::from_rows(rows)
}

/// Runs of two or more consecutive letters along each row, with the position
/// of their first letter.
fn row_runs<G: Gridlike<Option<char>>>(grid: &G) -> Vec<(Pos, String)> {
  struct LetterRuns<I> {
    x: i32,
    y: i32,
    iter: I,
  }

  impl<I> Iterator for LetterRuns<I>
  where
    I: Iterator<Item = Option<char>>,
  {
    type Item = (Pos, String);

    fn next(&mut self) -> Option<(Pos, String)> {
      loop {
        let first = loop {
          let cell = self.iter.next()?;
          self.x += 1;
          if let Some(letter) = cell {
            break letter;
          }
        };
        let pos = Pos { x: self.x - 1, y: self.y };

        let mut word = String::from(first);
        for cell in self.iter.by_ref() {
          self.x += 1;
          match cell {
            Some(letter) => word.push(letter),
            None => break,
          }
        }

        if word.len() >= 2 {
          return Some((pos, word));
        }
      }
    }
  }

  (0..grid.height())
    .flat_map(|y| LetterRuns { x: 0, y: y as i32, iter: grid.iter_row(y).cloned() })
    .collect()
}

/// Every across and down run of two or more letters.
pub fn word_runs(grid: &Grid<Option<char>>) -> Vec<(Pos, Direction, String)> {
  let across = row_runs(grid)
    .into_iter()
    .map(|(pos, word)| (pos, Direction::Across, word));
  let down = row_runs(&grid.transpose())
    .into_iter()
    .map(|(pos, word)| (pos.transpose(), Direction::Down, word));
  across.chain(down).collect()
}

fn connected_groups(grid: &Grid<Option<char>>) -> usize {
  let filled = |pos: Pos| grid.get(pos).is_some_and(Option::is_some);
  let mut seen = HashSet::new();
  let mut groups = 0;

  for start in grid.positions().filter(|&pos| filled(pos)) {
    if !seen.insert(start) {
      continue;
    }
    groups += 1;
    let mut frontier = VecDeque::from([start]);
    while let Some(pos) = frontier.pop_front() {
      for neighbor in [pos + Diff::DX, pos - Diff::DX, pos + Diff::DY, pos - Diff::DY] {
        if filled(neighbor) && seen.insert(neighbor) {
          frontier.push_back(neighbor);
        }
      }
    }
  }
  groups
}

/// Checks that `layout` uses exactly the letters in `target`, that every run
/// of letters is a word of at least `min_word_length` letters, and that all
/// letters hang together. An empty result means the layout is a solution.
pub fn check_layout<D>(
  target: &LetterCounts,
  layout: &Grid<Option<char>>,
  dict: &D,
  min_word_length: usize,
) -> Vec<LayoutIssue>
where
  D: WordSource + ?Sized,
{
  let mut on_grid = LetterCounts::new();
  let mut issues = Vec::new();
  for letter in layout.positions().filter_map(|pos| layout.get(pos).copied().flatten()) {
    on_grid.insert(letter);
  }

  let missing = target.saturating_sub(&on_grid);
  if !missing.is_empty() {
    issues.push(LayoutIssue::MissingLetters(missing));
  }
  let extra = on_grid.saturating_sub(target);
  if !extra.is_empty() {
    issues.push(LayoutIssue::ExtraLetters(extra));
  }

  issues.extend(
    word_runs(layout)
      .into_iter()
      .filter(|(_, _, word)| word.chars().count() < min_word_length || !dict.contains(word))
      .map(|(pos, direction, word)| LayoutIssue::InvalidWord { word, pos, direction }),
  );

  let groups = connected_groups(layout);
  if groups > 1 {
    issues.push(LayoutIssue::Disconnected { groups });
  }
  issues
}
