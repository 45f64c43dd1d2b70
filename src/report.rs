use std::fmt::Display;

use bitcode::{Decode, Encode};
use qless_gen::{search::SearchOutcome, solution::GridSolution};
use serde::Serialize;
use util::error::QlessResult;

#[derive(Serialize, Debug)]
pub struct PlacedWordReport {
  pub word: String,
  pub x: i32,
  pub y: i32,
  pub direction: String,
}

#[derive(Serialize, Debug)]
pub struct SolutionReport {
  pub score: f64,
  pub words: Vec<PlacedWordReport>,
  pub unused: String,
  /// The layout, one string per row with '.' for empty cells.
  pub rows: Vec<String>,
}

impl SolutionReport {
  pub fn new(solution: &GridSolution) -> Self {
    let grid = solution.to_grid();
    Self {
      score: solution.score(),
      words: solution
        .words()
        .iter()
        .map(|placed| PlacedWordReport {
          word: placed.word.clone(),
          x: placed.position.pos.x,
          y: placed.position.pos.y,
          direction: placed.position.direction.to_string(),
        })
        .collect(),
      unused: solution.remaining().to_string(),
      rows: grid
        .rows()
        .map(|row| row.iter().map(|cell| cell.unwrap_or('.')).collect())
        .collect(),
    }
  }
}

#[derive(Serialize, Debug)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum SolveReport {
  Grid {
    letters: String,
    status: String,
    nodes: u64,
    solutions: Vec<SolutionReport>,
  },
  Covers {
    letters: String,
    covers: Vec<Vec<String>>,
  },
  Words {
    letters: String,
    words: Vec<String>,
  },
}

impl SolveReport {
  pub fn grid(letters: &str, outcome: &SearchOutcome, top: usize) -> Self {
    SolveReport::Grid {
      letters: letters.to_owned(),
      status: outcome.status.to_string(),
      nodes: outcome.nodes,
      solutions: outcome.solutions.iter().take(top).map(SolutionReport::new).collect(),
    }
  }

  pub fn to_json(&self) -> QlessResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

impl Display for SolveReport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SolveReport::Grid { letters, status, nodes, solutions } => {
        writeln!(f, "letters: {letters}")?;
        writeln!(f, "search {status} after {nodes} nodes")?;
        if solutions.is_empty() {
          return writeln!(f, "no layouts found");
        }
        for (rank, solution) in solutions.iter().enumerate() {
          writeln!(f)?;
          write!(f, "#{} score {:.3}", rank + 1, solution.score)?;
          if solution.unused.is_empty() {
            writeln!(f, ", all letters used")?;
          } else {
            writeln!(f, ", unused {}", solution.unused)?;
          }
          for row in &solution.rows {
            writeln!(f, "{row}")?;
          }
        }
        Ok(())
      }
      SolveReport::Covers { letters, covers } => {
        writeln!(f, "letters: {letters}")?;
        if covers.is_empty() {
          return writeln!(f, "no word sets use every letter");
        }
        for cover in covers {
          writeln!(f, "{}", cover.join(" "))?;
        }
        Ok(())
      }
      SolveReport::Words { letters, words } => {
        writeln!(f, "letters: {letters}")?;
        writeln!(f, "{} words", words.len())?;
        for word in words {
          writeln!(f, "{word}")?;
        }
        Ok(())
      }
    }
  }
}

/// Grid solutions written by `solve --save` and read back by `show`.
#[derive(Debug, Encode, Decode)]
pub struct SavedSolutions {
  pub letters: String,
  pub solutions: Vec<GridSolution>,
}

impl SavedSolutions {
  pub fn encode(&self) -> Vec<u8> {
    bitcode::encode(self)
  }

  pub fn decode(bytes: &[u8]) -> QlessResult<Self> {
    Ok(bitcode::decode(bytes)?)
  }
}
