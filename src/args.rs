use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolveMode {
  /// Connected crossword layouts.
  Grid,
  /// Word sets that spell every letter, ignoring the grid.
  Covers,
  /// Every word the letters can spell.
  Words,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
  Text,
  Json,
}

#[derive(Parser, Debug)]
#[command(name = "qless", version, about = "Solves Q-Less letter dice rolls", long_about = None)]
pub struct Args {
  /// Log search progress to stderr.
  #[arg(long, short, global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Find word layouts for a set of letters.
  Solve(SolveArgs),

  /// Roll the twelve Q-Less dice.
  Roll {
    #[arg(long)]
    seed: Option<u64>,

    /// Read off these face indices (0-5), one per die, instead of rolling.
    #[arg(long, value_delimiter = ',', conflicts_with = "seed")]
    faces: Option<Vec<usize>>,

    /// Dice file with one die per line, six letters each.
    #[arg(long)]
    dice: Option<PathBuf>,

    /// Also print how many faces show each letter.
    #[arg(long)]
    frequency: bool,
  },

  /// Check a hand-built layout against a set of letters.
  Check {
    #[arg(long)]
    letters: String,

    /// Text file with one row per line, '.' for empty cells.
    #[arg(long)]
    layout: PathBuf,

    #[arg(long)]
    dict: Option<PathBuf>,

    /// Keep only this many of the most frequent dictionary words.
    #[arg(long)]
    dict_size: Option<usize>,

    #[arg(long, default_value_t = 3)]
    min_word_length: usize,
  },

  /// Compile a text word list into the binary dictionary format.
  BuildDict {
    #[arg(long)]
    input: PathBuf,

    #[arg(long)]
    output: PathBuf,

    #[arg(long, default_value_t = 3)]
    min_word_length: usize,

    /// Keep only this many of the most frequent words.
    #[arg(long)]
    dict_size: Option<usize>,
  },

  /// Print solutions saved by `solve --save`.
  Show { file: PathBuf },
}

#[derive(clap::Args, Debug)]
pub struct SolveArgs {
  /// Letters to solve. A fresh dice roll is used if omitted.
  #[arg(long)]
  pub letters: Option<String>,

  /// Seed for the dice roll when no letters are given.
  #[arg(long)]
  pub seed: Option<u64>,

  #[arg(long, default_value = "grid")]
  pub mode: SolveMode,

  #[arg(long, default_value_t = 3)]
  pub min_word_length: usize,

  /// Stop after visiting this many board states.
  #[arg(long)]
  pub max_nodes: Option<u64>,

  #[arg(long)]
  pub time_limit_ms: Option<u64>,

  /// How many of the best candidate words to try as the first word.
  #[arg(long, default_value_t = 10)]
  pub starting_words: usize,

  /// Number of results to print.
  #[arg(long, default_value_t = 5)]
  pub top: usize,

  /// Explore starting words on separate threads.
  #[arg(long)]
  pub parallel: bool,

  /// Word list, either plain text or built with `build-dict` (.bin).
  #[arg(long)]
  pub dict: Option<PathBuf>,

  /// Keep only this many of the most frequent dictionary words.
  #[arg(long)]
  pub dict_size: Option<usize>,

  #[arg(long, default_value = "text")]
  pub format: OutputFormat,

  /// Write the grid solutions to this file.
  #[arg(long)]
  pub save: Option<PathBuf>,
}
