#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod args;
mod report;

use std::{
  borrow::Cow,
  fs::{self, File},
  io::{BufRead, BufReader},
  path::Path,
  process::ExitCode,
  time::Duration,
};

use args::{Args, Command, OutputFormat, SolveArgs, SolveMode};
use clap::Parser;
use env_logger::Env;
use log::info;
use qless_dict::{default_words, WordList, DEFAULT_MIN_LENGTH};
use qless_gen::{
  cover::find_letter_covers,
  dice::{roll_letters, DiceSet, FACES},
  layout::{check_layout, parse_layout},
  letter_pool::LetterPool,
  search::{PlacementSearch, SearchConfig},
};
use report::{SavedSolutions, SolveReport};
use util::{
  error::{QlessError, QlessResult},
  time::time_fn,
};

fn read_word_file(path: &Path, min_length: usize) -> QlessResult<WordList> {
  WordList::parse_word_file(
    BufReader::new(File::open(path)?)
      .lines()
      .collect::<Result<Vec<_>, _>>()?,
    min_length,
  )
}

/// Loads a `build-dict` output if the file ends in .bin, otherwise a plain
/// word list. Without a path, the built-in list is used. `size` keeps only
/// that many of the most frequent words.
fn load_dict(path: Option<&Path>, size: Option<usize>) -> QlessResult<Cow<'static, WordList>> {
  let dict = match path {
    None => Cow::Borrowed(default_words()?),
    Some(path) => {
      let dict = if path.extension().is_some_and(|ext| ext == "bin") {
        WordList::decode(&fs::read(path)?)?
      } else {
        read_word_file(path, DEFAULT_MIN_LENGTH)?
      };
      info!("Loaded {} words from {}", dict.len(), path.display());
      Cow::Owned(dict)
    }
  };

  Ok(match size {
    Some(size) => Cow::Owned(dict.truncated(size)),
    None => dict,
  })
}

/// Reads one die per non-blank line; whitespace between faces is ignored.
fn parse_dice(text: &str) -> QlessResult<DiceSet> {
  let dice = text
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty() && !line.starts_with('#'))
    .map(|line| {
      let faces: Vec<char> = line
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
      <[char; FACES]>::try_from(faces).map_err(|faces| {
        QlessError::Parse(format!(
          "Expected {FACES} faces per die, found {} in \"{line}\"",
          faces.len()
        ))
      })
    })
    .collect::<Result<Vec<_>, _>>()?;
  DiceSet::from_dice(dice)
}

fn normalize_letters(letters: &str) -> String {
  letters
    .chars()
    .filter(|c| !c.is_whitespace())
    .map(|c| c.to_ascii_lowercase())
    .collect()
}

fn roll(seed: Option<u64>) -> String {
  match seed {
    Some(seed) => DiceSet::standard().roll_seeded(seed),
    None => roll_letters(),
  }
}

fn roll_dice(
  dice: &DiceSet,
  seed: Option<u64>,
  faces: Option<&[usize]>,
) -> QlessResult<String> {
  match (faces, seed) {
    (Some(faces), _) => dice.roll_with_faces(faces),
    (None, Some(seed)) => Ok(dice.roll_seeded(seed)),
    (None, None) => Ok(dice.roll(&mut rand::rng())),
  }
}

fn search_config(args: &SolveArgs) -> SearchConfig {
  let defaults = SearchConfig::default();
  SearchConfig {
    min_word_length: args.min_word_length,
    max_nodes: args.max_nodes.or(defaults.max_nodes),
    time_limit: args.time_limit_ms.map(Duration::from_millis),
    max_starting_words: args.starting_words,
    max_solutions: args.top,
    ..defaults
  }
}

fn solve(args: &SolveArgs, letters: &str, dict: &WordList) -> QlessResult<SolveReport> {
  let pool = LetterPool::from_letters(letters)?;
  let search = PlacementSearch::new(dict, &pool, search_config(args));
  info!("{} candidate words for \"{letters}\"", search.index().len());

  match args.mode {
    SolveMode::Words => Ok(SolveReport::Words {
      letters: letters.to_owned(),
      words: search.index().ordered_words().map(str::to_owned).collect(),
    }),
    SolveMode::Covers => Ok(SolveReport::Covers {
      letters: letters.to_owned(),
      covers: find_letter_covers(search.index(), &pool, search.config())?,
    }),
    SolveMode::Grid => {
      let (elapsed, outcome) = time_fn(|| {
        if args.parallel {
          search.search_parallel(&pool)
        } else {
          search.search(&pool)
        }
      });
      let outcome = outcome?;
      info!("Search took {elapsed:?}");

      if let Some(path) = &args.save {
        let saved = SavedSolutions { letters: letters.to_owned(), solutions: outcome.solutions.clone() };
        fs::write(path, saved.encode())?;
        info!("Saved {} solutions to {}", saved.solutions.len(), path.display());
      }
      Ok(SolveReport::grid(letters, &outcome, args.top))
    }
  }
}

fn check(letters: &str, layout: &Path, dict: &WordList, min_word_length: usize) -> QlessResult {
  let target = LetterPool::from_letters(&normalize_letters(letters))?;
  let grid = parse_layout(&fs::read_to_string(layout)?)?;
  let issues = check_layout(target.original(), &grid, dict, min_word_length);
  if issues.is_empty() {
    println!("valid layout");
    return Ok(());
  }

  for issue in &issues {
    println!("{issue}");
  }
  Err(QlessError::InvalidPlacement(format!("layout has {} problems", issues.len())).into())
}

fn build_dict(
  input: &Path,
  output: &Path,
  min_length: usize,
  size: Option<usize>,
) -> QlessResult {
  let (elapsed, dict) = time_fn(|| read_word_file(input, min_length));
  let dict = match size {
    Some(size) => dict?.truncated(size),
    None => dict?,
  };
  fs::write(output, dict.encode())?;
  println!(
    "Wrote {} words to {} in {elapsed:?}",
    dict.len(),
    output.display()
  );
  Ok(())
}

fn show(path: &Path) -> QlessResult {
  let saved = SavedSolutions::decode(&fs::read(path)?)?;
  println!("letters: {}", saved.letters);
  for (rank, solution) in saved.solutions.iter().enumerate() {
    println!();
    println!("#{} score {:.3}", rank + 1, solution.score());
    print!("{solution}");
  }
  Ok(())
}

fn run(args: Args) -> QlessResult {
  match args.command {
    Command::Solve(solve_args) => {
      let dict = load_dict(solve_args.dict.as_deref(), solve_args.dict_size)?;
      let letters = match &solve_args.letters {
        Some(letters) => normalize_letters(letters),
        None => roll(solve_args.seed),
      };
      let report = solve(&solve_args, &letters, &dict)?;
      match solve_args.format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", report.to_json()?),
      }
    }
    Command::Roll { seed, faces, dice, frequency } => {
      let dice = match dice {
        Some(path) => parse_dice(&fs::read_to_string(path)?)?,
        None => DiceSet::standard(),
      };
      println!("{}", roll_dice(&dice, seed, faces.as_deref())?);
      if frequency {
        for (letter, count) in dice.letter_frequency().iter() {
          println!("{letter} {count}");
        }
      }
    }
    Command::Check { letters, layout, dict, dict_size, min_word_length } => {
      let dict = load_dict(dict.as_deref(), dict_size)?;
      check(&letters, &layout, &dict, min_word_length)?;
    }
    Command::BuildDict { input, output, min_word_length, dict_size } => {
      build_dict(&input, &output, min_word_length, dict_size)?;
    }
    Command::Show { file } => show(&file)?,
  }
  Ok(())
}

fn main() -> ExitCode {
  let args = Args::parse();
  let default_filter = if args.verbose { "debug" } else { "warn" };
  env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

  if let Err(err) = run(args) {
    eprintln!("Error: {err}");
    ExitCode::FAILURE
  } else {
    ExitCode::SUCCESS
  }
}
