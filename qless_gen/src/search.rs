use std::{
  collections::HashSet,
  fmt::Display,
  sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
  },
  time::{Duration, Instant},
};

use log::{debug, trace};
use qless_dict::WordSource;
use rayon::prelude::*;
use util::{error::QlessResult, pos::Direction};

use crate::{
  board::{Board, GridPosition},
  candidates::{Candidate, CandidateIndex},
  letter_pool::LetterPool,
  scorer::{ScoreWeights, SolutionScorer},
  solution::GridSolution,
};

#[derive(Clone, Debug)]
pub struct SearchConfig {
  pub min_word_length: usize,
  /// Stop after visiting this many board states.
  pub max_nodes: Option<u64>,
  pub time_limit: Option<Duration>,
  /// Only this many of the best candidates are tried as the first word.
  pub max_starting_words: usize,
  /// How many ranked solutions to keep.
  pub max_solutions: usize,
  pub weights: ScoreWeights,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      min_word_length: 3,
      max_nodes: Some(250_000),
      time_limit: None,
      max_starting_words: 10,
      max_solutions: 10,
      weights: ScoreWeights::default(),
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStatus {
  /// Every branch within the starting-word cap was explored.
  Complete,
  BudgetExhausted,
  Cancelled,
}

impl SearchStatus {
  fn merge(self, other: Self) -> Self {
    match (self, other) {
      (SearchStatus::Cancelled, _) | (_, SearchStatus::Cancelled) => SearchStatus::Cancelled,
      (SearchStatus::BudgetExhausted, _) | (_, SearchStatus::BudgetExhausted) => {
        SearchStatus::BudgetExhausted
      }
      _ => SearchStatus::Complete,
    }
  }
}

impl Display for SearchStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SearchStatus::Complete => write!(f, "complete"),
      SearchStatus::BudgetExhausted => write!(f, "budget exhausted"),
      SearchStatus::Cancelled => write!(f, "cancelled"),
    }
  }
}

#[derive(Clone, Debug)]
pub struct SearchOutcome {
  /// Best first.
  pub solutions: Vec<GridSolution>,
  pub status: SearchStatus,
  pub nodes: u64,
}

struct Budget<'s> {
  nodes: &'s AtomicU64,
  max_nodes: Option<u64>,
  deadline: Option<Instant>,
  cancel: Option<&'s AtomicBool>,
}

impl Budget<'_> {
  /// Counts one visited node, returning the reason to stop if there is one.
  fn tick(&self) -> Option<SearchStatus> {
    if self.cancel.is_some_and(|cancel| cancel.load(Ordering::Relaxed)) {
      return Some(SearchStatus::Cancelled);
    }

    let nodes = self.nodes.fetch_add(1, Ordering::Relaxed) + 1;
    if self.max_nodes.is_some_and(|max_nodes| nodes > max_nodes)
      || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    {
      return Some(SearchStatus::BudgetExhausted);
    }
    None
  }
}

/// Keeps the best distinct layouts found so far. Only layouts still held are
/// remembered, so memory stays proportional to `limit`.
struct Collector {
  scorer: SolutionScorer,
  limit: usize,
  seen: HashSet<Vec<(i32, i32, char)>>,
  solutions: Vec<GridSolution>,
}

impl Collector {
  fn new(scorer: SolutionScorer, limit: usize) -> Self {
    Self { scorer, limit, seen: HashSet::new(), solutions: Vec::new() }
  }

  fn offer(&mut self, solution: GridSolution) {
    if !self.seen.insert(solution.layout_key()) {
      return;
    }
    self.solutions.push(solution);
    if self.solutions.len() > 2 * self.limit.max(1) {
      self.scorer.rank(&mut self.solutions);
      self.solutions.truncate(self.limit);
      self.seen = self.solutions.iter().map(GridSolution::layout_key).collect();
    }
  }

  fn absorb(&mut self, other: Collector) {
    for solution in other.solutions {
      self.offer(solution);
    }
  }

  fn finish(mut self) -> Vec<GridSolution> {
    self.scorer.rank(&mut self.solutions);
    self.solutions.truncate(self.limit);
    self.solutions
  }
}

/// Start positions placing `word` through `anchor`: one per offset where the
/// word's letter matches the anchor cell. On an empty board the anchor is
/// the start itself.
fn positions_through(
  anchor: GridPosition,
  anchor_letter: Option<char>,
  word: &str,
) -> impl Iterator<Item = GridPosition> + '_ {
  let step = anchor.direction.step();
  word
    .chars()
    .enumerate()
    .filter_map(move |(offset, letter)| match anchor_letter {
      None => (offset == 0).then_some(anchor),
      Some(anchor_letter) => (anchor_letter == letter).then(|| GridPosition {
        pos: anchor.pos - offset as i32 * step,
        direction: anchor.direction,
      }),
    })
}

/// One depth-first walk over a single board and pool. Every placement is
/// undone before its next sibling is tried, so the board and pool come back
/// exactly as they went in.
struct Explorer<'s, 'a, D: ?Sized> {
  index: &'s CandidateIndex,
  config: &'s SearchConfig,
  scorer: SolutionScorer,
  budget: Budget<'s>,
  board: &'s mut Board<'a, D>,
  pool: &'s mut LetterPool,
  used: Vec<bool>,
  collector: Collector,
  stopped: Option<SearchStatus>,
}

impl<D> Explorer<'_, '_, D>
where
  D: WordSource + ?Sized,
{
  /// Fewest tiles any further word could put down. Every word after the first
  /// reuses at least one tile already on the board.
  fn min_fresh_letters(&self) -> usize {
    if self.board.is_empty() {
      self.config.min_word_length.max(1)
    } else {
      self.config.min_word_length.saturating_sub(1).max(1)
    }
  }

  fn explore(&mut self) -> QlessResult {
    if let Some(status) = self.budget.tick() {
      self.stopped = Some(status);
      return Ok(());
    }
    if self.pool.remaining_total() < self.min_fresh_letters() {
      self.record();
      return Ok(());
    }

    let index = self.index;
    let word_limit = if self.board.is_empty() {
      self.config.max_starting_words.min(index.len())
    } else {
      index.len()
    };

    let mut extended = false;
    let mut tried = HashSet::new();
    for anchor in self.board.anchor_points() {
      let anchor_letter = self.board.letter_at(anchor.pos);
      for (idx, candidate) in index.candidates()[..word_limit].iter().enumerate() {
        if self.used[idx] {
          continue;
        }
        for position in positions_through(anchor, anchor_letter, candidate.word()) {
          // A word crossing several placed words is reachable from each of them.
          if !tried.insert((idx, position)) {
            continue;
          }
          extended |= self.try_place(idx, candidate, position)?;
          if self.stopped.is_some() {
            return Ok(());
          }
        }
      }
    }

    if !extended {
      self.record();
    }
    Ok(())
  }

  /// Places `candidate` at `position` if it is affordable and valid, explores
  /// the resulting state, then takes it back off. Returns whether the word
  /// could be placed.
  fn try_place(
    &mut self,
    idx: usize,
    candidate: &Candidate,
    position: GridPosition,
  ) -> QlessResult<bool> {
    let word = candidate.word();
    let Some(fresh) = self.board.fresh_letters(word, position) else {
      return Ok(false);
    };
    if !self.pool.can_afford_counts(&fresh) || !self.board.validate_placement(word, position) {
      return Ok(false);
    }

    let placed = self.board.place_word(word, position)?;
    self.pool.consume_counts(&placed)?;
    self.used[idx] = true;

    let result = self.explore();

    self.used[idx] = false;
    let freed = self.board.remove_word(word, position)?;
    self.pool.release_counts(&freed)?;
    result.map(|()| true)
  }

  fn record(&mut self) {
    if self.board.is_empty() {
      return;
    }
    let solution = GridSolution::from_board(self.board, self.pool);
    let score = self.scorer.score(&solution);
    trace!(
      "Found {} word layout with {} letters left, score {score:.3}",
      solution.word_count(),
      solution.unused_count()
    );
    self.collector.offer(solution.with_score(score));
  }
}

/// Backtracking search for word layouts over one letter pool.
pub struct PlacementSearch<'a, D: ?Sized> {
  dict: &'a D,
  index: CandidateIndex,
  config: SearchConfig,
  scorer: SolutionScorer,
  cancel: Option<Arc<AtomicBool>>,
}

impl<'a, D> PlacementSearch<'a, D>
where
  D: WordSource + ?Sized,
{
  pub fn new(dict: &'a D, pool: &LetterPool, config: SearchConfig) -> Self {
    let index = CandidateIndex::build(dict, pool, config.min_word_length);
    let scorer = SolutionScorer::new(config.weights);
    Self { dict, index, config, scorer, cancel: None }
  }

  /// Stops the search at the next visited node once `cancel` is set.
  pub fn with_cancel_flag(self, cancel: Arc<AtomicBool>) -> Self {
    Self { cancel: Some(cancel), ..self }
  }

  pub fn index(&self) -> &CandidateIndex {
    &self.index
  }

  pub fn config(&self) -> &SearchConfig {
    &self.config
  }

  fn budget<'s>(&'s self, nodes: &'s AtomicU64, started: Instant) -> Budget<'s> {
    Budget {
      nodes,
      max_nodes: self.config.max_nodes,
      deadline: self.config.time_limit.map(|limit| started + limit),
      cancel: self.cancel.as_deref(),
    }
  }

  fn explorer<'s>(
    &'s self,
    budget: Budget<'s>,
    board: &'s mut Board<'a, D>,
    pool: &'s mut LetterPool,
  ) -> Explorer<'s, 'a, D> {
    Explorer {
      index: &self.index,
      config: &self.config,
      scorer: self.scorer,
      budget,
      board,
      pool,
      used: vec![false; self.index.len()],
      collector: Collector::new(self.scorer, self.config.max_solutions),
      stopped: None,
    }
  }

  pub fn search(&self, pool: &LetterPool) -> QlessResult<SearchOutcome> {
    let mut board = Board::with_min_word_length(self.dict, self.config.min_word_length);
    let mut pool = pool.clone();
    self.search_from(&mut board, &mut pool)
  }

  /// Searches onward from an existing board. `board` and `pool` are left
  /// exactly as they were passed in. New words and the runs they form must be
  /// at least as long as both the board's and the configured minimum.
  pub fn search_from(
    &self,
    board: &mut Board<'a, D>,
    pool: &mut LetterPool,
  ) -> QlessResult<SearchOutcome> {
    let min_word_length = board.min_word_length();
    board.set_min_word_length(min_word_length.max(self.config.min_word_length));
    let outcome = self.explore_from(board, pool);
    board.set_min_word_length(min_word_length);
    outcome
  }

  fn explore_from(
    &self,
    board: &mut Board<'a, D>,
    pool: &mut LetterPool,
  ) -> QlessResult<SearchOutcome> {
    debug!(
      "Searching {} candidate words over letters \"{pool}\"",
      self.index.len()
    );
    let nodes = AtomicU64::new(0);
    let mut explorer = self.explorer(self.budget(&nodes, Instant::now()), board, pool);
    explorer.explore()?;

    let status = explorer.stopped.unwrap_or(SearchStatus::Complete);
    let outcome = SearchOutcome {
      solutions: explorer.collector.finish(),
      status,
      nodes: nodes.load(Ordering::Relaxed),
    };
    debug!(
      "Search finished ({:?}) after {} nodes with {} solutions",
      outcome.status,
      outcome.nodes,
      outcome.solutions.len()
    );
    Ok(outcome)
  }

  /// Like `search`, but each starting word is explored on its own thread with
  /// a private board and pool. The node budget and cancel flag are shared.
  pub fn search_parallel(&self, pool: &LetterPool) -> QlessResult<SearchOutcome>
  where
    D: Sync,
  {
    let started = Instant::now();
    let nodes = AtomicU64::new(0);
    if let Some(status) = self.budget(&nodes, started).tick() {
      return Ok(SearchOutcome { solutions: Vec::new(), status, nodes: nodes.load(Ordering::Relaxed) });
    }

    let root = Board::with_min_word_length(self.dict, self.config.min_word_length);
    let origin = GridPosition::new(0, 0, Direction::Across);
    let starting_words = self.config.max_starting_words.min(self.index.len());
    debug!("Searching {starting_words} starting words in parallel over \"{pool}\"");

    let branches = self.index.candidates()[..starting_words]
      .par_iter()
      .enumerate()
      .map(|(idx, candidate)| -> QlessResult<_> {
        let mut board = root.clone();
        let mut pool = pool.clone();
        let mut explorer = self.explorer(self.budget(&nodes, started), &mut board, &mut pool);
        explorer.try_place(idx, candidate, origin)?;
        Ok((explorer.collector, explorer.stopped))
      })
      .collect::<QlessResult<Vec<_>>>()?;

    let mut collector = Collector::new(self.scorer, self.config.max_solutions);
    let mut status = SearchStatus::Complete;
    for (branch, stopped) in branches {
      collector.absorb(branch);
      status = status.merge(stopped.unwrap_or(SearchStatus::Complete));
    }

    let outcome = SearchOutcome {
      solutions: collector.finish(),
      status,
      nodes: nodes.load(Ordering::Relaxed),
    };
    debug!(
      "Parallel search finished ({:?}) after {} nodes with {} solutions",
      outcome.status,
      outcome.nodes,
      outcome.solutions.len()
    );
    Ok(outcome)
  }
}
