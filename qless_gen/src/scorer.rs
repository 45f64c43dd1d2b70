use crate::solution::GridSolution;

/// Relative cost of each solution property. Lower scores are better.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreWeights {
  pub unused_letter: f64,
  pub word: f64,
  pub compactness: f64,
}

impl Default for ScoreWeights {
  fn default() -> Self {
    Self { unused_letter: 1., word: 2., compactness: 1. }
  }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SolutionScorer {
  weights: ScoreWeights,
}

impl SolutionScorer {
  pub fn new(weights: ScoreWeights) -> Self {
    Self { weights }
  }

  /// Filled cells per bounding-box cell, in (0, 1]. Zero for an empty layout.
  pub fn compactness(solution: &GridSolution) -> f64 {
    match solution.bounding_area() {
      0 => 0.,
      area => solution.cells().len() as f64 / area as f64,
    }
  }

  pub fn score(&self, solution: &GridSolution) -> f64 {
    self.weights.unused_letter * solution.unused_count() as f64
      + self.weights.word * solution.word_count() as f64
      - self.weights.compactness * Self::compactness(solution)
  }

  /// Sorts best first. The sort is stable, so equal scores keep the order
  /// they were found in.
  pub fn rank(&self, solutions: &mut [GridSolution]) {
    solutions.sort_by(|a, b| self.score(a).total_cmp(&self.score(b)));
  }
}
