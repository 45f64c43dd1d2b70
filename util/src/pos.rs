use std::{
  fmt::Display,
  ops::{Add, AddAssign, Mul, Sub, SubAssign},
};

use bitcode::{Decode, Encode};

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Encode, Decode)]
pub struct Pos {
  pub x: i32,
  pub y: i32,
}

impl Pos {
  pub const fn zero() -> Self {
    Self { x: 0, y: 0 }
  }

  pub const fn transpose(&self) -> Self {
    Self { x: self.y, y: self.x }
  }

  /// Row-major ordering key, top row first.
  pub const fn row_major(&self) -> (i32, i32) {
    (self.y, self.x)
  }
}

impl Sub for Pos {
  type Output = Diff;

  fn sub(self, rhs: Self) -> Diff {
    Diff { x: self.x - rhs.x, y: self.y - rhs.y }
  }
}

impl Sub<Diff> for Pos {
  type Output = Self;

  fn sub(self, rhs: Diff) -> Self {
    Self { x: self.x - rhs.x, y: self.y - rhs.y }
  }
}

impl SubAssign<Diff> for Pos {
  fn sub_assign(&mut self, rhs: Diff) {
    self.x -= rhs.x;
    self.y -= rhs.y;
  }
}

impl Add<Diff> for Pos {
  type Output = Self;

  fn add(self, rhs: Diff) -> Self {
    Self { x: self.x + rhs.x, y: self.y + rhs.y }
  }
}

impl AddAssign<Diff> for Pos {
  fn add_assign(&mut self, rhs: Diff) {
    self.x += rhs.x;
    self.y += rhs.y;
  }
}

impl Display for Pos {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Diff {
  pub x: i32,
  pub y: i32,
}

impl Diff {
  pub const DX: Self = Self { x: 1, y: 0 };
  pub const DY: Self = Self { x: 0, y: 1 };
}

impl Mul<Diff> for i32 {
  type Output = Diff;

  fn mul(self, rhs: Diff) -> Diff {
    Diff { x: self * rhs.x, y: self * rhs.y }
  }
}

/// Orientation of a word on the board. Across words grow in +x, down words in
/// +y.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Encode, Decode)]
pub enum Direction {
  Across,
  Down,
}

impl Direction {
  pub const fn step(self) -> Diff {
    match self {
      Direction::Across => Diff::DX,
      Direction::Down => Diff::DY,
    }
  }

  pub const fn perpendicular(self) -> Self {
    match self {
      Direction::Across => Direction::Down,
      Direction::Down => Direction::Across,
    }
  }
}

impl Display for Direction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}",
      match self {
        Direction::Across => "across",
        Direction::Down => "down",
      }
    )
  }
}

#[cfg(test)]
mod tests {
  use googletest::prelude::*;

  use super::{Diff, Direction, Pos};

  #[gtest]
  fn test_walk_direction() {
    let start = Pos { x: -2, y: 3 };
    expect_that!(start + 3 * Direction::Across.step(), eq(Pos { x: 1, y: 3 }));
    expect_that!(start + 3 * Direction::Down.step(), eq(Pos { x: -2, y: 6 }));
    expect_that!(start - Diff::DY, eq(Pos { x: -2, y: 2 }));
  }

  #[gtest]
  fn test_perpendicular() {
    expect_that!(Direction::Across.perpendicular(), eq(Direction::Down));
    expect_that!(Direction::Down.perpendicular(), eq(Direction::Across));
  }

  #[gtest]
  fn test_pos_difference() {
    let diff = Pos { x: 4, y: 1 } - Pos { x: 1, y: 3 };
    expect_that!(diff, eq(Diff { x: 3, y: -2 }));
  }
}
