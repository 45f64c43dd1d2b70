use std::fmt::Display;

use bitcode::{Decode, Encode};

use crate::{
  error::{QlessError, QlessResult},
  pos::Pos,
};

/// Read access to a rectangular grid rooted at (0, 0).
pub trait Gridlike<T> {
  fn width(&self) -> u32;
  fn height(&self) -> u32;

  fn get(&self, pos: Pos) -> Option<&T>;

  fn iter_row<'a, 'b>(&'a self, y: u32) -> impl Iterator<Item = &'b T>
  where
    'a: 'b,
    T: 'a;
  fn iter_col<'a, 'b>(&'a self, x: u32) -> impl Iterator<Item = &'b T>
  where
    'a: 'b,
    T: 'a;
}

/// Row-major dense grid.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct Grid<T> {
  cells: Vec<T>,
  width: u32,
  height: u32,
}

impl<T> Grid<T> {
  pub fn from_vec(cells: Vec<T>, width: u32, height: u32) -> QlessResult<Self> {
    let expected_size = width as usize * height as usize;
    if cells.len() != expected_size {
      return Err(
        QlessError::Internal(format!(
          "Expected {width}x{height} grid to hold {expected_size} cells, found {}",
          cells.len()
        ))
        .into(),
      );
    }

    Ok(Self { cells, width, height })
  }

  pub fn in_bounds(&self, pos: Pos) -> bool {
    (0..self.width as i32).contains(&pos.x) && (0..self.height as i32).contains(&pos.y)
  }

  fn idx(&self, pos: Pos) -> Option<usize> {
    self
      .in_bounds(pos)
      .then(|| pos.x as usize + pos.y as usize * self.width as usize)
  }

  pub fn get_mut(&mut self, pos: Pos) -> Option<&mut T> {
    self.idx(pos).and_then(|idx| self.cells.get_mut(idx))
  }

  pub fn positions(&self) -> impl Iterator<Item = Pos> {
    let width = self.width as i32;
    (0..self.height as i32).flat_map(move |y| (0..width).map(move |x| Pos { x, y }))
  }

  pub fn rows(&self) -> impl Iterator<Item = &[T]> {
    self.cells.chunks(self.width.max(1) as usize)
  }

  pub fn map<F, U>(&self, f: F) -> Grid<U>
  where
    F: FnMut(&T) -> U,
  {
    Grid {
      cells: self.cells.iter().map(f).collect(),
      width: self.width,
      height: self.height,
    }
  }

  /// Columns-as-rows view, so row scans can be reused for columns.
  pub fn transpose(&self) -> TransposeGrid<'_, T> {
    TransposeGrid { grid: self }
  }
}

impl<T> Grid<T>
where
  T: Default,
{
  pub fn new(width: u32, height: u32) -> Self {
    Self {
      cells: (0..width * height).map(|_| T::default()).collect(),
      width,
      height,
    }
  }

  /// Builds a grid from rows of any length, padding short rows out to the
  /// longest with `T::default()`.
  pub fn from_rows(rows: Vec<Vec<T>>) -> QlessResult<Self> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let height = rows.len();
    let cells = rows
      .into_iter()
      .flat_map(|mut row| {
        row.resize_with(width, T::default);
        row
      })
      .collect();
    Self::from_vec(cells, width as u32, height as u32)
  }
}

impl<T> Gridlike<T> for Grid<T> {
  fn width(&self) -> u32 {
    self.width
  }

  fn height(&self) -> u32 {
    self.height
  }

  fn get(&self, pos: Pos) -> Option<&T> {
    self.idx(pos).and_then(|idx| self.cells.get(idx))
  }

  fn iter_row<'a, 'b>(&'a self, y: u32) -> impl Iterator<Item = &'b T>
  where
    'a: 'b,
    T: 'a,
  {
    let width = self.width as usize;
    let start = y as usize * width;
    self.cells.get(start..start + width).into_iter().flatten()
  }

  fn iter_col<'a, 'b>(&'a self, x: u32) -> impl Iterator<Item = &'b T>
  where
    'a: 'b,
    T: 'a,
  {
    let rows = if x < self.width { self.height as usize } else { 0 };
    self
      .cells
      .iter()
      .skip(x as usize)
      .step_by(self.width.max(1) as usize)
      .take(rows)
  }
}

/// Space-separated cells, one row per line.
impl<T: Display> Display for Grid<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for row in self.rows() {
      for (x, cell) in row.iter().enumerate() {
        if x > 0 {
          write!(f, " ")?;
        }
        write!(f, "{cell}")?;
      }
      writeln!(f)?;
    }
    Ok(())
  }
}

pub struct TransposeGrid<'a, T> {
  grid: &'a Grid<T>,
}

impl<T> Gridlike<T> for TransposeGrid<'_, T> {
  fn width(&self) -> u32 {
    self.grid.height()
  }

  fn height(&self) -> u32 {
    self.grid.width()
  }

  fn get(&self, pos: Pos) -> Option<&T> {
    self.grid.get(pos.transpose())
  }

  fn iter_row<'a, 'b>(&'a self, y: u32) -> impl Iterator<Item = &'b T>
  where
    'a: 'b,
    T: 'a,
  {
    self.grid.iter_col(y)
  }

  fn iter_col<'a, 'b>(&'a self, x: u32) -> impl Iterator<Item = &'b T>
  where
    'a: 'b,
    T: 'a,
  {
    self.grid.iter_row(x)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use googletest::prelude::*;

  use super::{Grid, Gridlike};
  use crate::pos::Pos;

  #[gtest]
  fn test_from_vec_size_mismatch() {
    expect_that!(Grid::from_vec(vec![1, 2, 3], 2, 2), err(anything()));
  }

  #[gtest]
  fn test_from_rows_pads() {
    let grid = Grid::from_rows(vec![vec![1, 2, 3], vec![4]]).unwrap();
    expect_that!(grid.width(), eq(3));
    expect_that!(grid.height(), eq(2));
    expect_that!(grid.iter_row(1).cloned().collect::<Vec<_>>(), container_eq([4, 0, 0]));
  }

  #[gtest]
  fn test_rows_and_cols() {
    let grid = Grid::from_vec(vec![1, 2, 3, 4, 5, 6], 3, 2).unwrap();
    expect_that!(grid.iter_row(1).cloned().collect::<Vec<_>>(), container_eq([4, 5, 6]));
    expect_that!(grid.iter_col(2).cloned().collect::<Vec<_>>(), container_eq([3, 6]));
    expect_that!(grid.iter_row(2).count(), eq(0));
    expect_that!(grid.iter_col(3).count(), eq(0));
  }

  #[gtest]
  fn test_transpose() {
    let grid = Grid::from_vec(vec![1, 2, 3, 4, 5, 6], 3, 2).unwrap();
    let transposed = grid.transpose();
    expect_that!(transposed.width(), eq(2));
    expect_that!(transposed.height(), eq(3));
    expect_that!(
      transposed.iter_row(0).cloned().collect::<Vec<_>>(),
      container_eq([1, 4])
    );
    expect_that!(transposed.get(Pos { x: 1, y: 2 }).cloned(), some(eq(6)));
  }

  #[gtest]
  fn test_get_mut_out_of_bounds() {
    let mut grid: Grid<Option<char>> = Grid::new(2, 2);
    *grid.get_mut(Pos { x: 1, y: 1 }).unwrap() = Some('q');
    expect_that!(grid.get(Pos { x: 1, y: 1 }).cloned().flatten(), some(eq('q')));
    expect_true!(grid.get_mut(Pos { x: 2, y: 0 }).is_none());
    expect_true!(grid.get(Pos { x: -1, y: 0 }).is_none());
  }

  #[gtest]
  fn test_display() {
    let grid = Grid::from_vec(vec!['a', 'b', 'c', 'd'], 2, 2).unwrap();
    expect_that!(grid.to_string().as_str(), eq("a b\nc d\n"));
    expect_that!(Grid::<char>::new(0, 0).to_string().as_str(), eq(""));
  }
}
