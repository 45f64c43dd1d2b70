use core::fmt;
use std::{
  error::Error,
  fmt::{Display, Formatter},
};

#[derive(Debug)]
pub enum QlessError {
  Internal(String),
  Parse(String),
  /// A consume asked for more of a letter than the pool holds. Only reachable
  /// through a broken invariant in the caller.
  InsufficientLetters(String),
  InvalidPlacement(String),
}

impl Display for QlessError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      QlessError::Internal(msg) => write!(f, "Internal error: {msg}"),
      QlessError::Parse(msg) => write!(f, "Parse error: {msg}"),
      QlessError::InsufficientLetters(msg) => write!(f, "Insufficient letters: {msg}"),
      QlessError::InvalidPlacement(msg) => write!(f, "Invalid placement: {msg}"),
    }
  }
}

impl Error for QlessError {}

pub type QlessResult<T = ()> = Result<T, Box<dyn Error + Send + Sync>>;
