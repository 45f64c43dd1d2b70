#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod error;
pub mod grid;
pub mod letters;
pub mod pos;
pub mod time;

pub use bitcode;
