#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod board;
pub mod candidates;
pub mod cover;
pub mod dice;
pub mod layout;
pub mod letter_pool;
pub mod scorer;
pub mod search;
pub mod solution;
