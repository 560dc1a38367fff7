//! A heuristic agent for playing the board game 'Connect 4'
//!
//! This agent searches the game tree to a configurable depth with
//! negamax and alpha-beta pruning, memoizing positions in a
//! transposition table, and picks the move with the best guaranteed
//! outcome under a line-counting heuristic.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_engine::board::Board;
//! use connect4_engine::solver::Solver;
//! use connect4_engine::transposition_table::TranspositionTable;
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let board = Board::new();
//! let mut table = TranspositionTable::with_byte_budget(1 << 20)?;
//! let mut solver = Solver::new(&mut table);
//!
//! // the opening search always picks the center column
//! assert_eq!(solver.choose_move(&board, 6)?, 3);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod board;

pub mod lines;

pub mod heuristic;

pub mod position_key;

pub mod transposition_table;

pub mod solver;

mod test;

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// ensure that the given dimensions fit in a u64 for the position key
const_assert!(WIDTH * (HEIGHT + 1) < 64);
