//! A Connect 4 rules engine with a best-first (SSS*) opponent
//!
//! The game state owns the board and the turn marker. The search engine
//! explores clones of it with SSS*, a best-first alternative to alpha-beta
//! that never expands more nodes than alpha-beta would, and returns the
//! column with the best guaranteed outcome within a fixed ply horizon.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_sss::{new_game, search::SearchEngine};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut state = new_game(6, 7)?;
//! state.play_moves(&[0, 6, 1, 6, 2])?;
//!
//! // the engine plays second here and has to block the bottom row
//! let mut engine = SearchEngine::new(2);
//! assert_eq!(engine.choose_move(&state)?, 3);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod board;

pub mod game_state;

pub mod search;

pub mod player;

pub mod session;

pub mod tournament;

pub mod config;

mod test;

pub use board::{Board, Cell, Player};
pub use error::{ConfigError, GameError, MoveError};
pub use game_state::{GameState, Outcome};

/// The default number of rows on the board
pub const DEFAULT_ROWS: usize = 6;

/// The default number of columns on the board
pub const DEFAULT_COLS: usize = 7;

/// The length of a winning run
pub const WIN_LENGTH: usize = 4;

/// The smallest supported board dimension
pub const MIN_DIMENSION: usize = WIN_LENGTH;

/// The largest supported board dimension
pub const MAX_DIMENSION: usize = 16;

// the default board must itself be a supported board
const_assert!(DEFAULT_ROWS >= MIN_DIMENSION && DEFAULT_ROWS <= MAX_DIMENSION);
const_assert!(DEFAULT_COLS >= MIN_DIMENSION && DEFAULT_COLS <= MAX_DIMENSION);

/// Starts a new game on a `rows` x `cols` board with player one to move
pub fn new_game(rows: usize, cols: usize) -> Result<GameState, GameError> {
    GameState::new(rows, cols)
}
