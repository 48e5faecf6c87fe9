//! Error types returned by the game core

/// Why a column cannot be played
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} out of range, the board has {cols} columns")]
    OutOfRange { column: usize, cols: usize },

    #[error("column {column} full")]
    ColumnFull { column: usize },
}

/// Errors produced by the board, the search engine and the players
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid move, {0}")]
    InvalidMove(#[from] MoveError),

    #[error("no legal move, the game is already over")]
    NoLegalMove,

    #[error("a move has already been submitted for this turn")]
    MoveAlreadySubmitted,

    #[error("no move has been submitted yet")]
    AwaitingMove,

    #[error("unsupported board size {rows}x{cols}, both dimensions must be between {min} and {max}")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        min: usize,
        max: usize,
    },

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GameError {
    /// True for errors the caller can recover from by picking another column
    pub fn is_invalid_move(&self) -> bool {
        matches!(self, GameError::InvalidMove(_))
    }
}

/// Errors raised while validating configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),
}
