//! Engine and game configuration with validation

use crate::{error::ConfigError, Player, DEFAULT_COLS, DEFAULT_ROWS, MAX_DIMENSION, MIN_DIMENSION};

/// Default search horizon in plies
pub const DEFAULT_DEPTH: usize = 5;

/// Deepest horizon accepted by [`EngineConfig::validate`]
pub const MAX_DEPTH: usize = 12;

/// How an AND node hands its children to the open list
///
/// Both policies return the same value, but when several columns reach it the
/// chosen column can differ between them.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AndExpansion {
    /// Queue the first child, then release each next sibling at the tightened
    /// bound once its predecessor is solved
    Sequential,
    /// Queue every child at once, each inheriting the parent's merit
    Simultaneous,
}

impl Default for AndExpansion {
    fn default() -> Self {
        AndExpansion::Sequential
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct EngineConfig {
    /// Search horizon in plies
    pub depth: usize,
    pub and_expansion: AndExpansion,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            and_expansion: AndExpansion::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 || self.depth > MAX_DEPTH {
            return Err(ConfigError::Validation(format!(
                "depth must be between 1 and {}, got {}",
                MAX_DEPTH, self.depth
            )));
        }
        Ok(())
    }
}

/// Settings for a human versus engine match
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub engine: EngineConfig,
    /// The side the human plays
    pub human: Player,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            engine: EngineConfig::default(),
            human: Player::PlayerOne,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dimensions(self.rows, self.cols)?;
        self.engine.validate()
    }
}

/// Settings for an engine versus engine tournament
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TournamentConfig {
    pub rows: usize,
    pub cols: usize,
    /// Number of openings to play, capped at `cols * cols`
    pub games: usize,
    /// Search horizon of player one and player two
    pub depths: [usize; 2],
    pub and_expansion: AndExpansion,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            games: DEFAULT_COLS * DEFAULT_COLS,
            depths: [DEFAULT_DEPTH; 2],
            and_expansion: AndExpansion::default(),
        }
    }
}

impl TournamentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dimensions(self.rows, self.cols)?;
        if self.games == 0 {
            return Err(ConfigError::Validation("games must be > 0".into()));
        }
        for &depth in self.depths.iter() {
            EngineConfig {
                depth,
                and_expansion: self.and_expansion,
            }
            .validate()?;
        }
        Ok(())
    }

    /// Engine settings for one side
    pub fn engine(&self, player: Player) -> EngineConfig {
        EngineConfig {
            depth: self.depths[player.number() - 1],
            and_expansion: self.and_expansion,
        }
    }
}

fn validate_dimensions(rows: usize, cols: usize) -> Result<(), ConfigError> {
    for (name, value) in [("rows", rows), ("cols", cols)].iter() {
        if *value < MIN_DIMENSION || *value > MAX_DIMENSION {
            return Err(ConfigError::Validation(format!(
                "{} must be between {} and {}, got {}",
                name, MIN_DIMENSION, MAX_DIMENSION, value
            )));
        }
    }
    Ok(())
}
