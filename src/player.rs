//! The two kinds of participants in a game

use crate::{config::EngineConfig, error::GameError, game_state::GameState, search::*};

/// Anything that can pick a column for the player to move
pub trait Agent {
    fn choose_move(&mut self, state: &GameState) -> Result<usize, GameError>;
}

/// A player whose moves arrive from outside the core, e.g. a click or a
/// line typed on a terminal
///
/// One column may be submitted per turn. Illegal or duplicate submissions are
/// rejected and leave both the player and the game untouched.
#[derive(Clone, Debug, Default)]
pub struct InteractivePlayer {
    pending: Option<usize>,
}

impl InteractivePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, state: &GameState, column: usize) -> Result<(), GameError> {
        if self.pending.is_some() {
            return Err(GameError::MoveAlreadySubmitted);
        }
        state.check_move(column)?;
        self.pending = Some(column);
        Ok(())
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops a submitted move that has not been played yet
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl Agent for InteractivePlayer {
    fn choose_move(&mut self, state: &GameState) -> Result<usize, GameError> {
        let column = self.pending.ok_or(GameError::AwaitingMove)?;
        // the state may have moved on since the column was submitted
        state.check_move(column)?;
        self.pending = None;
        Ok(column)
    }
}

/// A player backed by a [`SearchEngine`]
#[derive(Clone, Debug)]
pub struct SearchPlayer {
    engine: SearchEngine,
    last_report: Option<SearchReport>,
}

impl SearchPlayer {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: SearchEngine::with_config(config),
            last_report: None,
        }
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    /// Statistics of the most recent search
    pub fn last_report(&self) -> Option<SearchReport> {
        self.last_report
    }
}

impl Agent for SearchPlayer {
    fn choose_move(&mut self, state: &GameState) -> Result<usize, GameError> {
        let report = self.engine.search(state)?;
        self.last_report = Some(report);
        Ok(report.column)
    }
}
