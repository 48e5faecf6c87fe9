//! Turn handling for a game between a human and the engine

use crate::{
    config::GameConfig,
    error::GameError,
    game_state::{GameState, Outcome},
    player::*,
    Player,
};

/// What happened during one call to [`Match::play`]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct TurnReport {
    pub human_move: usize,
    /// The engine's answer, unless the human's move ended the game
    pub reply: Option<usize>,
    /// The state of the game from the human's point of view
    pub outcome: Outcome,
}

/// A human versus engine game
///
/// The human's column is applied first, then the engine replies straight
/// away unless the game is over. When the engine plays first it opens as
/// soon as the match is created.
pub struct Match {
    config: GameConfig,
    state: GameState,
    human: InteractivePlayer,
    engine: SearchPlayer,
    opening: Option<usize>,
}

impl Match {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let mut game = Self {
            config,
            state: GameState::new(config.rows, config.cols)?,
            human: InteractivePlayer::new(),
            engine: SearchPlayer::new(config.engine),
            opening: None,
        };
        game.engine_opening()?;
        Ok(game)
    }

    fn engine_opening(&mut self) -> Result<(), GameError> {
        self.opening = None;
        if self.state.current_player() != self.config.human {
            let column = self.engine.choose_move(&self.state)?;
            self.state.apply(column)?;
            self.opening = Some(column);
        }
        Ok(())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn human(&self) -> Player {
        self.config.human
    }

    /// The engine's first move, if it started the game
    pub fn opening(&self) -> Option<usize> {
        self.opening
    }

    pub fn engine(&self) -> &SearchPlayer {
        &self.engine
    }

    pub fn outcome(&self) -> Outcome {
        self.state.outcome(self.config.human)
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_over()
    }

    /// Status line for the front end, empty while the game is running
    pub fn status(&self) -> &'static str {
        match self.outcome() {
            Outcome::Win(_) => "You win!",
            Outcome::Loss(_) => "AI wins!",
            Outcome::Draw => "Draw!",
            Outcome::Ongoing => "",
        }
    }

    /// Plays the human's column followed by the engine's reply
    ///
    /// Rejected moves leave the game exactly as it was.
    pub fn play(&mut self, column: usize) -> Result<TurnReport, GameError> {
        if self.is_over() {
            return Err(GameError::NoLegalMove);
        }
        self.human.submit(&self.state, column)?;
        let human_move = self.human.choose_move(&self.state)?;
        self.state.apply(human_move)?;

        let mut reply = None;
        if !self.state.is_terminal() {
            let column = self.engine.choose_move(&self.state)?;
            self.state.apply(column)?;
            reply = Some(column);
        }

        Ok(TurnReport {
            human_move,
            reply,
            outcome: self.outcome(),
        })
    }

    /// Starts over on an empty board with the same settings
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.state = GameState::new(self.config.rows, self.config.cols)?;
        self.human.cancel();
        self.engine_opening()
    }
}

/// Lets two agents play from `state` until the game ends and returns the
/// final position
pub fn play_out<'a>(
    mut state: GameState,
    first: &'a mut dyn Agent,
    second: &'a mut dyn Agent,
) -> Result<GameState, GameError> {
    while !state.is_terminal() {
        let agent = match state.current_player() {
            Player::PlayerOne => &mut *first,
            Player::PlayerTwo => &mut *second,
        };
        let column = agent.choose_move(&state)?;
        state.apply(column)?;
    }
    Ok(state)
}
