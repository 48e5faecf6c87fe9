//! Engine versus engine self-play over the two-move openings

use indicatif::ProgressBar;
use log::info;
use rayon::prelude::*;

use crate::{
    config::TournamentConfig,
    error::GameError,
    game_state::{GameState, Outcome},
    player::SearchPlayer,
    session::play_out,
    Player,
};

/// Results of a tournament, counted from player one's side
#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Tally {
    pub player_one_wins: usize,
    pub player_two_wins: usize,
    pub draws: usize,
}

impl Tally {
    pub fn games(&self) -> usize {
        self.player_one_wins + self.player_two_wins + self.draws
    }

    fn record(mut self, outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win(Player::PlayerOne) | Outcome::Loss(Player::PlayerTwo) => {
                self.player_one_wins += 1
            }
            Outcome::Win(Player::PlayerTwo) | Outcome::Loss(Player::PlayerOne) => {
                self.player_two_wins += 1
            }
            Outcome::Draw => self.draws += 1,
            Outcome::Ongoing => unreachable!("games are always played to the end"),
        }
        self
    }
}

/// The first two moves of opening number `index`
pub fn opening(index: usize, cols: usize) -> [usize; 2] {
    [index % cols, (index / cols) % cols]
}

/// Number of distinct openings a tournament will actually play
pub fn opening_count(config: &TournamentConfig) -> usize {
    config.games.min(config.cols * config.cols)
}

fn play_opening(config: &TournamentConfig, index: usize) -> Result<Outcome, GameError> {
    let mut state = GameState::new(config.rows, config.cols)?;
    state.play_moves(&opening(index, config.cols))?;

    let mut first = SearchPlayer::new(config.engine(Player::PlayerOne));
    let mut second = SearchPlayer::new(config.engine(Player::PlayerTwo));
    let finished = play_out(state, &mut first, &mut second)?;
    Ok(finished.outcome(Player::PlayerOne))
}

/// Plays every opening in parallel, each with its own pair of engines
pub fn run_openings(
    config: &TournamentConfig,
    progress: Option<&ProgressBar>,
) -> Result<Tally, GameError> {
    config.validate()?;
    let games = opening_count(config);

    let outcomes = (0..games)
        .into_par_iter()
        .map(|index| {
            let outcome = play_opening(config, index);
            if let Some(bar) = progress {
                bar.inc(1);
            }
            outcome
        })
        .collect::<Result<Vec<Outcome>, GameError>>()?;

    let tally = outcomes
        .into_iter()
        .fold(Tally::default(), |tally, outcome| tally.record(outcome));
    info!(
        "{} games at depths {:?}: {} player one wins, {} player two wins, {} draws",
        tally.games(),
        config.depths,
        tally.player_one_wins,
        tally.player_two_wins,
        tally.draws
    );
    Ok(tally)
}
