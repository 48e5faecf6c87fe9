use crate::{board::*, error::*, DEFAULT_COLS, DEFAULT_ROWS};

/// Score of a position where the perspective player has connected 4
pub const WIN_SCORE: i32 = 100;
/// Score of a position where the opponent has connected 4
pub const LOSS_SCORE: i32 = -100;
/// Score of a drawn or undecided position
pub const DRAW_SCORE: i32 = 0;

/// The result of a game from one player's point of view
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Outcome {
    Win(Player),
    Loss(Player),
    Draw,
    Ongoing,
}

impl Outcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// A board together with the player whose turn it is
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
}

impl GameState {
    /// Creates an empty `rows` x `cols` board with player one to move
    pub fn new(rows: usize, cols: usize) -> Result<Self, GameError> {
        Ok(Self {
            board: Board::new(rows, cols)?,
            current_player: Player::PlayerOne,
        })
    }

    /// Builds a position from a hand-written board, see [`Board::from_rows`]
    pub fn from_rows<S: AsRef<str>>(rows: &[S], to_move: Player) -> Result<Self, GameError> {
        Ok(Self {
            board: Board::from_rows(rows)?,
            current_player: to_move,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn num_moves(&self) -> usize {
        self.board.piece_count()
    }

    /// Columns that can still take a piece, in ascending order
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..self.board.cols())
            .filter(|&column| self.board.playable(column))
            .collect()
    }

    /// Checks that `column` could be played, without playing it
    pub fn check_move(&self, column: usize) -> Result<(), GameError> {
        if self.board.is_full() {
            return Err(GameError::NoLegalMove);
        }
        self.board.check_column(column)?;
        Ok(())
    }

    /// Drops the current player's piece into `column` and passes the turn
    pub fn apply(&mut self, column: usize) -> Result<(), GameError> {
        self.check_move(column)?;
        self.board.drop_piece(column, self.current_player.cell())?;
        self.current_player = self.current_player.opponent();
        Ok(())
    }

    /// Plays a sequence of columns, stopping at the first invalid one
    pub fn play_moves(&mut self, columns: &[usize]) -> Result<(), GameError> {
        for &column in columns {
            self.apply(column)?;
        }
        Ok(())
    }

    /// Returns true if `player` has connected 4 (or more)
    pub fn find_four(&self, player: Player) -> bool {
        self.board.find_four(player)
    }

    pub fn is_terminal(&self) -> bool {
        self.board.is_full()
            || self.find_four(Player::PlayerOne)
            || self.find_four(Player::PlayerTwo)
    }

    /// Terminal value of the position for `perspective`
    ///
    /// Non-terminal positions score the same as a draw.
    pub fn score(&self, perspective: Player) -> i32 {
        if self.find_four(perspective.opponent()) {
            LOSS_SCORE
        } else if self.find_four(perspective) {
            WIN_SCORE
        } else {
            DRAW_SCORE
        }
    }

    pub fn outcome(&self, perspective: Player) -> Outcome {
        if self.find_four(perspective) {
            Outcome::Win(perspective)
        } else if self.find_four(perspective.opponent()) {
            Outcome::Loss(perspective)
        } else if self.board.is_full() {
            Outcome::Draw
        } else {
            Outcome::Ongoing
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            board: Board::empty(DEFAULT_ROWS, DEFAULT_COLS),
            current_player: Player::PlayerOne,
        }
    }
}
