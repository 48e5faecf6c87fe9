use std::fmt;
use std::sync::Arc;

use crate::{error::*, MAX_DIMENSION, MIN_DIMENSION, WIN_LENGTH};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The symbol used for this cell in the textual board format
    pub fn symbol(&self) -> char {
        match self {
            Cell::PlayerOne => 'O',
            Cell::PlayerTwo => 'X',
            Cell::Empty => '.',
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'O' => Some(Cell::PlayerOne),
            'X' => Some(Cell::PlayerTwo),
            '.' => Some(Cell::Empty),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Player {
    PlayerOne,
    PlayerTwo,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::PlayerOne => Player::PlayerTwo,
            Player::PlayerTwo => Player::PlayerOne,
        }
    }

    /// The marker this player leaves on the board
    pub fn cell(self) -> Cell {
        match self {
            Player::PlayerOne => Cell::PlayerOne,
            Player::PlayerTwo => Cell::PlayerTwo,
        }
    }

    /// 1 for the first player, 2 for the second
    pub fn number(self) -> usize {
        match self {
            Player::PlayerOne => 1,
            Player::PlayerTwo => 2,
        }
    }
}

/// A maximal straight line through the grid, as a run of cell indices
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct Line {
    start: usize,
    stride: usize,
    len: usize,
}

impl Line {
    fn indices(self) -> impl Iterator<Item = usize> {
        (0..self.len).map(move |i| self.start + i * self.stride)
    }
}

/// Every row, column and diagonal long enough to hold a winning run.
/// Each line is listed once, starting from the grid edge it enters through.
fn maximal_lines(rows: usize, cols: usize) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut push = |row: usize, col: usize, stride: usize, len: usize| {
        if len >= WIN_LENGTH {
            lines.push(Line {
                start: row * cols + col,
                stride,
                len,
            });
        }
    };

    // horizontal
    for row in 0..rows {
        push(row, 0, 1, cols);
    }
    // vertical
    for col in 0..cols {
        push(0, col, cols, rows);
    }
    // diagonal \, entering from the top edge then the left edge
    for col in 0..cols {
        push(0, col, cols + 1, rows.min(cols - col));
    }
    for row in 1..rows {
        push(row, 0, cols + 1, (rows - row).min(cols));
    }
    // diagonal /, entering from the top edge then the right edge
    for col in 0..cols {
        push(0, col, cols - 1, rows.min(col + 1));
    }
    for row in 1..rows {
        push(row, cols - 1, cols - 1, (rows - row).min(cols));
    }

    lines
}

/// A gravity board of fixed dimensions
///
/// Cells are stored row-major, row 0 is the top row and pieces fall towards
/// row `rows - 1`.
#[derive(Clone, Debug)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Box<[Cell]>,
    heights: Box<[usize]>,
    lines: Arc<[Line]>,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Result<Self, GameError> {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&rows)
            || !(MIN_DIMENSION..=MAX_DIMENSION).contains(&cols)
        {
            return Err(GameError::InvalidDimensions {
                rows,
                cols,
                min: MIN_DIMENSION,
                max: MAX_DIMENSION,
            });
        }
        Ok(Self::empty(rows, cols))
    }

    // dimensions must already be validated
    pub(crate) fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols].into_boxed_slice(),
            heights: vec![0; cols].into_boxed_slice(),
            lines: maximal_lines(rows, cols).into(),
        }
    }

    /// Parses a board from one string per row, top row first
    ///
    /// `.` is an empty cell, `O` a player one piece and `X` a player two piece.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GameError> {
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        let mut board = Self::new(rows.len(), width)?;

        for (row, text) in rows.iter().enumerate() {
            let text = text.as_ref();
            if text.chars().count() != width {
                return Err(GameError::InvalidBoard(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    text.chars().count(),
                    width
                )));
            }
            for (col, symbol) in text.chars().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or_else(|| {
                    GameError::InvalidBoard(format!("unknown cell symbol '{}'", symbol))
                })?;
                board.cells[row * width + col] = cell;
            }
        }

        // rebuild the column heights, rejecting pieces with a gap below them
        for col in 0..board.cols {
            let mut height = 0;
            for row in (0..board.rows).rev() {
                if board.get(row, col).is_empty() {
                    break;
                }
                height += 1;
            }
            if (0..board.rows - height).any(|row| !board.get(row, col).is_empty()) {
                return Err(GameError::InvalidBoard(format!(
                    "floating piece in column {}",
                    col
                )));
            }
            board.heights[col] = height;
        }
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    /// Number of pieces stacked in a column
    pub fn height(&self, col: usize) -> usize {
        self.heights[col]
    }

    pub fn piece_count(&self) -> usize {
        self.heights.iter().sum()
    }

    pub fn playable(&self, col: usize) -> bool {
        col < self.cols && self.heights[col] < self.rows
    }

    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&height| height == self.rows)
    }

    /// Validates a column without touching the board
    pub fn check_column(&self, col: usize) -> Result<(), MoveError> {
        if col >= self.cols {
            return Err(MoveError::OutOfRange {
                column: col,
                cols: self.cols,
            });
        }
        if self.heights[col] == self.rows {
            return Err(MoveError::ColumnFull { column: col });
        }
        Ok(())
    }

    /// Drops a piece into a column, returning the row it lands on
    pub fn drop_piece(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        self.check_column(col)?;
        let row = self.rows - 1 - self.heights[col];
        self.cells[row * self.cols + col] = cell;
        self.heights[col] += 1;
        Ok(row)
    }

    /// Returns true if `player` has 4 or more pieces in a row anywhere
    pub fn find_four(&self, player: Player) -> bool {
        let target = player.cell();
        self.lines.iter().any(|line| {
            let mut streak = 0;
            line.indices().any(|idx| {
                if self.cells[idx] == target {
                    streak += 1;
                    streak >= WIN_LENGTH
                } else {
                    streak = 0;
                    false
                }
            })
        })
    }
}

impl PartialEq for Board {
    // lines are derived from the dimensions
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.cells == other.cells
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: String = (0..self.cols).map(|col| self.get(row, col).symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
