use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_sss::{Board, Cell};

/// Draws the board with 1-indexed column numbers above it
pub fn draw(board: &Board) -> Result<()> {
    let mut stdout = stdout();

    let cols: String = (1..=board.cols())
        .map(|col| format!("{:<2}", col % 100))
        .collect();
    stdout.queue(PrintStyledContent(style(cols.trim_end().to_string() + "\n")))?;

    for row in 0..board.rows() {
        for col in 0..board.cols() {
            let cell = board.get(row, col);
            stdout.queue(PrintStyledContent(
                style("O")
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(match cell {
                        Cell::PlayerOne => Color::Red,
                        Cell::PlayerTwo => Color::Yellow,
                        Cell::Empty => Color::DarkBlue,
                    }),
            ))?;
            if col + 1 < board.cols() {
                stdout.queue(PrintStyledContent(style(" ").on(Color::DarkBlue)))?;
            }
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;
    Ok(())
}
