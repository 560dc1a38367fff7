use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    style::{style, Attribute, Color, PrintStyledContent},
    terminal::{Clear, ClearType},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_engine::{
    board::{Board, Cell, GameState},
    lines::count_lines,
    HEIGHT, WIDTH,
};

/// Clears the screen and draws the current position
///
/// Once the game is over only the pieces anchoring a winning line keep
/// their bright color, so the line stands out.
pub fn draw(board: &Board, state: GameState) -> Result<()> {
    let mut stdout = stdout();
    stdout.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;

    let header: String = (1..=WIDTH).map(|column| format!(" {} ", column)).collect();
    stdout.queue(PrintStyledContent(style(header)))?;
    stdout.queue(PrintStyledContent(style("\n")))?;

    let finished = !matches!(state, GameState::Playing);
    for row in (0..HEIGHT).rev() {
        for column in 0..WIDTH {
            let cell = board.cell(column, row);
            let winning = count_lines(board, 4, column, row, cell, true) > 0;
            let styled = match cell {
                Cell::Empty => style(" . ").with(Color::Grey),
                _ => {
                    let color = match cell {
                        Cell::PlayerOne => Color::Yellow,
                        _ => Color::Red,
                    };
                    if !finished || winning {
                        style(" O ").with(color).attribute(Attribute::Bold)
                    } else {
                        style(" O ").with(color)
                    }
                }
            };
            stdout.queue(PrintStyledContent(styled))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.queue(PrintStyledContent(style("\n")))?;
    stdout.flush()?;
    Ok(())
}
