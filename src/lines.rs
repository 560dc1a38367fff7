//! Line pattern matching over the board grid
//!
//! Both win detection (length 4) and the heuristic (length 3) are
//! expressed as the same directional scan from a single cell.

use crate::{
    board::{Board, Cell, GameState},
    HEIGHT, WIDTH,
};

fn in_bounds(x: i32, y: i32) -> bool {
    x >= 0 && x < WIDTH as i32 && y >= 0 && y < HEIGHT as i32
}

/// Counts the axes through `(x, y)` holding a run of `length` cells of
/// `player`, walking all 8 directions up to `length - 1` steps and
/// pairing each direction with its opposite
///
/// With `require_occupied` set the count is 0 unless `(x, y)` itself
/// holds `player`'s piece, which stops lines being counted again from
/// the empty cells around them.
///
/// Returns 0..=4, one count per axis: horizontal, vertical and the two
/// diagonals.
pub fn count_lines(
    board: &Board,
    length: usize,
    x: usize,
    y: usize,
    player: Cell,
    require_occupied: bool,
) -> usize {
    debug_assert!(length >= 2);
    if require_occupied && board.cell(x, y) != player {
        return 0;
    }

    // consecutive same-colored cells in each of the 8 directions
    let mut runs = [0usize; 8];
    let mut i = 0;
    for dx in -1i32..=1 {
        for dy in -1i32..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            for step in 1..length as i32 {
                let nx = x as i32 + dx * step;
                let ny = y as i32 + dy * step;
                if !in_bounds(nx, ny) || board.cell(nx as usize, ny as usize) != player {
                    break;
                }
                runs[i] += 1;
            }
            i += 1;
        }
    }

    // opposite directions sit at mirrored indices, so runs[i] and
    // runs[7 - i] form the 4 axes
    (0..4)
        .filter(|&axis| runs[axis] + runs[7 - axis] >= length - 1)
        .count()
}

/// Reports whether the game is over: a length-4 line wins for its
/// owner, a full board with no line is a draw
pub fn game_state(board: &Board) -> GameState {
    for x in 0..WIDTH {
        for y in 0..HEIGHT {
            let cell = board.cell(x, y);
            if cell.is_empty() {
                continue;
            }
            if count_lines(board, 4, x, y, cell, true) > 0 {
                return match cell {
                    Cell::PlayerOne => GameState::PlayerOneWin,
                    _ => GameState::PlayerTwoWin,
                };
            }
        }
    }
    if board.is_full() {
        GameState::Draw
    } else {
        GameState::Playing
    }
}
