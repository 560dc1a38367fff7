//! Static position evaluation
//!
//! The heuristic is a fixed pattern counter with no lookahead; all
//! lookahead belongs to the solver.

use crate::{
    board::{Board, Cell},
    lines::count_lines,
    HEIGHT, WIDTH,
};

/// Saturation value signalling a completed four-in-a-row
///
/// This is a win/loss sentinel rather than a real score: heuristic
/// values proper are small line counts, so the two ranges can never
/// collide.
pub const SCORE_LIMIT: i32 = 30_000;

/// Scores a position for the player selected by `sign` (+1 for player
/// one, -1 for player two)
///
/// A full board scores 0 (the draw sentinel). A length-4 line for the
/// selected player saturates to `SCORE_LIMIT * sign`. Otherwise the
/// score is the whole-board count of the selected player's length-3
/// lines, signed by `sign`.
pub fn evaluate(board: &Board, sign: i32) -> i32 {
    if board.is_full() {
        return 0;
    }
    let player = if sign > 0 {
        Cell::PlayerOne
    } else {
        Cell::PlayerTwo
    };

    let mut threes = 0;
    for x in 0..WIDTH {
        for y in 0..HEIGHT {
            if count_lines(board, 4, x, y, player, true) > 0 {
                return SCORE_LIMIT * sign;
            }
            threes += count_lines(board, 3, x, y, player, true) as i32;
        }
    }
    threes * sign
}
