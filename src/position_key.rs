//! Bit-packed position keys for the transposition table

use crate::{
    board::{Board, Cell},
    HEIGHT, WIDTH,
};

/// Packs a board into a `WIDTH * (HEIGHT + 1)` bit integer
///
/// Each column occupies a band of `HEIGHT + 1` bits: one owner bit per
/// piece from the bottom (player two encodes as 1), then a sentinel bit
/// directly above the top piece. The band is one bit taller than the
/// column so a completely full column keeps its sentinel in the spare
/// bit and the encoding stays unambiguous.
///
/// The key depends only on the final piece layout, never on the move
/// order that produced it, so positions reached by different move
/// sequences share a key and the table can find transpositions.
pub fn encode(board: &Board) -> u64 {
    let mut key = 0u64;
    for column in 0..WIDTH {
        let base = column * (HEIGHT + 1);
        let height = board.height(column);
        for row in 0..height {
            if board.cell(column, row) == Cell::PlayerTwo {
                key |= 1 << (base + row);
            }
        }
        key |= 1 << (base + height);
    }
    key
}
