//! An agent to play the game of Connect 4
//!
//! The solver is a depth-bounded negamax search with alpha-beta pruning
//! and transposition-table-assisted bounds. Interior nodes return a
//! value; the root returns the chosen column.

use log::debug;

use crate::{
    board::Board,
    error::Error,
    heuristic::{evaluate, SCORE_LIMIT},
    transposition_table::{Flag, TranspositionTable},
    WIDTH,
};

/// A successor position generated during search
///
/// Carries the column that produced it from its parent and the ordering
/// score used to rank it; both are scoped to one search call and never
/// become part of persistent game state.
#[derive(Copy, Clone)]
pub struct SearchNode {
    pub board: Board,
    pub column: usize,
    pub score: i32,
}

/// An insertion-sorted collection of search nodes, iterated in
/// descending score order
pub struct MoveSorter {
    size: usize,
    moves: [SearchNode; WIDTH],
}

impl MoveSorter {
    pub fn new() -> Self {
        Self {
            size: 0,
            moves: [SearchNode {
                board: Board::new(),
                column: 0,
                score: 0,
            }; WIDTH],
        }
    }

    pub fn push(&mut self, node: SearchNode) {
        let mut pos = self.size;
        self.size += 1;
        while pos != 0 && self.moves[pos - 1].score > node.score {
            self.moves[pos] = self.moves[pos - 1];
            pos -= 1;
        }
        self.moves[pos] = node;
    }
}

impl Iterator for MoveSorter {
    type Item = SearchNode;

    fn next(&mut self) -> Option<Self::Item> {
        match self.size {
            0 => None,
            _ => {
                self.size -= 1;
                Some(self.moves[self.size])
            }
        }
    }
}

impl Default for MoveSorter {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns a slice ordering the columns from the middle outwards, as
/// the middle columns are often better moves
pub const fn move_order() -> [usize; WIDTH] {
    let mut move_order = [0; WIDTH];
    let mut i = 0;
    while i < WIDTH {
        move_order[i] = (WIDTH / 2) + (i % 2) * (i / 2 + 1) - (1 - i % 2) * (i / 2);
        i += 1;
    }
    move_order
}

/// Generates the legal successors of `board`, ordered center-out
///
/// Each droppable column yields one node scored by its center-out rank;
/// full columns yield nothing. The static center bias is deterministic,
/// which keeps searches reproducible.
pub fn generate_children(board: &Board) -> MoveSorter {
    let mut moves = MoveSorter::new();
    // reversing the ranking puts the edge columns in first, which the
    // insertion sort then never has to shift
    for (rank, &column) in move_order().iter().enumerate().rev() {
        let mut child = *board;
        if child.drop_piece(column).is_ok() {
            moves.push(SearchNode {
                board: child,
                column,
                score: (WIDTH - rank) as i32,
            });
        }
    }
    moves
}

/// A depth-bounded negamax agent for Connect 4 positions
///
/// # Notes
/// The solver borrows a [`TranspositionTable`] owned by the caller, so
/// one table can serve every move decision of a game. Search depth is a
/// difficulty knob with no enforced upper bound; large depths only cost
/// latency.
///
/// # Position Scoring
/// Interior values come from the line-counting heuristic: a completed
/// four-in-a-row saturates to `SCORE_LIMIT` and anything else counts
/// three-in-a-row patterns, always from the perspective of the side to
/// move at that node.
pub struct Solver<'a> {
    transposition_table: &'a mut TranspositionTable,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
}

impl<'a> Solver<'a> {
    /// Creates a new `Solver` borrowing the given transposition table
    pub fn new(transposition_table: &'a mut TranspositionTable) -> Self {
        Self {
            transposition_table,
            node_count: 0,
        }
    }

    /// Performs game tree search below the root
    ///
    /// Returns the value of the position from the perspective of its
    /// side to move (see [Position Scoring])
    ///
    /// [Position Scoring]: #position-scoring
    fn negamax(&mut self, board: &Board, depth: u32, mut alpha: i32, mut beta: i32, sign: i32) -> i32 {
        self.node_count += 1;

        // the flag stored on exit compares against the window as it was
        // before the table tightened it
        let original_alpha = alpha;

        let entry = self.transposition_table.lookup(board);
        if entry.is_valid() && u32::from(entry.depth) >= depth {
            match entry.flag {
                Flag::Exact => return entry.value,
                Flag::LowerBound => alpha = alpha.max(entry.value),
                Flag::UpperBound => beta = beta.min(entry.value),
                Flag::Invalid => {}
            }
            if alpha >= beta {
                // the cached bound empties the window, prune here
                return entry.value;
            }
        }

        // leaf: out of depth, a four-in-a-row on the board, or no moves left
        let heuristic = evaluate(board, sign);
        if depth == 0 || heuristic.abs() >= SCORE_LIMIT || board.is_full() {
            return sign * heuristic;
        }

        let mut value = -SCORE_LIMIT;
        for node in generate_children(board) {
            // the search window is flipped for the other player
            value = value.max(-self.negamax(&node.board, depth - 1, -beta, -alpha, -sign));
            alpha = alpha.max(value);
            // a perfect opponent will not allow anything past beta
            if alpha >= beta {
                break;
            }
        }

        let flag = if value <= original_alpha {
            Flag::UpperBound
        } else if value >= beta {
            Flag::LowerBound
        } else {
            Flag::Exact
        };
        self.transposition_table
            .store(board, depth.min(u8::MAX as u32) as u8, flag, value);

        value
    }

    /// Performs a top-level search and returns the best column
    ///
    /// The root bypasses the transposition table in both directions: it
    /// needs a move rather than a bound, and its value is never cached.
    /// Ties between equal children go to the earlier, more central one,
    /// so the choice is deterministic. Fails with
    /// [`Error::NoLegalMoves`] when the board is already full.
    pub fn choose_move(&mut self, board: &Board, depth: u32) -> Result<usize, Error> {
        let depth = depth.max(1);
        self.node_count += 1;

        let sign = board.to_move_sign();
        let mut alpha = -SCORE_LIMIT;
        let beta = SCORE_LIMIT;

        let mut best: Option<(i32, usize)> = None;
        for node in generate_children(board) {
            let value = -self.negamax(&node.board, depth - 1, -beta, -alpha, -sign);
            match best {
                Some((best_value, _)) if value <= best_value => {}
                _ => best = Some((value, node.column)),
            }
            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }

        debug!(
            "depth {} search visited {} nodes, table {:.1}% full",
            depth,
            self.node_count,
            self.transposition_table.occupancy() * 100.0
        );

        best.map(|(_, column)| column).ok_or(Error::NoLegalMoves)
    }

    /// Searches `board` to `depth` with a full window and returns its
    /// value from the side to move's perspective
    pub fn search_value(&mut self, board: &Board, depth: u32) -> i32 {
        self.negamax(board, depth, -SCORE_LIMIT, SCORE_LIMIT, board.to_move_sign())
    }
}
