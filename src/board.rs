use crate::{error::Error, HEIGHT, WIDTH};

/// The contents of a single board square
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// The progress of a game, as reported by [`game_state`]
///
/// [`game_state`]: crate::lines::game_state
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    PlayerOneWin,
    PlayerTwoWin,
    Draw,
}

/// The mutable grid state of one game
///
/// Pieces obey gravity: the occupied cells of a column are contiguous
/// from the bottom and `height(column)` counts them. The side to move is
/// derived from the ply count, so a `Board` is fully described by its
/// cell contents.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Board {
    cells: [Cell; WIDTH * HEIGHT], // cells are stored left-to-right, bottom-to-top
    heights: [usize; WIDTH],
    num_moves: usize,
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; WIDTH * HEIGHT],
            heights: [0; WIDTH],
            num_moves: 0,
        }
    }

    /// Replays a game from a string of 1-indexed column digits
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self, Error> {
        let mut board = Self::new();

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => board.drop_piece(column - 1)?,
                _ => return Err(Error::ParseMove(column_char)),
            }
        }
        Ok(board)
    }

    pub fn cell(&self, column: usize, row: usize) -> Cell {
        self.cells[column + WIDTH * row]
    }

    /// The number of pieces in `column`
    pub fn height(&self, column: usize) -> usize {
        self.heights[column]
    }

    /// The total number of pieces played so far
    pub fn ply(&self) -> usize {
        self.num_moves
    }

    pub fn is_full(&self) -> bool {
        self.num_moves == WIDTH * HEIGHT
    }

    pub fn can_drop(&self, column: usize) -> bool {
        column < WIDTH && self.heights[column] < HEIGHT
    }

    /// Drops the side to move's piece into `column`
    ///
    /// The drop is atomic: on error the board is unchanged.
    pub fn drop_piece(&mut self, column: usize) -> Result<(), Error> {
        if column >= WIDTH {
            return Err(Error::ColumnOutOfRange(column));
        }
        if self.heights[column] >= HEIGHT {
            return Err(Error::ColumnFull(column));
        }
        self.cells[column + WIDTH * self.heights[column]] = self.to_move();
        self.heights[column] += 1;
        self.num_moves += 1;
        Ok(())
    }

    /// The player whose turn it is
    pub fn to_move(&self) -> Cell {
        if self.num_moves % 2 == 0 {
            Cell::PlayerOne
        } else {
            Cell::PlayerTwo
        }
    }

    /// The negamax perspective sign of the side to move: +1 for player
    /// one, -1 for player two
    pub fn to_move_sign(&self) -> i32 {
        if self.num_moves % 2 == 0 {
            1
        } else {
            -1
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
