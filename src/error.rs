use thiserror::Error;

/// Errors surfaced by the engine
///
/// `ColumnOutOfRange`, `ColumnFull` and `ParseMove` are recoverable and
/// leave the board untouched. `TableAllocation` is fatal to game setup,
/// as no search is possible without a table.
#[derive(Debug, Error)]
pub enum Error {
    #[error("column {0} is out of range")]
    ColumnOutOfRange(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("could not allocate a transposition table of {0} bytes")]
    TableAllocation(usize),

    #[error("no legal moves remain")]
    NoLegalMoves,

    #[error("table file length {0} is not a multiple of the entry record size")]
    MalformedTableFile(u64),

    #[error("could not parse '{0}' as a valid move")]
    ParseMove(char),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
