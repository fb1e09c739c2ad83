use thiserror::Error;

/// A malformed 65-character position string or time budget passed to the driver.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("position string must be exactly 65 characters, got {0}")]
    WrongLength(usize),
    #[error("invalid side-to-move byte {0:?} at position 0 (expected 'W' or 'B')")]
    InvalidSide(char),
    #[error("invalid square byte {0:?} at position {1} (expected 'O', 'X', or 'E')")]
    InvalidSquare(char, usize),

    #[error("time budget must be a positive, finite number of seconds, got {0}")]
    InvalidTimeBudget(f64),
}

/// An internal invariant violation: the engine attempted to apply a move that
/// is not legal in the given position. This should never occur in normal
/// operation — every action the search applies was itself generated by
/// `Board::legal_actions` — so surfacing one is a programmer-visible bug,
/// not a condition callers are expected to recover from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IllegalMoveError {
    #[error("coordinates ({row},{col}) are out of the 1..=8 board range")]
    OutOfRange { row: u8, col: u8 },
    #[error("square ({row},{col}) is already occupied")]
    OccupiedSquare { row: u8, col: u8 },
    #[error("placing at ({row},{col}) would flip no discs")]
    NoCapture { row: u8, col: u8 },
}

/// Unwound through the search stack on every αβ frame. `TimeExpired` is
/// cooperative and routine, always caught at the iterative-deepening
/// boundary. `IllegalMove` means the engine generated or applied a move
/// `Board::legal_actions` would not have produced — an internal invariant
/// violation — and is propagated past the iterative-deepening boundary as
/// a fatal error instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("search time budget expired")]
    TimeExpired,
    #[error(transparent)]
    IllegalMove(#[from] IllegalMoveError),
}
