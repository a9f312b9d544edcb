//! Error types for the Ayu rules engine.

use super::types::Coord;

/// Error raised when building a board or game.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// Board size is even or outside the supported range.
    #[display("Board size {} must be odd and between 3 and 19", _0)]
    InvalidSize(usize),

    /// A coordinate does not lie on the board.
    #[display("Coordinate {:?} is off the board", _0)]
    OutOfBounds(Coord),

    /// A recorded move could not be replayed.
    #[display("Move {} of the recorded history is illegal: {}", ply, reason)]
    Replay {
        /// One-based ply number of the offending move.
        ply: usize,
        /// Why the move was rejected.
        reason: MoveError,
    },
}

impl std::error::Error for GameError {}

/// Reason a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Source or destination lies off the board.
    #[display("Move leaves the board")]
    OutOfRange,

    /// The source square does not hold a piece of the player to move.
    #[display("Source square does not hold a piece of the player to move")]
    NotOwnPiece,

    /// The destination square is occupied.
    #[display("Destination square is occupied")]
    DestinationOccupied,

    /// No friendly piece outside the moving unit exists.
    #[display("No friendly unit left to approach")]
    NoFriendlyUnit,

    /// A single piece tried to move further than one step.
    #[display("A single piece may only step to an adjacent square")]
    SingletonTooFar,

    /// The move would break the unit apart.
    #[display("Move would split the unit")]
    SplitsUnit,

    /// The moved piece does not get closer to a friendly unit.
    #[display("Move does not approach the nearest friendly unit")]
    DoesNotApproach,
}

impl std::error::Error for MoveError {}

/// Error raised when parsing coordinate or move notation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Invalid notation: {:?}", _0)]
pub struct ParseError(pub String);

impl ParseError {
    /// Creates a parse error for the given input.
    pub fn new(input: impl Into<String>) -> Self {
        Self(input.into())
    }
}

impl std::error::Error for ParseError {}
