//! Errors used by the [`Board`][crate::board::Board].
//!
//! All of these are local, recoverable outcomes: callers are expected to
//! check the result and retry with a different coordinate or orientation.
//! None of them aborts a match.

use thiserror::Error;

/// Reason why a ship could not be placed at a given anchor.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotPlaceReason {
    /// The ship id was not a valid index into the fleet catalog.
    #[error("ship id is not in the fleet catalog")]
    InvalidShipId,
    /// The anchor coordinate was outside the board.
    #[error("anchor coordinate is out of bounds")]
    OutOfBounds,
    /// The ship's footprint would run past the edge of the board.
    #[error("ship footprint exceeds the grid")]
    FootprintExceedsGrid,
    /// The same ship already occupies cells somewhere on the board.
    #[error("ship was already placed on this board")]
    AlreadyPlaced,
    /// One or more footprint cells is not empty.
    #[error("the requested position was already occupied")]
    CellOccupied,
}

/// Reason why a ship could not be removed from the board.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotUnplaceReason {
    /// The ship id was not a valid index into the fleet catalog.
    #[error("ship id is not in the fleet catalog")]
    InvalidShipId,
    /// The described footprint does not match the ship's cells exactly.
    #[error("the described footprint does not match the ship's placement")]
    FootprintMismatch,
}

/// Reason why a cell could not be attacked.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotAttackReason {
    /// The target coordinate was outside the board.
    #[error("target coordinate is out of bounds")]
    OutOfBounds,
    /// A shot was already resolved at the target cell.
    #[error("the target cell was already attacked")]
    AlreadyAttacked,
}
