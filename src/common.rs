//! Common types: error taxonomy and shot results.

use thiserror::Error;

use crate::coord::{Coord, Direction};
use crate::ship::ShipId;

/// Result of a resolved shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessResult {
    /// Shot struck a ship that is still afloat.
    Hit(ShipId),
    /// Shot landed in open water.
    Miss,
    /// Shot took the last point of health from a ship.
    Sink(ShipId),
}

impl GuessResult {
    pub fn is_hit(&self) -> bool {
        !matches!(self, GuessResult::Miss)
    }
}

/// Errors returned by [`crate::Board`] operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    /// Index outside `0..10` on either axis.
    #[error("coordinate ({x}, {y}) is off the board")]
    OutOfRange { x: i32, y: i32 },
    /// Start and end do not share exactly one component.
    #[error("{start} to {end} is not a horizontal or vertical run")]
    InvalidOrientation { start: Coord, end: Coord },
    /// Ship id outside the roster.
    #[error("no ship {0} in the roster")]
    UnknownShip(ShipId),
    /// Random placement gave up after too many anchors.
    #[error("unable to find a position for the {0}")]
    UnableToPlaceShip(&'static str),
    /// Shot at a ship cell that was already struck.
    #[error("{0} has already been hit")]
    AlreadyHit(Coord),
}

/// Errors reported while moving or committing a ship during placement.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlacementError {
    /// A shift would push an endpoint off the board.
    #[error("illegal move: cannot go {0}, the ship is already at the edge")]
    IllegalMove(Direction),
    /// No rotation candidate stays on the board.
    #[error("the ship cannot be rotated from here")]
    NoValidRotation,
    /// Committing would overlap these already-occupied cells.
    #[error("ships cannot overlap, these cells collide: {}", join_coords(.0))]
    Collision(Vec<Coord>),
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Errors produced while picking a target.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TargetError {
    /// Input is not a column letter A-J followed by a row 1-10.
    #[error("'{0}' is not a valid coordinate, use a letter and a number like 'A 5'")]
    Malformed(String),
    /// The cell was targeted on an earlier turn.
    #[error("{0} has already been guessed, pick another cell")]
    AlreadyGuessed(Coord),
    /// Every cell on the board has been guessed.
    #[error("no unguessed cells remain")]
    Exhausted,
}

/// Errors that end a match early.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Target(#[from] TargetError),
    /// Hunt state holds two hits that share neither a row nor a column.
    #[error("hunt state is inconsistent: origin {origin} and current {current} are not aligned")]
    HuntAxis { origin: Coord, current: Coord },
    /// A different target was fired while one from `next_move` is outstanding.
    #[error("{0} was chosen for this turn and must be fired first")]
    PendingTarget(Coord),
    /// A shot was fired outside the turn loop.
    #[error("no turn is in progress")]
    NotInPlay,
    /// The input stream ended while the match was waiting on a player.
    #[error("input closed before the match finished")]
    InputClosed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub(crate) fn join_coords(coords: &[Coord]) -> String {
    coords
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
