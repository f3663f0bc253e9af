//! Board coordinates, cells and the directions a ship can move in.

use core::fmt;

use crate::common::BoardError;
use crate::config::{BOARD_SIZE, COLUMNS};
use crate::ship::ShipId;

const N: u8 = BOARD_SIZE;

/// Raw index form of a board position: `x` is the column (`A` = 0), `y` the row
/// (displayed as `y + 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    /// Build a coordinate, failing with [`BoardError::OutOfRange`] outside the board.
    pub fn new(x: i32, y: i32) -> Result<Self, BoardError> {
        if !(0..N as i32).contains(&x) || !(0..N as i32).contains(&y) {
            return Err(BoardError::OutOfRange { x, y });
        }
        Ok(Coord {
            x: x as u8,
            y: y as u8,
        })
    }

    /// Column letter, `A` through `J`.
    pub fn column(&self) -> char {
        COLUMNS.as_bytes()[self.x as usize] as char
    }

    /// Row as shown to players, `1` through `10`.
    pub fn display_row(&self) -> u8 {
        self.y + 1
    }

    /// Neighbour one step in `dir`, or `None` when that leaves the board.
    pub fn step(&self, dir: Direction) -> Option<Coord> {
        let (dx, dy) = dir.delta();
        Coord::new(self.x as i32 + dx, self.y as i32 + dy).ok()
    }

    /// Iterate over every cell of the board, row by row.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..N).flat_map(|y| (0..N).map(move |x| Coord { x, y }))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column(), self.display_row())
    }
}

/// Convert a column letter (either case) into its index.
pub fn column_index(letter: char) -> Option<u8> {
    let upper = letter.to_ascii_uppercase();
    COLUMNS.find(upper).map(|i| i as u8)
}

/// One square of a board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    ship: Option<ShipId>,
    hit: bool,
}

impl Cell {
    pub fn ship(&self) -> Option<ShipId> {
        self.ship
    }

    pub fn is_occupied(&self) -> bool {
        self.ship.is_some()
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    pub(crate) fn set_ship(&mut self, id: ShipId) {
        self.ship = Some(id);
    }

    pub(crate) fn clear_ship(&mut self) {
        self.ship = None;
    }

    /// Hits never revert.
    pub(crate) fn mark_hit(&mut self) {
        self.hit = true;
    }
}

/// Movement commands in board space. `Up` decreases the row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Axis a run of cells lies along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}
