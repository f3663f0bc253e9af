//! Game board: the 10×10 grid, the fleet placed on it and the ships it has lost.

use core::fmt;

use log::{debug, trace};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::common::{BoardError, GuessResult};
use crate::config::{BOARD_SIZE, SHIPS};
use crate::coord::{Axis, Cell, Coord, Direction};
use crate::ship::{Color, Ship, ShipClass, ShipId, SunkShip};

const N: usize = BOARD_SIZE as usize;

/// Axis-aligned run of cells between two endpoints, inclusive.
///
/// `start` is whichever endpoint the caller named first; iteration always
/// goes from the lower index to the higher one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    start: Coord,
    end: Coord,
}

impl Run {
    /// Fails with [`BoardError::InvalidOrientation`] unless exactly one of the
    /// components is shared.
    pub fn new(start: Coord, end: Coord) -> Result<Self, BoardError> {
        if (start.x == end.x) == (start.y == end.y) {
            return Err(BoardError::InvalidOrientation { start, end });
        }
        Ok(Run { start, end })
    }

    /// Run of `length` cells leaving `anchor` in `dir`, if it fits on the board.
    pub fn from_anchor(anchor: Coord, dir: Direction, length: usize) -> Option<Self> {
        let span = length.checked_sub(1)? as i32;
        let (dx, dy) = dir.delta();
        let end = Coord::new(anchor.x as i32 + dx * span, anchor.y as i32 + dy * span).ok()?;
        Run::new(anchor, end).ok()
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn end(&self) -> Coord {
        self.end
    }

    pub fn axis(&self) -> Axis {
        if self.start.x == self.end.x {
            Axis::Vertical
        } else {
            Axis::Horizontal
        }
    }

    pub fn len(&self) -> usize {
        match self.axis() {
            Axis::Vertical => self.start.y.abs_diff(self.end.y) as usize + 1,
            Axis::Horizontal => self.start.x.abs_diff(self.end.x) as usize + 1,
        }
    }

    /// Cells from the lower index to the higher one.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let (start, end, axis) = (self.start, self.end, self.axis());
        let (lo, hi) = match axis {
            Axis::Vertical => (start.y.min(end.y), start.y.max(end.y)),
            Axis::Horizontal => (start.x.min(end.x), start.x.max(end.x)),
        };
        (lo..=hi).map(move |i| match axis {
            Axis::Vertical => Coord { x: start.x, y: i },
            Axis::Horizontal => Coord { x: i, y: start.y },
        })
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.cells().any(|cell| cell == c)
    }

    /// The same run moved one cell in `dir`, or `None` if either endpoint
    /// would leave the board.
    pub fn shifted(&self, dir: Direction) -> Option<Self> {
        Some(Run {
            start: self.start.step(dir)?,
            end: self.end.step(dir)?,
        })
    }

    /// Rotate a quarter turn about `start`, trying up, down, left and right in
    /// that order. Horizontal runs can only turn up or down, vertical runs
    /// only left or right.
    pub fn rotated(&self) -> Option<Self> {
        let span = self.len() as i32 - 1;
        let (s, e) = (self.start, self.end);
        let candidates = match self.axis() {
            Axis::Horizontal => [
                (s.x as i32, e.y as i32 - span),
                (s.x as i32, e.y as i32 + span),
            ],
            Axis::Vertical => [
                (e.x as i32 - span, s.y as i32),
                (e.x as i32 + span, s.y as i32),
            ],
        };
        candidates.into_iter().find_map(|(x, y)| {
            let end = Coord::new(x, y).ok()?;
            Run::new(s, end).ok()
        })
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// What a presentation layer may know about one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellView {
    /// Colour of the ship in this cell, when visible to the viewer.
    pub ship: Option<Color>,
    pub hit: bool,
    /// The opponent has fired at this cell.
    pub guessed: bool,
    /// The ship shown here is still being positioned and not yet committed.
    pub pending: bool,
}

impl CellView {
    /// A shot landed here and found nothing.
    pub fn is_miss(&self) -> bool {
        self.guessed && !self.hit
    }
}

/// Rows of cell views, `[y][x]`.
pub type GridView = [[CellView; N]; N];

/// One player's board.
pub struct Board {
    cells: [[Cell; N]; N],
    fleet: Vec<Ship>,
    placements: Vec<Option<Run>>,
    sunk: Vec<SunkShip>,
    scratch: Option<(ShipId, Run)>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board carrying the standard roster.
    pub fn new() -> Self {
        Self::with_roster(&SHIPS)
    }

    /// Create an empty board carrying `roster`; ship ids index into it.
    pub fn with_roster(roster: &[ShipClass]) -> Self {
        Board {
            cells: [[Cell::default(); N]; N],
            fleet: roster.iter().copied().map(Ship::new).collect(),
            placements: vec![None; roster.len()],
            sunk: Vec::new(),
            scratch: None,
        }
    }

    /// Cell at column `x`, row `y`.
    pub fn cell_at(&self, x: i32, y: i32) -> Result<&Cell, BoardError> {
        let c = Coord::new(x, y)?;
        Ok(self.cell(c))
    }

    pub fn cell(&self, c: Coord) -> &Cell {
        &self.cells[c.y as usize][c.x as usize]
    }

    fn cell_mut(&mut self, c: Coord) -> &mut Cell {
        &mut self.cells[c.y as usize][c.x as usize]
    }

    /// Ships on this board, indexed by [`ShipId`].
    pub fn fleet(&self) -> &[Ship] {
        &self.fleet
    }

    pub fn ship(&self, id: ShipId) -> Result<&Ship, BoardError> {
        self.fleet.get(id.0).ok_or(BoardError::UnknownShip(id))
    }

    /// Committed position of a ship, if it has been placed.
    pub fn placement(&self, id: ShipId) -> Option<Run> {
        self.placements.get(id.0).copied().flatten()
    }

    pub fn sunk_ships(&self) -> &[SunkShip] {
        &self.sunk
    }

    /// `true` once every ship in the fleet has been sunk.
    pub fn all_sunk(&self) -> bool {
        self.sunk.len() == self.fleet.len()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_occupied()).count()
    }

    /// Commit `id` to the run from `start` to `end`. Re-placing a ship moves it;
    /// its previous cells are released.
    ///
    /// The run must not cover cells held by another ship; check with
    /// [`Board::collisions`] first. An overlapping ship would lose cells it
    /// still counts in its health and could never be sunk.
    pub fn place_ship(&mut self, start: Coord, end: Coord, id: ShipId) -> Result<(), BoardError> {
        let run = Run::new(start, end)?;
        self.ship(id)?;
        debug_assert!(
            run.cells().all(|c| self.cell(c).ship().map_or(true, |other| other == id)),
            "{} overlaps another ship",
            run
        );
        if let Some(previous) = self.placements[id.0].take() {
            for c in previous.cells() {
                if self.cell(c).ship() == Some(id) {
                    self.cell_mut(c).clear_ship();
                }
            }
        }
        for c in run.cells() {
            self.cell_mut(c).set_ship(id);
        }
        self.placements[id.0] = Some(run);
        debug!("placed {} at {}", self.fleet[id.0].name(), run);
        Ok(())
    }

    /// Already-occupied cells inside the run from `start` to `end`.
    pub fn collisions(&self, start: Coord, end: Coord) -> Result<Vec<Coord>, BoardError> {
        let run = Run::new(start, end)?;
        Ok(run.cells().filter(|&c| self.cell(c).is_occupied()).collect())
    }

    /// Show `id` at the run from `start` to `end` without committing it.
    /// Replaces any previous scratch position in one step.
    pub fn scratch_place(&mut self, start: Coord, end: Coord, id: ShipId) -> Result<(), BoardError> {
        let run = Run::new(start, end)?;
        self.ship(id)?;
        trace!("scratch {} at {}", self.fleet[id.0].name(), run);
        self.scratch = Some((id, run));
        Ok(())
    }

    /// Remove the scratch position of `id` at the given run. The committed
    /// grid is never touched.
    pub fn scratch_clear(&mut self, start: Coord, end: Coord, id: ShipId) -> Result<(), BoardError> {
        let run = Run::new(start, end)?;
        if self.scratch == Some((id, run)) {
            self.scratch = None;
        }
        Ok(())
    }

    /// Current uncommitted ship position, if any.
    pub fn scratch(&self) -> Option<(ShipId, Run)> {
        self.scratch
    }

    /// Uniformly chosen row index.
    pub fn random_row<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        rng.random_range(0..BOARD_SIZE)
    }

    /// Uniformly chosen cell in `row`, skipping occupied cells unless
    /// `allow_occupied` is set. `None` when no cell qualifies.
    pub fn random_cell<R: Rng + ?Sized>(
        &self,
        row: u8,
        allow_occupied: bool,
        rng: &mut R,
    ) -> Option<Coord> {
        let eligible: Vec<Coord> = (0..BOARD_SIZE)
            .map(|x| Coord { x, y: row })
            .filter(|&c| allow_occupied || !self.cell(c).is_occupied())
            .collect();
        eligible.choose(rng).copied()
    }

    /// Resolve a shot at `target`. `moves` is the attacker's shot count,
    /// recorded on the snapshot if this shot sinks a ship.
    pub fn receive_shot(&mut self, target: Coord, moves: u32) -> Result<GuessResult, BoardError> {
        let cell = *self.cell(target);
        let Some(id) = cell.ship() else {
            return Ok(GuessResult::Miss);
        };
        if cell.is_hit() {
            return Err(BoardError::AlreadyHit(target));
        }
        self.cell_mut(target).mark_hit();
        let ship = self
            .fleet
            .get_mut(id.0)
            .ok_or(BoardError::UnknownShip(id))?;
        if ship.take_hit() {
            let snapshot = SunkShip::capture(ship, moves);
            debug!("{} sunk after {} moves", snapshot.name, moves);
            self.sunk.push(snapshot);
            Ok(GuessResult::Sink(id))
        } else {
            Ok(GuessResult::Hit(id))
        }
    }

    /// Per-cell snapshot for rendering. `guessed` reports which cells the
    /// opponent has fired at; ships are only shown when `reveal` is set or the
    /// cell has been hit.
    pub fn view(&self, guessed: impl Fn(Coord) -> bool, reveal: bool) -> GridView {
        let mut grid = [[CellView::default(); N]; N];
        for c in Coord::all() {
            let cell = self.cell(c);
            let pending = self
                .scratch
                .filter(|(_, run)| run.contains(c))
                .map(|(id, _)| id);
            let ship = pending.or(cell.ship());
            let visible = reveal || cell.is_hit() || pending.is_some();
            grid[c.y as usize][c.x as usize] = CellView {
                ship: ship
                    .filter(|_| visible)
                    .map(|id| self.fleet[id.0].class().color()),
                hit: cell.is_hit(),
                guessed: guessed(c),
                pending: pending.is_some(),
            };
        }
        grid
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|c| match (c.ship(), c.is_hit()) {
                    (Some(_), true) => 'X',
                    (Some(id), false) => char::from_digit(id.0 as u32 % 10, 10).unwrap_or('S'),
                    (None, _) => '.',
                })
                .collect();
            writeln!(f, "  {}", line)?;
        }
        write!(f, "  sunk: {:?}\n}}", self.sunk)
    }
}
