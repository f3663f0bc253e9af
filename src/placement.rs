//! Ship placement: the interactive move/rotate/confirm loop for people and
//! random anchoring for the computer.

use core::str::FromStr;

use log::{debug, trace};
use rand::seq::IndexedRandom;
use rand::Rng;
use thiserror::Error;

use crate::{
    board::{Board, Run},
    common::{BoardError, MatchError, PlacementError},
    coord::{Coord, Direction},
    game::{Event, Frontend, PlacementPrompt, Rejection},
    player::{Player, PlayerId},
    ship::ShipId,
};

/// Anchors tried per ship before random placement gives up.
const MAX_ANCHORS: usize = 10_000;

/// A keystroke during interactive placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementCommand {
    Move(Direction),
    Rotate,
    Confirm,
}

/// Input that is not one of the placement keys.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("'{0}' is not a placement key, use W A S D to move, R to rotate and N to place the ship")]
pub struct UnknownCommand(pub String);

impl FromStr for PlacementCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "W" => Ok(PlacementCommand::Move(Direction::Up)),
            "A" => Ok(PlacementCommand::Move(Direction::Left)),
            "S" => Ok(PlacementCommand::Move(Direction::Down)),
            "D" => Ok(PlacementCommand::Move(Direction::Right)),
            "R" => Ok(PlacementCommand::Rotate),
            "N" => Ok(PlacementCommand::Confirm),
            _ => Err(UnknownCommand(s.trim().to_string())),
        }
    }
}

/// Outcome of an accepted command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The ship moved or turned and is still being positioned.
    Moved(Run),
    /// The ship is committed to the board.
    Placed(Run),
}

/// One ship being positioned on the scratch overlay of a board.
pub struct PlacementSession<'a> {
    board: &'a mut Board,
    ship: ShipId,
    run: Run,
}

impl<'a> PlacementSession<'a> {
    /// Start positioning `ship` lying horizontally from the top-left corner.
    pub fn begin(board: &'a mut Board, ship: ShipId) -> Result<Self, BoardError> {
        let length = board.ship(ship)?.length();
        let origin = Coord { x: 0, y: 0 };
        let end = Coord::new(length as i32 - 1, 0)?;
        let run = Run::new(origin, end)?;
        board.scratch_place(run.start(), run.end(), ship)?;
        Ok(Self { board, ship, run })
    }

    pub fn ship(&self) -> ShipId {
        self.ship
    }

    /// Current uncommitted position.
    pub fn run(&self) -> Run {
        self.run
    }

    pub fn board(&self) -> &Board {
        self.board
    }

    /// Apply one command. Rejected commands leave the position unchanged.
    pub fn apply(&mut self, cmd: PlacementCommand) -> Result<Progress, PlacementError> {
        match cmd {
            PlacementCommand::Move(dir) => {
                let next = self.run.shifted(dir).ok_or(PlacementError::IllegalMove(dir))?;
                self.reposition(next)?;
                Ok(Progress::Moved(next))
            }
            PlacementCommand::Rotate => {
                let next = self.run.rotated().ok_or(PlacementError::NoValidRotation)?;
                self.reposition(next)?;
                Ok(Progress::Moved(next))
            }
            PlacementCommand::Confirm => {
                let (start, end) = (self.run.start(), self.run.end());
                let collisions = self.board.collisions(start, end)?;
                if !collisions.is_empty() {
                    return Err(PlacementError::Collision(collisions));
                }
                self.board.place_ship(start, end, self.ship)?;
                self.board.scratch_clear(start, end, self.ship)?;
                Ok(Progress::Placed(self.run))
            }
        }
    }

    fn reposition(&mut self, next: Run) -> Result<(), BoardError> {
        // scratch_place swaps the overlay in one assignment
        self.board.scratch_place(next.start(), next.end(), self.ship)?;
        trace!("{} -> {}", self.run, next);
        self.run = next;
        Ok(())
    }
}

/// Walk a person through placing every ship on `player`'s board. Each prompt
/// blocks on the frontend; rejected input is reported and asked again.
pub fn run_placement<F: Frontend + ?Sized>(
    player: &mut Player,
    opponent: &Player,
    frontend: &mut F,
) -> Result<(), MatchError> {
    let id = player.id();
    for index in 0..player.board().fleet().len() {
        let ship = ShipId(index);
        let class = player.board().ship(ship)?.class();
        let mut session = PlacementSession::begin(player.board_mut(), ship)?;
        let placed = drive_session(&mut session, id, opponent, frontend)?;
        frontend.notify(&Event::ShipPlaced {
            player: id,
            ship: class,
            run: placed,
        });
    }
    Ok(())
}

fn drive_session<F: Frontend + ?Sized>(
    session: &mut PlacementSession<'_>,
    player: PlayerId,
    opponent: &Player,
    frontend: &mut F,
) -> Result<Run, MatchError> {
    loop {
        let prompt = PlacementPrompt {
            player,
            ship: session.board().ship(session.ship())?.class(),
            run: session.run(),
            view: session.board().view(|c| opponent.is_guessed(c), true),
        };
        let line = frontend.placement_command(&prompt)?;
        let cmd = match line.parse::<PlacementCommand>() {
            Ok(cmd) => cmd,
            Err(e) => {
                frontend.notify(&Event::Rejected {
                    player,
                    reason: Rejection::Command(e),
                });
                continue;
            }
        };
        match session.apply(cmd) {
            Ok(Progress::Placed(run)) => return Ok(run),
            Ok(Progress::Moved(_)) => {}
            Err(PlacementError::Board(e)) => return Err(e.into()),
            Err(e) => frontend.notify(&Event::Rejected {
                player,
                reason: Rejection::Placement(e),
            }),
        }
    }
}

/// Place every ship in `board`'s fleet at random.
///
/// An anchor is a random empty cell. Every direction whose run stays on the
/// board is checked, and a single colliding direction throws the anchor away
/// even if others are clear. A fresh anchor is drawn until one survives; the
/// direction is then picked uniformly from the clear ones.
pub fn run_computer_placement<R: Rng + ?Sized>(
    board: &mut Board,
    rng: &mut R,
) -> Result<(), BoardError> {
    for index in 0..board.fleet().len() {
        let ship = ShipId(index);
        let (name, length) = {
            let s = board.ship(ship)?;
            (s.name(), s.length())
        };
        let mut placed = false;
        for _ in 0..MAX_ANCHORS {
            let row = board.random_row(rng);
            let Some(anchor) = board.random_cell(row, false, rng) else {
                continue;
            };
            if let Some(run) = pick_direction(board, anchor, length, rng)? {
                board.place_ship(run.start(), run.end(), ship)?;
                placed = true;
                break;
            }
            trace!("anchor {} rejected for {}", anchor, name);
        }
        if !placed {
            return Err(BoardError::UnableToPlaceShip(name));
        }
    }
    debug!("computer fleet deployed");
    Ok(())
}

/// Runs leaving `anchor` that fit on the board, or `None` when there are none
/// or any of them collides.
fn pick_direction<R: Rng + ?Sized>(
    board: &Board,
    anchor: Coord,
    length: usize,
    rng: &mut R,
) -> Result<Option<Run>, BoardError> {
    let mut clear = Vec::with_capacity(Direction::ALL.len());
    for dir in Direction::ALL {
        let Some(run) = Run::from_anchor(anchor, dir, length) else {
            continue;
        };
        if !board.collisions(run.start(), run.end())?.is_empty() {
            return Ok(None);
        }
        clear.push(run);
    }
    Ok(clear.choose(rng).copied())
}
