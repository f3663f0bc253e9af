//! Choosing where to fire: validated human input and the computer's
//! search-and-hunt heuristic.

use log::{debug, trace};
use rand::Rng;

use crate::{
    common::{GuessResult, MatchError, TargetError},
    config::BOARD_SIZE,
    coord::{column_index, Axis, Coord, Direction},
    game::{Event, Frontend, Rejection, TargetPrompt},
    player::Player,
};

/// Parse a target such as `A 5` (or `a5`): a column letter A-J and a row 1-10.
pub fn parse_target(input: &str) -> Result<Coord, TargetError> {
    let malformed = || TargetError::Malformed(input.trim().to_string());
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let (letter, number) = match tokens.as_slice() {
        [letter, number] => (*letter, *number),
        [compact] if compact.len() >= 2 && compact.is_char_boundary(1) => compact.split_at(1),
        _ => return Err(malformed()),
    };
    let mut letters = letter.chars();
    let x = match (letters.next(), letters.next()) {
        (Some(ch), None) => column_index(ch).ok_or_else(malformed)?,
        _ => return Err(malformed()),
    };
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let row: u32 = number.parse().map_err(|_| malformed())?;
    if !(1..=BOARD_SIZE as u32).contains(&row) {
        return Err(malformed());
    }
    Ok(Coord {
        x,
        y: (row - 1) as u8,
    })
}

/// Validate one line of human input and, if accepted, add it to the player's
/// guesses. Nothing changes when the input is rejected.
pub fn accept_human_move(player: &mut Player, input: &str) -> Result<Coord, TargetError> {
    let target = parse_target(input)?;
    player.add_guessed_cell(target)?;
    Ok(target)
}

/// Ask the frontend for a target until a valid, fresh one arrives.
pub fn next_human_move<F: Frontend + ?Sized>(
    player: &mut Player,
    opponent: &Player,
    frontend: &mut F,
) -> Result<Coord, MatchError> {
    loop {
        let prompt = TargetPrompt {
            player: player.id(),
            own: player.view(opponent, true),
            enemy: opponent.view(player, false),
        };
        let line = frontend.target(&prompt)?;
        match accept_human_move(player, &line) {
            Ok(target) => return Ok(target),
            Err(e) => frontend.notify(&Event::Rejected {
                player: player.id(),
                reason: Rejection::Target(e),
            }),
        }
    }
}

/// Computer targeting memory.
///
/// `origin` is the first hit on a ship not yet sunk; `current` the most recent
/// hit that lines up with it. With no origin the computer searches at random.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HuntState {
    origin: Option<Coord>,
    current: Option<Coord>,
}

impl HuntState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> Option<Coord> {
        self.origin
    }

    pub fn current(&self) -> Option<Coord> {
        self.current
    }

    pub fn is_hunting(&self) -> bool {
        self.origin.is_some()
    }

    /// Back to random search.
    pub fn reset(&mut self) {
        self.origin = None;
        self.current = None;
    }

    /// Axis through `origin` and `current`, once both are known.
    pub fn rotation(&self) -> Result<Option<Axis>, MatchError> {
        let (Some(origin), Some(current)) = (self.origin, self.current) else {
            return Ok(None);
        };
        if current.x == origin.x {
            Ok(Some(Axis::Vertical))
        } else if current.y == origin.y {
            Ok(Some(Axis::Horizontal))
        } else {
            Err(MatchError::HuntAxis { origin, current })
        }
    }

    /// Fold in the result of a shot this state chose.
    pub fn observe(&mut self, target: Coord, result: GuessResult) {
        match result {
            GuessResult::Sink(_) => self.reset(),
            GuessResult::Hit(_) if self.origin.is_none() => self.origin = Some(target),
            GuessResult::Hit(_) => self.current = Some(target),
            GuessResult::Miss => self.current = None,
        }
        trace!("hunt state {:?} after {} at {}", self, result_name(result), target);
    }

    /// Next cell along the established line, away from `origin`.
    fn walk(&self, player: &Player) -> Result<Option<Coord>, MatchError> {
        let (Some(origin), Some(current)) = (self.origin, self.current) else {
            return Ok(None);
        };
        self.rotation()?;
        let dx = (current.x as i32 - origin.x as i32).signum();
        let dy = (current.y as i32 - origin.y as i32).signum();
        Ok(Coord::new(current.x as i32 + dx, current.y as i32 + dy)
            .ok()
            .filter(|&c| !player.is_guessed(c)))
    }

    /// First unguessed neighbour of `origin`, probing up, down, left, right.
    fn probe(&self, player: &Player) -> Option<Coord> {
        let origin = self.origin?;
        Direction::ALL
            .iter()
            .filter_map(|&dir| origin.step(dir))
            .find(|&c| !player.is_guessed(c))
    }
}

fn result_name(result: GuessResult) -> &'static str {
    match result {
        GuessResult::Hit(_) => "hit",
        GuessResult::Miss => "miss",
        GuessResult::Sink(_) => "sink",
    }
}

/// Pick the computer's next target against `opponent` and record it as guessed.
pub fn next_computer_move<R: Rng + ?Sized>(
    player: &mut Player,
    opponent: &Player,
    hunt: &mut HuntState,
    rng: &mut R,
) -> Result<Coord, MatchError> {
    if hunt.is_hunting() {
        if let Some(target) = hunt.walk(player)? {
            player.add_guessed_cell(target)?;
            return Ok(target);
        }
        if hunt.current.take().is_some() {
            debug!("line ended, probing the other side of {:?}", hunt.origin);
        }
        if let Some(target) = hunt.probe(player) {
            player.add_guessed_cell(target)?;
            return Ok(target);
        }
        debug!("no open neighbours around {:?}, back to searching", hunt.origin);
        hunt.reset();
    }
    search(player, opponent, rng)
}

fn search<R: Rng + ?Sized>(
    player: &mut Player,
    opponent: &Player,
    rng: &mut R,
) -> Result<Coord, MatchError> {
    let cells = BOARD_SIZE as usize * BOARD_SIZE as usize;
    if player.guessed_cells().len() >= cells {
        return Err(TargetError::Exhausted.into());
    }
    loop {
        let row = opponent.board().random_row(rng);
        let Some(target) = opponent.board().random_cell(row, true, rng) else {
            continue;
        };
        if player.is_guessed(target) {
            continue;
        }
        player.add_guessed_cell(target)?;
        return Ok(target);
    }
}
