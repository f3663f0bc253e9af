use core::fmt;

use crate::{
    board::{Board, GridView},
    common::{GuessResult, TargetError},
    config::BOARD_SIZE,
    coord::Coord,
};

const N: usize = BOARD_SIZE as usize;

/// Seat at the table. Player one always places first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn number(&self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub fn index(&self) -> usize {
        self.number() as usize - 1
    }

    pub fn other(&self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.number())
    }
}

/// A participant: shot counters, guess history and their own board.
pub struct Player {
    id: PlayerId,
    human: bool,
    hits: u32,
    misses: u32,
    total_shots: u32,
    guessed: Vec<Coord>,
    guessed_mask: [[bool; N]; N],
    board: Board,
}

impl Player {
    pub fn new(id: PlayerId, human: bool) -> Self {
        Self::with_board(id, human, Board::new())
    }

    pub fn with_board(id: PlayerId, human: bool, board: Board) -> Self {
        Self {
            id,
            human,
            hits: 0,
            misses: 0,
            total_shots: 0,
            guessed: Vec::new(),
            guessed_mask: [[false; N]; N],
            board,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// `true` when moves come from a person rather than the computer.
    pub fn is_human(&self) -> bool {
        self.human
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn total_shots(&self) -> u32 {
        self.total_shots
    }

    /// Cells this player has fired at, in the order they were chosen.
    pub fn guessed_cells(&self) -> &[Coord] {
        &self.guessed
    }

    pub fn is_guessed(&self, c: Coord) -> bool {
        self.guessed_mask[c.y as usize][c.x as usize]
    }

    /// Remember a target. Duplicates are refused and leave the player untouched.
    pub fn add_guessed_cell(&mut self, c: Coord) -> Result<(), TargetError> {
        if self.is_guessed(c) {
            return Err(TargetError::AlreadyGuessed(c));
        }
        self.guessed_mask[c.y as usize][c.x as usize] = true;
        self.guessed.push(c);
        Ok(())
    }

    /// Count a resolved shot.
    pub(crate) fn record_shot(&mut self, result: GuessResult) {
        self.total_shots += 1;
        if result.is_hit() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    /// Hits per miss, rounded to two places. `None` until there is at least
    /// one hit; with hits and no misses the ratio is the hit count.
    pub fn hit_miss_ratio(&self) -> Option<f64> {
        match (self.hits, self.misses) {
            (0, _) => None,
            (h, 0) => Some(h as f64),
            (h, m) => Some((h as f64 / m as f64 * 100.0).round() / 100.0),
        }
    }

    /// Render snapshot of this player's board as seen by someone else (or by
    /// the owner with `reveal`). Cells `opponent` has fired at are flagged.
    pub fn view(&self, opponent: &Player, reveal: bool) -> GridView {
        self.board.view(|c| opponent.is_guessed(c), reveal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_guess_is_rejected_without_side_effects() {
        let mut p = Player::new(PlayerId::One, true);
        let c = Coord { x: 3, y: 4 };
        p.add_guessed_cell(c).unwrap();
        assert_eq!(p.add_guessed_cell(c).unwrap_err(), TargetError::AlreadyGuessed(c));
        assert_eq!(p.guessed_cells(), &[c]);
        assert_eq!(p.total_shots(), 0);
        assert!(p.is_guessed(c));
        assert!(!p.is_guessed(Coord { x: 4, y: 3 }));
    }

    #[test]
    fn ratio_matches_stats_screen() {
        let mut p = Player::new(PlayerId::Two, false);
        assert_eq!(p.hit_miss_ratio(), None);
        p.record_shot(GuessResult::Miss);
        assert_eq!(p.hit_miss_ratio(), None);
        p.record_shot(GuessResult::Hit(crate::ShipId(0)));
        assert_eq!(p.hit_miss_ratio(), Some(1.0));
        p.record_shot(GuessResult::Miss);
        p.record_shot(GuessResult::Miss);
        assert_eq!(p.hit_miss_ratio(), Some(0.33));
        assert_eq!(p.total_shots(), p.hits() + p.misses());

        let mut sharp = Player::new(PlayerId::One, true);
        sharp.record_shot(GuessResult::Hit(crate::ShipId(1)));
        sharp.record_shot(GuessResult::Sink(crate::ShipId(1)));
        assert_eq!(sharp.hit_miss_ratio(), Some(2.0));
    }

    #[test]
    fn ids_alternate() {
        assert_eq!(PlayerId::One.other(), PlayerId::Two);
        assert_eq!(PlayerId::Two.other().index(), 0);
    }
}
