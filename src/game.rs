//! Match orchestration: placement, turn alternation, shot resolution and the
//! summary handed back to the presentation layer.

use log::{debug, info};
use rand::Rng;
use thiserror::Error;

use crate::{
    board::{GridView, Run},
    common::{GuessResult, MatchError, PlacementError, TargetError},
    coord::Coord,
    placement::{run_computer_placement, run_placement, UnknownCommand},
    player::{Player, PlayerId},
    ship::{ShipClass, SunkShip},
    targeting::{next_computer_move, next_human_move, HuntState},
};

/// What a person positioning a ship needs to see.
#[derive(Debug, Clone)]
pub struct PlacementPrompt {
    pub player: PlayerId,
    pub ship: ShipClass,
    pub run: Run,
    /// Own board with the pending ship overlaid.
    pub view: GridView,
}

/// What a person choosing a target needs to see.
#[derive(Debug, Clone)]
pub struct TargetPrompt {
    pub player: PlayerId,
    /// Shooter's own board, fully visible.
    pub own: GridView,
    /// Opponent's board with unhit ships hidden.
    pub enemy: GridView,
}

/// Input that was refused and must be entered again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error(transparent)]
    Command(#[from] UnknownCommand),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Target(#[from] TargetError),
}

/// A resolved shot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotReport {
    pub attacker: PlayerId,
    pub target: Coord,
    pub result: GuessResult,
    /// Name of the ship struck, if any.
    pub ship: Option<&'static str>,
    /// Defender's board after the shot, as the attacker may see it.
    pub defender_view: GridView,
}

/// Things that happen during a match, for the frontend to show.
#[derive(Debug, Clone)]
pub enum Event {
    Rejected { player: PlayerId, reason: Rejection },
    ShipPlaced { player: PlayerId, ship: ShipClass, run: Run },
    /// The computer finished placing its fleet.
    FleetDeployed { player: PlayerId },
    StartingPlayer(PlayerId),
    Shot(ShotReport),
    MatchOver { winner: PlayerId },
}

/// Presentation seam. Input calls block until the player answers; an `Err`
/// aborts the match.
pub trait Frontend {
    /// One placement key for the ship in `prompt`.
    fn placement_command(&mut self, prompt: &PlacementPrompt) -> Result<String, MatchError>;

    /// One target line, such as `B 7`.
    fn target(&mut self, prompt: &TargetPrompt) -> Result<String, MatchError>;

    fn notify(&mut self, event: &Event);

    /// Show every ship on every board (debugging aid).
    fn reveal_all(&self) -> bool {
        false
    }
}

/// Frontend for matches with no people in them.
pub struct Headless;

impl Frontend for Headless {
    fn placement_command(&mut self, _prompt: &PlacementPrompt) -> Result<String, MatchError> {
        Err(MatchError::InputClosed)
    }

    fn target(&mut self, _prompt: &TargetPrompt) -> Result<String, MatchError> {
        Err(MatchError::InputClosed)
    }

    fn notify(&mut self, _event: &Event) {}
}

/// Where a match is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Placement(PlayerId),
    SelectStartingPlayer,
    TurnLoop,
    MatchOver { winner: PlayerId },
}

/// One player's end-of-match statistics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub human: bool,
    /// Targets in the order they were fired.
    pub guesses: Vec<Coord>,
    pub total_shots: u32,
    pub hits: u32,
    pub misses: u32,
    pub hit_miss_ratio: Option<f64>,
    /// Opponent ships this player sank.
    pub ships_sunk: Vec<SunkShip>,
    /// Own ships lost.
    pub ships_lost: usize,
    /// Own board at the end, fully revealed.
    pub board: GridView,
}

impl PlayerSummary {
    fn capture(player: &Player, opponent: &Player) -> Self {
        Self {
            id: player.id(),
            human: player.is_human(),
            guesses: player.guessed_cells().to_vec(),
            total_shots: player.total_shots(),
            hits: player.hits(),
            misses: player.misses(),
            hit_miss_ratio: player.hit_miss_ratio(),
            ships_sunk: opponent.board().sunk_ships().to_vec(),
            ships_lost: player.board().sunk_ships().len(),
            board: player.view(opponent, true),
        }
    }
}

/// Final outcome of a match.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MatchResult {
    pub pvp: bool,
    pub winner: PlayerId,
    /// Shots fired by both players together.
    pub turns: u32,
    pub players: [PlayerSummary; 2],
}

impl MatchResult {
    pub fn winner_summary(&self) -> &PlayerSummary {
        &self.players[self.winner.index()]
    }
}

/// Every match played in one sitting.
#[derive(Debug, Default)]
pub struct Session {
    games: Vec<MatchResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: MatchResult) {
        self.games.push(result);
    }

    pub fn games(&self) -> &[MatchResult] {
        &self.games
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Games won by `id`.
    pub fn wins(&self, id: PlayerId) -> usize {
        self.games.iter().filter(|g| g.winner == id).count()
    }
}

/// Two players, their boards, whose turn it is and the computer's hunt memory.
pub struct Match {
    pvp: bool,
    players: [Player; 2],
    hunts: [HuntState; 2],
    phase: Phase,
    active: PlayerId,
    turns: u32,
    /// Target handed out by `next_move` and not yet fired.
    pending: Option<Coord>,
}

impl Match {
    /// Player one is always a person; player two is a person only in PvP.
    pub fn new(pvp: bool) -> Self {
        Self::with_players(
            pvp,
            Player::new(PlayerId::One, true),
            Player::new(PlayerId::Two, pvp),
        )
    }

    pub fn with_players(pvp: bool, one: Player, two: Player) -> Self {
        Self {
            pvp,
            players: [one, two],
            hunts: [HuntState::new(); 2],
            phase: Phase::Placement(PlayerId::One),
            active: PlayerId::One,
            turns: 0,
            pending: None,
        }
    }

    pub fn is_pvp(&self) -> bool {
        self.pvp
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Player whose turn it is.
    pub fn active(&self) -> PlayerId {
        self.active
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    pub fn hunt(&self, id: PlayerId) -> &HuntState {
        &self.hunts[id.index()]
    }

    /// Run both placement phases. People are prompted ship by ship, the
    /// computer places at random.
    pub fn place_fleets<F, R>(&mut self, frontend: &mut F, rng: &mut R) -> Result<(), MatchError>
    where
        F: Frontend + ?Sized,
        R: Rng + ?Sized,
    {
        for id in [PlayerId::One, PlayerId::Two] {
            self.phase = Phase::Placement(id);
            let (player, opponent) = split(&mut self.players, id);
            if player.is_human() {
                run_placement(player, opponent, frontend)?;
            } else {
                run_computer_placement(player.board_mut(), rng)?;
                frontend.notify(&Event::FleetDeployed { player: id });
            }
            info!("{} fleet placed", id);
        }
        self.phase = Phase::SelectStartingPlayer;
        Ok(())
    }

    /// Pick who shoots first at random and enter the turn loop.
    pub fn choose_starting_player<R: Rng + ?Sized>(&mut self, rng: &mut R) -> PlayerId {
        let first = if rng.random_bool(0.5) {
            PlayerId::One
        } else {
            PlayerId::Two
        };
        self.start_with(first);
        first
    }

    /// Enter the turn loop with `first` to move.
    pub fn start_with(&mut self, first: PlayerId) {
        info!("{} starts", first);
        self.active = first;
        self.phase = Phase::TurnLoop;
    }

    /// Obtain the active player's next target. It is already recorded as
    /// guessed when this returns; asking again before firing yields the same
    /// target.
    pub fn next_move<F, R>(&mut self, frontend: &mut F, rng: &mut R) -> Result<Coord, MatchError>
    where
        F: Frontend + ?Sized,
        R: Rng + ?Sized,
    {
        if self.phase != Phase::TurnLoop {
            return Err(MatchError::NotInPlay);
        }
        if let Some(target) = self.pending {
            return Ok(target);
        }
        let hunt = &mut self.hunts[self.active.index()];
        let (attacker, defender) = split(&mut self.players, self.active);
        let target = if attacker.is_human() {
            next_human_move(attacker, defender, frontend)?
        } else {
            next_computer_move(attacker, defender, hunt, rng)?
        };
        self.pending = Some(target);
        Ok(target)
    }

    /// Resolve the active player's shot at `target`, then either end the match
    /// or pass the turn. `target` is either the one returned by
    /// [`Match::next_move`] or a cell the player has not guessed yet; anything
    /// else fails with [`TargetError::AlreadyGuessed`] and changes nothing.
    /// A fresh cell fired while a chosen target is outstanding fails with
    /// [`MatchError::PendingTarget`].
    pub fn fire(&mut self, target: Coord) -> Result<ShotReport, MatchError> {
        if self.phase != Phase::TurnLoop {
            return Err(MatchError::NotInPlay);
        }
        let attacker_id = self.active;
        let (attacker, defender) = split(&mut self.players, attacker_id);
        match self.pending {
            Some(pending) if pending == target => {}
            _ if attacker.is_guessed(target) => {
                return Err(TargetError::AlreadyGuessed(target).into());
            }
            Some(pending) => return Err(MatchError::PendingTarget(pending)),
            None => attacker.add_guessed_cell(target)?,
        }
        self.pending = None;
        let moves = attacker.total_shots() + 1;
        let result = defender.board_mut().receive_shot(target, moves)?;
        attacker.record_shot(result);
        let ship = match result {
            GuessResult::Hit(id) | GuessResult::Sink(id) => Some(defender.board().ship(id)?.name()),
            GuessResult::Miss => None,
        };
        if !attacker.is_human() {
            self.hunts[attacker_id.index()].observe(target, result);
        }
        self.turns += 1;
        debug!("{} fires at {}: {:?}", attacker_id, target, result);

        let defender_view = defender.view(attacker, false);
        if defender.board().all_sunk() {
            info!("{} wins after {} turns", attacker_id, self.turns);
            self.phase = Phase::MatchOver {
                winner: attacker_id,
            };
        } else {
            self.active = attacker_id.other();
        }
        Ok(ShotReport {
            attacker: attacker_id,
            target,
            result,
            ship,
            defender_view,
        })
    }

    /// Summary once the match is over.
    pub fn result(&self) -> Option<MatchResult> {
        let Phase::MatchOver { winner } = self.phase else {
            return None;
        };
        let [one, two] = &self.players;
        Some(MatchResult {
            pvp: self.pvp,
            winner,
            turns: self.turns,
            players: [
                PlayerSummary::capture(one, two),
                PlayerSummary::capture(two, one),
            ],
        })
    }

    /// Drive the whole state machine to the end.
    pub fn play<F, R>(&mut self, frontend: &mut F, rng: &mut R) -> Result<MatchResult, MatchError>
    where
        F: Frontend + ?Sized,
        R: Rng + ?Sized,
    {
        self.place_fleets(frontend, rng)?;
        let first = self.choose_starting_player(rng);
        frontend.notify(&Event::StartingPlayer(first));
        loop {
            let target = self.next_move(frontend, rng)?;
            let mut report = self.fire(target)?;
            if frontend.reveal_all() {
                let defender = self.player(report.attacker.other());
                report.defender_view = defender.view(self.player(report.attacker), true);
            }
            frontend.notify(&Event::Shot(report));
            if let Phase::MatchOver { winner } = self.phase {
                frontend.notify(&Event::MatchOver { winner });
                return self.result().ok_or(MatchError::NotInPlay);
            }
        }
    }
}

/// Attacker and defender, in that order.
fn split(players: &mut [Player; 2], first: PlayerId) -> (&mut Player, &mut Player) {
    let [one, two] = players;
    match first {
        PlayerId::One => (one, two),
        PlayerId::Two => (two, one),
    }
}

/// Play one match: player one is a person, player two is a person in PvP and
/// the computer otherwise.
pub fn run_match<F, R>(pvp: bool, frontend: &mut F, rng: &mut R) -> Result<MatchResult, MatchError>
where
    F: Frontend + ?Sized,
    R: Rng + ?Sized,
{
    Match::new(pvp).play(frontend, rng)
}
