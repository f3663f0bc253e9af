use std::collections::VecDeque;

use broadside::{
    Coord, Event, Frontend, GuessResult, Match, MatchError, Phase, PlacementError,
    PlacementPrompt, PlayerId, Rejection, ShipId, TargetError, TargetPrompt, SHIPS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Frontend fed from canned input, one queue per player.
#[derive(Default)]
struct Scripted {
    placement: [VecDeque<String>; 2],
    targets: [VecDeque<String>; 2],
    events: Vec<Event>,
}

impl Scripted {
    fn rejections(&self) -> Vec<&Rejection> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Rejected { reason, .. } => Some(reason),
                _ => None,
            })
            .collect()
    }
}

impl Frontend for Scripted {
    fn placement_command(&mut self, prompt: &PlacementPrompt) -> Result<String, MatchError> {
        self.placement[prompt.player.index()]
            .pop_front()
            .ok_or(MatchError::InputClosed)
    }

    fn target(&mut self, prompt: &TargetPrompt) -> Result<String, MatchError> {
        self.targets[prompt.player.index()]
            .pop_front()
            .ok_or(MatchError::InputClosed)
    }

    fn notify(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}

/// Keys that drop ship `i` on row `i`, starting at column A.
fn row_per_ship() -> VecDeque<String> {
    let mut keys = VecDeque::new();
    for i in 0..SHIPS.len() {
        keys.extend(std::iter::repeat("s".to_string()).take(i));
        keys.push_back("n".to_string());
    }
    keys
}

/// Every ship cell of a row-per-ship fleet, as typed targets.
fn fleet_targets() -> VecDeque<String> {
    let mut out = VecDeque::new();
    for (row, ship) in SHIPS.iter().enumerate() {
        for x in 0..ship.length() {
            out.push_back(Coord { x: x as u8, y: row as u8 }.to_string());
        }
    }
    out
}

fn misses(n: usize) -> VecDeque<String> {
    // rows 7-10 are open water in a row-per-ship fleet
    (0..n)
        .map(|i| format!("{} {}", "ABCDEFGHIJ".as_bytes()[i % 10] as char, 7 + i / 10))
        .collect()
}

#[test]
fn test_pvp_match_ends_on_last_sinking_shot() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut ui = Scripted::default();
    ui.placement = [row_per_ship(), row_per_ship()];
    ui.targets = [fleet_targets(), misses(20)];

    let mut game = Match::new(true);
    game.place_fleets(&mut ui, &mut rng).unwrap();
    assert_eq!(game.phase(), Phase::SelectStartingPlayer);
    game.start_with(PlayerId::One);

    let total = fleet_targets().len();
    for shot in 1..=total {
        assert_eq!(game.phase(), Phase::TurnLoop);
        let target = game.next_move(&mut ui, &mut rng).unwrap();
        let report = game.fire(target).unwrap();
        assert_eq!(report.attacker, PlayerId::One);
        assert!(report.result.is_hit());
        if shot < total {
            let reply = game.next_move(&mut ui, &mut rng).unwrap();
            assert_eq!(game.fire(reply).unwrap().result, GuessResult::Miss);
        }
    }
    assert_eq!(game.phase(), Phase::MatchOver { winner: PlayerId::One });
    assert!(matches!(game.next_move(&mut ui, &mut rng), Err(MatchError::NotInPlay)));

    let result = game.result().unwrap();
    assert_eq!(result.winner, PlayerId::One);
    assert_eq!(result.turns as usize, total * 2 - 1);
    let winner = result.winner_summary();
    assert_eq!(winner.hits as usize, total);
    assert_eq!(winner.misses, 0);
    assert_eq!(winner.hit_miss_ratio, Some(total as f64));
    assert_eq!(winner.ships_sunk.len(), SHIPS.len());
    // carrier went down on the fifth shot, destroyer on the last
    assert_eq!(winner.ships_sunk[0].moves_to_sink, 5);
    assert_eq!(winner.ships_sunk[4].moves_to_sink as usize, total);
    let loser = &result.players[1];
    assert_eq!(loser.hit_miss_ratio, None);
    assert_eq!(loser.ships_lost, SHIPS.len());
}

#[test]
fn test_bad_input_is_reprompted() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut ui = Scripted::default();
    let mut keys = row_per_ship();
    // bad key, move off the top, then try to drop the battleship onto the carrier
    keys.push_front("q".into());
    keys.insert(2, "w".into());
    keys.insert(3, "n".into());
    ui.placement = [keys, row_per_ship()];
    ui.targets[0] = ["K 1", "A 1", "A 1", "B 1"].map(String::from).into();
    ui.targets[1] = ["J 10"].map(String::from).into();

    let mut game = Match::new(true);
    game.place_fleets(&mut ui, &mut rng).unwrap();
    game.start_with(PlayerId::One);

    let first = game.next_move(&mut ui, &mut rng).unwrap();
    assert_eq!(game.fire(first).unwrap().result, GuessResult::Hit(ShipId(0)));
    let reply = game.next_move(&mut ui, &mut rng).unwrap();
    game.fire(reply).unwrap();
    let second = game.next_move(&mut ui, &mut rng).unwrap();
    assert_eq!(second, Coord { x: 1, y: 0 });

    let reasons = ui.rejections();
    assert_eq!(reasons.len(), 5);
    assert!(matches!(reasons[0], Rejection::Command(_)));
    assert!(matches!(reasons[1], Rejection::Placement(PlacementError::IllegalMove(_))));
    assert!(matches!(reasons[2], Rejection::Placement(PlacementError::Collision(_))));
    assert!(matches!(reasons[3], Rejection::Target(TargetError::Malformed(_))));
    assert!(matches!(
        reasons[4],
        Rejection::Target(TargetError::AlreadyGuessed(Coord { x: 0, y: 0 }))
    ));
    assert_eq!(game.player(PlayerId::One).guessed_cells().len(), 2);
}

#[test]
fn test_computer_opponent_needs_no_input() {
    let mut rng = SmallRng::seed_from_u64(99);
    let mut ui = Scripted::default();
    ui.placement[0] = row_per_ship();
    // every cell, column by column; more than enough to finish
    ui.targets[0] = (0..100)
        .map(|i| Coord { x: (i / 10) as u8, y: (i % 10) as u8 }.to_string())
        .collect();

    let result = Match::new(false).play(&mut ui, &mut rng).unwrap();
    assert!(!result.pvp);
    assert!(!result.players[1].human);
    assert!(ui
        .events
        .iter()
        .any(|e| matches!(e, Event::FleetDeployed { player: PlayerId::Two })));
    assert!(matches!(ui.events.last(), Some(Event::MatchOver { .. })));
    let shots: u32 = result.players.iter().map(|p| p.total_shots).sum();
    assert_eq!(shots, result.turns);
}

fn ready_pvp(rng: &mut SmallRng) -> (Match, Scripted) {
    let mut ui = Scripted::default();
    ui.placement = [row_per_ship(), row_per_ship()];
    let mut game = Match::new(true);
    assert!(game.is_pvp());
    game.place_fleets(&mut ui, rng).unwrap();
    game.start_with(PlayerId::One);
    (game, ui)
}

#[test]
fn test_repeat_shot_is_refused_without_counting() {
    let mut rng = SmallRng::seed_from_u64(2);
    let (mut game, _) = ready_pvp(&mut rng);
    let open_water = Coord { x: 9, y: 9 };

    assert_eq!(game.fire(open_water).unwrap().result, GuessResult::Miss);
    game.fire(Coord { x: 0, y: 0 }).unwrap();
    let err = game.fire(open_water).unwrap_err();
    assert!(matches!(err, MatchError::Target(TargetError::AlreadyGuessed(c)) if c == open_water));

    // still player one's turn, nothing counted
    assert_eq!(game.active(), PlayerId::One);
    let one = game.player(PlayerId::One);
    assert_eq!((one.total_shots(), one.misses(), one.hits()), (1, 1, 0));
    assert_eq!(one.guessed_cells(), &[open_water]);
    assert_eq!(one.total_shots() as usize, one.guessed_cells().len());
}

#[test]
fn test_chosen_target_must_be_fired() {
    let mut rng = SmallRng::seed_from_u64(3);
    let (mut game, mut ui) = ready_pvp(&mut rng);
    ui.targets[0] = ["C 3"].map(String::from).into();

    let chosen = game.next_move(&mut ui, &mut rng).unwrap();
    // asking again hands back the same cell without another prompt
    assert_eq!(game.next_move(&mut ui, &mut rng).unwrap(), chosen);
    assert!(matches!(
        game.fire(Coord { x: 5, y: 5 }),
        Err(MatchError::PendingTarget(c)) if c == chosen
    ));
    assert_eq!(game.fire(chosen).unwrap().target, chosen);
    assert_eq!(game.player(PlayerId::One).guessed_cells(), &[chosen]);
}

#[test]
fn test_computer_hunt_starts_on_first_hit() {
    let mut rng = SmallRng::seed_from_u64(12);
    let mut ui = Scripted::default();
    let mut game = Match::with_players(
        false,
        broadside::Player::new(PlayerId::One, false),
        broadside::Player::new(PlayerId::Two, false),
    );
    assert!(!game.is_pvp());
    game.place_fleets(&mut ui, &mut rng).unwrap();
    game.start_with(PlayerId::One);

    loop {
        let shooter = game.active();
        let target = game.next_move(&mut ui, &mut rng).unwrap();
        let report = game.fire(target).unwrap();
        if shooter == PlayerId::One && report.result.is_hit() {
            // no ship is a single cell, so the first hit never sinks
            assert_eq!(game.hunt(PlayerId::One).origin(), Some(target));
            assert_eq!(game.hunt(PlayerId::One).current(), None);
            break;
        }
        if shooter == PlayerId::One {
            assert!(!game.hunt(PlayerId::One).is_hunting());
        }
    }
}
