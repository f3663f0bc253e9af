use broadside::{Headless, Match, Phase, Player, PlayerId, SHIPS, TOTAL_SHIP_CELLS};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn computer_match() -> Match {
    Match::with_players(
        false,
        Player::new(PlayerId::One, false),
        Player::new(PlayerId::Two, false),
    )
}

#[test]
fn test_computer_vs_computer_game() {
    let mut rng = SmallRng::seed_from_u64(123);
    let mut game = computer_match();
    let result = game.play(&mut Headless, &mut rng).unwrap();

    assert_eq!(game.phase(), Phase::MatchOver { winner: result.winner });
    let winner = result.winner_summary();
    assert_eq!(winner.hits as usize, TOTAL_SHIP_CELLS);
    assert_eq!(winner.ships_sunk.len(), SHIPS.len());
    assert!(winner.total_shots <= 100);
    for p in &result.players {
        assert_eq!(p.total_shots, p.hits + p.misses);
        assert_eq!(p.guesses.len() as u32, p.total_shots);
    }
    let loser = &result.players[result.winner.other().index()];
    assert!(loser.ships_sunk.len() < SHIPS.len());
    assert_eq!(loser.ships_lost, SHIPS.len());
}

#[test]
fn test_many_seeds_terminate() {
    for seed in 0..25 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let result = computer_match().play(&mut Headless, &mut rng).unwrap();
        let shots: u32 = result.players.iter().map(|p| p.total_shots).sum();
        assert_eq!(shots, result.turns);
        // the winner never fires fewer times than the loser
        let w = result.winner_summary().total_shots;
        let l = result.players[result.winner.other().index()].total_shots;
        assert!(w == l || w == l + 1);
    }
}

#[test]
fn test_same_seed_same_game() {
    let a = computer_match().play(&mut Headless, &mut SmallRng::seed_from_u64(5)).unwrap();
    let b = computer_match().play(&mut Headless, &mut SmallRng::seed_from_u64(5)).unwrap();
    assert_eq!(a, b);
}
