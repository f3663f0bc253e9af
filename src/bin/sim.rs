use broadside::{init_logging, Headless, Match, Player, PlayerId};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

/// Computer against computer, printing the outcome as one JSON line.
fn main() -> anyhow::Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <seed>", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut game = Match::with_players(
        false,
        Player::new(PlayerId::One, false),
        Player::new(PlayerId::Two, false),
    );
    let result = game.play(&mut Headless, &mut rng)?;

    let out = json!({
        "seed": seed,
        "winner": result.winner.number(),
        "turns": result.turns,
        "players": result.players,
    });
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}
