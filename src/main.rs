use broadside::{
    cli::{MenuChoice, TerminalFrontend},
    init_logging, run_match, MatchError, Session,
};
use clap::{Parser, Subcommand};
use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about = "Two-player Battleship in the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(long, global = true, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, global = true, help = "Show every ship on every board")]
    reveal: bool,
    #[arg(long, global = true, help = "Disable ANSI colours")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Menu-driven session with rules and per-game stats (default).
    Play,
    /// One match between two people at the same keyboard.
    Pvp,
    /// One match against the computer.
    Pvc,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(s) => {
            info!("using fixed seed {}", s);
            SmallRng::seed_from_u64(s)
        }
        None => SmallRng::from_rng(&mut rand::rng()),
    };
    let mut ui = TerminalFrontend::stdio(!cli.no_color, cli.reveal);
    let mut session = Session::new();

    let outcome = match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => menu_loop(&mut ui, &mut session, &mut rng),
        Commands::Pvp => single(true, &mut ui, &mut session, &mut rng),
        Commands::Pvc => single(false, &mut ui, &mut session, &mut rng),
    };
    match outcome {
        // stdin closed mid-game: show what was finished and leave quietly
        Err(MatchError::InputClosed) => {}
        other => other?,
    }
    ui.print_session(&session)?;
    Ok(())
}

type Terminal = TerminalFrontend<std::io::StdinLock<'static>, std::io::Stdout>;

fn single(
    pvp: bool,
    ui: &mut Terminal,
    session: &mut Session,
    rng: &mut SmallRng,
) -> Result<(), MatchError> {
    ui.set_pvp(pvp);
    session.record(run_match(pvp, ui, rng)?);
    Ok(())
}

fn menu_loop(ui: &mut Terminal, session: &mut Session, rng: &mut SmallRng) -> Result<(), MatchError> {
    loop {
        match ui.menu(session.is_empty())? {
            MenuChoice::Play => {
                let pvp = ui.choose_mode()?;
                single(pvp, ui, session, rng)?;
            }
            MenuChoice::Rules => ui.print_rules()?,
            MenuChoice::Exit => return Ok(()),
        }
    }
}
