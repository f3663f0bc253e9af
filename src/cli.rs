//! Terminal presentation layer: board rendering, prompts, menu and stats.
//!
//! Everything here only reads the engine's snapshots ([`GridView`],
//! [`MatchResult`]) and hands raw input lines back to it.

use std::io::{self, BufRead, Write};

use log::warn;

use crate::{
    board::GridView,
    common::{join_coords, GuessResult, MatchError},
    config::COLUMNS,
    game::{Event, Frontend, MatchResult, PlacementPrompt, PlayerSummary, Session, TargetPrompt},
    player::PlayerId,
    ship::Color,
};

/// Rules screen, adapted from the physical game.
pub const RULES: &str = "\
BOARD SYMBOLS
  .  open water          S  your ship (coloured by class)
  o  missed shot         X  hit ship cell
  #  ship being placed

OBJECTIVE
  Sink every ship of the other player before they sink yours.

SETUP
  Each player places 5 ships: Carrier (5), Battleship (4), Cruiser (3),
  Submarine (3) and Destroyer (2). Ships lie horizontally or vertically,
  never diagonally, never off the board and never on top of each other.
  Move the ship with W A S D, turn it with R and press N to drop it.

PLAYING
  Take turns calling a cell such as 'B 7'. A shot reports hit or miss; a ship
  is sunk once all of its cells are hit. The first player to sink the whole
  enemy fleet wins. A cell can only be targeted once.
";

/// Choice on the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Play,
    Rules,
    Exit,
}

/// How a player is addressed on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Names {
    /// "Player 1", "The Computer"
    pub name: &'static str,
    /// "Player 1", "You"
    pub subject: &'static str,
    /// "Player 1's", "Your"
    pub possessive: &'static str,
}

/// Player-facing names. Against the computer, player one is "you".
pub fn names(id: PlayerId, pvp: bool) -> Names {
    match (pvp, id) {
        (true, PlayerId::One) => Names {
            name: "Player 1",
            subject: "Player 1",
            possessive: "Player 1's",
        },
        (true, PlayerId::Two) => Names {
            name: "Player 2",
            subject: "Player 2",
            possessive: "Player 2's",
        },
        (false, PlayerId::One) => Names {
            name: "Player",
            subject: "You",
            possessive: "Your",
        },
        (false, PlayerId::Two) => Names {
            name: "The Computer",
            subject: "The Computer",
            possessive: "The Computer's",
        },
    }
}

fn ansi(color: Color) -> &'static str {
    match color {
        Color::Blue => "\x1b[34m",
        Color::Cyan => "\x1b[36m",
        Color::Yellow => "\x1b[33m",
        Color::Magenta => "\x1b[35m",
        Color::Green => "\x1b[32m",
    }
}

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Render a board snapshot as text, one line per row.
pub fn render_grid(grid: &GridView, color: bool) -> String {
    let mut out = String::from("    ");
    for letter in COLUMNS.chars() {
        out.push(' ');
        out.push(letter);
    }
    out.push('\n');
    for (r, row) in grid.iter().enumerate() {
        out.push_str(&format!("{:3} ", r + 1));
        for cell in row {
            out.push(' ');
            let (glyph, tint) = if cell.hit {
                ('X', Some(RED))
            } else if cell.is_miss() {
                ('o', None)
            } else if let Some(ship) = cell.ship {
                (if cell.pending { '#' } else { 'S' }, Some(ansi(ship)))
            } else {
                ('.', None)
            };
            match tint {
                Some(code) if color => {
                    out.push_str(code);
                    out.push(glyph);
                    out.push_str(RESET);
                }
                _ => out.push(glyph),
            }
        }
        out.push('\n');
    }
    out
}

/// Line-oriented terminal frontend over any reader and writer.
pub struct TerminalFrontend<R, W> {
    input: R,
    out: W,
    pvp: bool,
    color: bool,
    reveal: bool,
}

impl TerminalFrontend<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(color: bool, reveal: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), color, reveal)
    }
}

impl<R: BufRead, W: Write> TerminalFrontend<R, W> {
    pub fn new(input: R, out: W, color: bool, reveal: bool) -> Self {
        Self {
            input,
            out,
            pvp: true,
            color,
            reveal,
        }
    }

    /// Set how players are addressed for the next match.
    pub fn set_pvp(&mut self, pvp: bool) {
        self.pvp = pvp;
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.out)
    }

    fn names(&self, id: PlayerId) -> Names {
        names(id, self.pvp)
    }

    fn read_line(&mut self) -> Result<String, MatchError> {
        write!(self.out, "\n> ")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(MatchError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    fn grid(&mut self, title: &str, grid: &GridView) -> io::Result<()> {
        writeln!(self.out, "\n{}:\n", title)?;
        write!(self.out, "{}", render_grid(grid, self.color))
    }

    /// Main menu; loops until one of the numbered options is picked.
    pub fn menu(&mut self, first_game: bool) -> Result<MenuChoice, MatchError> {
        loop {
            writeln!(self.out, "\nWhat would you like to do? (choose a number)\n")?;
            let play = if first_game { "Play Battleship" } else { "Play Again" };
            let exit = if first_game {
                "Exit"
            } else {
                "Exit & View All Game Stats"
            };
            writeln!(self.out, "1. {}\n2. View The Rules\n3. {}", play, exit)?;
            match self.read_line()?.as_str() {
                "1" => return Ok(MenuChoice::Play),
                "2" => return Ok(MenuChoice::Rules),
                "3" => return Ok(MenuChoice::Exit),
                other => writeln!(self.out, "'{}' is not one of the options.", other)?,
            }
        }
    }

    /// Ask for the play style. Returns `true` for player versus player.
    pub fn choose_mode(&mut self) -> Result<bool, MatchError> {
        loop {
            writeln!(self.out, "\nChoose a play style.\n\n1. Player v. Computer\n2. Player v. Player")?;
            match self.read_line()?.as_str() {
                "1" => return Ok(false),
                "2" => return Ok(true),
                other => writeln!(self.out, "'{}' is not one of the options.", other)?,
            }
        }
    }

    pub fn print_rules(&mut self) -> io::Result<()> {
        writeln!(self.out, "\n{}", RULES)
    }

    /// Stats for every game of the session, in order.
    pub fn print_session(&mut self, session: &Session) -> io::Result<()> {
        if session.is_empty() {
            return writeln!(self.out, "Goodbye!");
        }
        for (n, game) in session.games().iter().enumerate() {
            if n > 0 {
                writeln!(self.out, "\n~----------------------------------------~")?;
            }
            self.print_result(n + 1, game)?;
        }
        Ok(())
    }

    fn print_result(&mut self, number: usize, game: &MatchResult) -> io::Result<()> {
        let winner = names(game.winner, game.pvp);
        writeln!(self.out, "\nGame {}:\n\nWinner: {}", number, winner.subject)?;
        writeln!(self.out, "Total turns: {}", game.turns)?;
        for summary in &game.players {
            self.print_summary(summary, game.pvp)?;
        }
        Ok(())
    }

    fn print_summary(&mut self, s: &PlayerSummary, pvp: bool) -> io::Result<()> {
        let me = names(s.id, pvp);
        let them = names(s.id.other(), pvp);
        writeln!(self.out, "\n{} Stats:\n", me.possessive)?;
        let guesses = if s.guesses.is_empty() {
            "N/A".to_string()
        } else {
            join_coords(&s.guesses)
        };
        writeln!(self.out, "Guesses: {}", guesses)?;
        writeln!(self.out, "Total Guesses: {}", s.total_shots)?;
        writeln!(self.out, "Hits: {}", s.hits)?;
        writeln!(self.out, "Misses: {}", s.misses)?;
        match s.hit_miss_ratio {
            Some(ratio) => writeln!(self.out, "Hit To Miss Ratio: {:.2}", ratio)?,
            None => writeln!(self.out, "Hit To Miss Ratio: (Insufficient Data)")?,
        }
        writeln!(self.out, "\nShips {} Sunk:", me.subject)?;
        if s.ships_sunk.is_empty() {
            writeln!(self.out, "(None)")?;
        }
        for ship in &s.ships_sunk {
            let plural = if ship.moves_to_sink == 1 { "" } else { "s" };
            writeln!(
                self.out,
                "{} Sunk {} {} After {} Move{}.",
                me.subject, them.possessive, ship.name, ship.moves_to_sink, plural
            )?;
        }
        let title = format!("{} Board", me.possessive);
        self.grid(&title, &s.board)
    }
}

impl<R: BufRead, W: Write> Frontend for TerminalFrontend<R, W> {
    fn placement_command(&mut self, prompt: &PlacementPrompt) -> Result<String, MatchError> {
        let who = self.names(prompt.player);
        writeln!(
            self.out,
            "\n{}, place your {} using the W A S D keys. This ship takes up {} spaces.",
            who.name,
            prompt.ship.name(),
            prompt.ship.length()
        )?;
        writeln!(self.out, "Hint: type N to place it and move on, or R to rotate it.")?;
        self.grid("Your board", &prompt.view)?;
        self.read_line()
    }

    fn target(&mut self, prompt: &TargetPrompt) -> Result<String, MatchError> {
        let me = self.names(prompt.player);
        let them = self.names(prompt.player.other());
        writeln!(
            self.out,
            "\n{}, pick a cell to attack! The format is 'X Y', for example 'A 5'.",
            me.name
        )?;
        self.grid(&format!("{} Board", them.possessive), &prompt.enemy)?;
        self.grid(&format!("{} Board", me.possessive), &prompt.own)?;
        self.read_line()
    }

    fn notify(&mut self, event: &Event) {
        if let Err(e) = self.show(event) {
            warn!("could not show {}: {}", event_name(event), e);
        }
    }

    fn reveal_all(&self) -> bool {
        self.reveal
    }
}

impl<R: BufRead, W: Write> TerminalFrontend<R, W> {
    fn show(&mut self, event: &Event) -> io::Result<()> {
        match event {
            Event::Rejected { reason, .. } => writeln!(self.out, "\nError! {}", reason),
            Event::ShipPlaced { ship, run, .. } => {
                writeln!(self.out, "\n{} placed at {}.", ship.name(), run)
            }
            Event::FleetDeployed { player } => {
                let who = self.names(*player);
                writeln!(self.out, "\n{} has placed its ships!", who.name)
            }
            Event::StartingPlayer(id) => {
                let who = self.names(*id);
                writeln!(self.out, "\n{} starting first!", who.subject)
            }
            Event::Shot(report) => {
                let me = self.names(report.attacker);
                let them = self.names(report.attacker.other());
                match (report.result, report.ship) {
                    (GuessResult::Miss, _) => writeln!(
                        self.out,
                        "\n{} shot missed {} ships at {}.",
                        me.possessive, them.possessive, report.target
                    )?,
                    (GuessResult::Hit(_), Some(ship)) => writeln!(
                        self.out,
                        "\n{} shot hit {} {} at {}!",
                        me.possessive, them.possessive, ship, report.target
                    )?,
                    (GuessResult::Sink(_), Some(ship)) => writeln!(
                        self.out,
                        "\n{} sunk {} {} at {}!",
                        me.subject, them.possessive, ship, report.target
                    )?,
                    (_, None) => writeln!(self.out, "\n{} hit at {}!", me.subject, report.target)?,
                }
                self.grid(&format!("{} Board", them.possessive), &report.defender_view)
            }
            Event::MatchOver { winner } => {
                let me = self.names(*winner);
                let them = self.names(winner.other());
                writeln!(
                    self.out,
                    "\n{} won! {} ships have all been sunk.",
                    me.subject, them.possessive
                )
            }
        }
    }
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Rejected { .. } => "rejection",
        Event::ShipPlaced { .. } => "ship placement",
        Event::FleetDeployed { .. } => "fleet deployment",
        Event::StartingPlayer(_) => "starting player",
        Event::Shot(_) => "shot",
        Event::MatchOver { .. } => "match result",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CellView;
    use std::io::Cursor;

    #[test]
    fn grid_marks_hits_misses_and_ships() {
        let mut grid: GridView = [[CellView::default(); 10]; 10];
        grid[0][0] = CellView {
            ship: Some(Color::Blue),
            hit: true,
            guessed: true,
            pending: false,
        };
        grid[0][1].guessed = true;
        grid[0][2].ship = Some(Color::Green);
        grid[0][3] = CellView {
            ship: Some(Color::Cyan),
            pending: true,
            ..CellView::default()
        };
        let text = render_grid(&grid, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "     A B C D E F G H I J");
        assert_eq!(lines[1], "  1  X o S # . . . . . .");
        assert_eq!(lines.len(), 11);
        assert!(render_grid(&grid, true).contains(RED));
    }

    #[test]
    fn menu_retries_until_valid() {
        let input = Cursor::new("9\nfoo\n2\n");
        let mut ui = TerminalFrontend::new(input, Vec::new(), false, false);
        assert_eq!(ui.menu(true).unwrap(), MenuChoice::Rules);
        let (_, out) = ui.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("'9' is not one of the options."));
        assert!(out.contains("Play Battleship"));
    }

    #[test]
    fn closed_input_is_reported() {
        let mut ui = TerminalFrontend::new(Cursor::new(""), Vec::new(), false, false);
        assert!(matches!(ui.choose_mode(), Err(MatchError::InputClosed)));
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_surface_on_next_prompt() {
        let mut ui = TerminalFrontend::new(Cursor::new("1\n"), Broken, false, false);
        // events are fire-and-forget; the failure is logged, not raised
        ui.notify(&Event::StartingPlayer(PlayerId::One));
        assert!(matches!(ui.menu(true), Err(MatchError::Io(_))));
    }

    #[test]
    fn computer_mode_addresses_player_as_you() {
        assert_eq!(names(PlayerId::One, false).subject, "You");
        assert_eq!(names(PlayerId::Two, false).possessive, "The Computer's");
        assert_eq!(names(PlayerId::Two, true).name, "Player 2");
    }
}
