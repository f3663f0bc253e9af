mod board;
mod common;
mod config;
mod coord;
mod game;
mod logging;
mod placement;
mod player;
mod ship;
mod targeting;
#[cfg(feature = "cli")]
pub mod cli;

pub use board::*;
pub use common::*;
pub use config::*;
pub use coord::*;
pub use game::*;
pub use logging::init_logging;
pub use placement::*;
pub use player::*;
pub use ship::*;
pub use targeting::*;
