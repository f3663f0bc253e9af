use crate::ship::{Color, ShipClass};

pub const BOARD_SIZE: u8 = 10;
pub const NUM_SHIPS: usize = 5;
pub const SHIPS: [ShipClass; NUM_SHIPS] = [
    ShipClass::new("Carrier", 5, Color::Blue),
    ShipClass::new("Battleship", 4, Color::Cyan),
    ShipClass::new("Cruiser", 3, Color::Yellow),
    ShipClass::new("Submarine", 3, Color::Magenta),
    ShipClass::new("Destroyer", 2, Color::Green),
];

/// Number of board cells covered by a full roster.
pub const TOTAL_SHIP_CELLS: usize = {
    let mut total = 0;
    let mut i = 0;
    while i < NUM_SHIPS {
        total += SHIPS[i].length();
        i += 1;
    }
    total
};

/// Column labels, left to right.
pub const COLUMNS: &str = "ABCDEFGHIJ";

/// Environment variable read by [`crate::init_logging`].
pub const LOG_ENV: &str = "BROADSIDE_LOG";
