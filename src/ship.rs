//! Ship classes from the roster, live ships and sunk-ship snapshots.

use core::fmt;

/// Display colour attached to a ship class. Only the presentation layer
/// interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Color {
    Blue,
    Cyan,
    Yellow,
    Magenta,
    Green,
}

/// Roster entry: name, length and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipClass {
    name: &'static str,
    length: usize,
    color: Color,
}

impl ShipClass {
    /// Create a new ship class.
    pub const fn new(name: &'static str, length: usize, color: Color) -> Self {
        Self {
            name,
            length,
            color,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn length(&self) -> usize {
        self.length
    }

    pub const fn color(&self) -> Color {
        self.color
    }
}

/// Index of a ship in the roster, and in every board's fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShipId(pub usize);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A ship afloat on one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ship {
    class: ShipClass,
    health: usize,
}

impl Ship {
    pub fn new(class: ShipClass) -> Self {
        Self {
            class,
            health: class.length(),
        }
    }

    pub fn class(&self) -> ShipClass {
        self.class
    }

    pub fn name(&self) -> &'static str {
        self.class.name()
    }

    pub fn length(&self) -> usize {
        self.class.length()
    }

    pub fn health(&self) -> usize {
        self.health
    }

    pub fn is_sunk(&self) -> bool {
        self.health == 0
    }

    /// Take one point of damage. Returns `true` if this hit sank the ship.
    /// Damage to an already sunk ship is ignored.
    pub(crate) fn take_hit(&mut self) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health -= 1;
        self.health == 0
    }
}

/// Snapshot of a ship taken the moment it went down.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SunkShip {
    pub name: &'static str,
    pub length: usize,
    pub color: Color,
    /// Attacker's total shot count when the sinking shot landed.
    pub moves_to_sink: u32,
}

impl SunkShip {
    pub(crate) fn capture(ship: &Ship, moves_to_sink: u32) -> Self {
        Self {
            name: ship.name(),
            length: ship.length(),
            color: ship.class().color(),
            moves_to_sink,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_starts_at_length_and_sinks_at_zero() {
        let mut ship = Ship::new(ShipClass::new("Test", 2, Color::Green));
        assert_eq!(ship.health(), 2);
        assert!(!ship.is_sunk());
        assert!(!ship.take_hit());
        assert!(ship.take_hit());
        assert!(ship.is_sunk());
        // stays sunk
        assert!(!ship.take_hit());
        assert_eq!(ship.health(), 0);
        assert!(ship.is_sunk());
    }

    #[test]
    fn snapshot_is_independent_of_ship() {
        let mut ship = Ship::new(ShipClass::new("Test", 1, Color::Blue));
        ship.take_hit();
        let snap = SunkShip::capture(&ship, 7);
        assert_eq!(snap.name, "Test");
        assert_eq!(snap.length, 1);
        assert_eq!(snap.moves_to_sink, 7);
    }
}
