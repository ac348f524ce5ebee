//! Movement vocabulary shared by the path compressor and the map renderer.

use std::fmt;
use std::str::FromStr;

/// Closed set of compass and vertical movement tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    East,
    South,
    West,
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 10] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
        Direction::Up,
        Direction::Down,
    ];

    /// Parse an exact lowercase movement token (`n`, `se`, `u`, ...).
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dir| dir.as_str() == token)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "n",
            Direction::East => "e",
            Direction::South => "s",
            Direction::West => "w",
            Direction::NorthEast => "ne",
            Direction::SouthEast => "se",
            Direction::SouthWest => "sw",
            Direction::NorthWest => "nw",
            Direction::Up => "u",
            Direction::Down => "d",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::NorthEast => Direction::SouthWest,
            Direction::SouthEast => Direction::NorthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::NorthWest => Direction::SouthEast,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Screen-space step; rows grow downward. Vertical exits do not move.
    pub fn screen_step(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
            Direction::NorthWest => (-1, -1),
            Direction::Up | Direction::Down => (0, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(&s.to_lowercase()).ok_or_else(|| format!("Unknown direction: {}", s))
    }
}

/// Whether `token` is a plain movement command.
pub fn is_movement(token: &str) -> bool {
    Direction::parse(token).is_some()
}

/// Label of the synthesized exit that opens a door before walking through it.
/// The label doubles as a `;`-joined command sequence.
pub fn door_label(door: &str, direction: &str) -> String {
    format!("open {door} {direction};{direction}")
}

/// Direction an exit label moves in: either a plain movement token or the
/// trailing step of an `open <door> ...;<dir>` label. Other custom labels
/// have no screen direction.
pub fn label_direction(label: &str) -> Option<Direction> {
    if let Some(direction) = Direction::parse(label) {
        return Some(direction);
    }
    let rest = label.strip_prefix("open ")?;
    let (door, step) = rest.rsplit_once(';')?;
    if door.is_empty() {
        return None;
    }
    Direction::parse(step)
}
