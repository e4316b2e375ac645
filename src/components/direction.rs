//! Facing direction of an actor.
//!
//! Sprite sheets store direction-dependent animations in the fixed
//! [`Direction::BUILD_ORDER`]; animations that do not depend on direction only
//! carry frames for [`Direction::CANONICAL`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::CANONICAL
    }
}

impl Direction {
    /// Order in which direction-dependent frames appear in a sprite sheet.
    pub const BUILD_ORDER: [Direction; 4] = [
        Direction::East,
        Direction::North,
        Direction::West,
        Direction::South,
    ];

    /// The only direction stored for fixed-direction animations.
    pub const CANONICAL: Direction = Direction::South;

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }

    /// Pick a facing from a movement vector in screen space (y grows down).
    ///
    /// The dominant axis wins; on an exact diagonal the horizontal axis wins.
    /// Returns `None` for a zero vector so callers keep the previous facing.
    pub fn from_vector(x: f32, y: f32) -> Option<Direction> {
        if x == 0.0 && y == 0.0 {
            return None;
        }
        if x.abs() >= y.abs() {
            Some(if x > 0.0 {
                Direction::East
            } else {
                Direction::West
            })
        } else {
            Some(if y > 0.0 {
                Direction::South
            } else {
                Direction::North
            })
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" | "up" => Ok(Direction::North),
            "e" | "east" | "right" => Ok(Direction::East),
            "s" | "south" | "down" => Ok(Direction::South),
            "w" | "west" | "left" => Ok(Direction::West),
            _ => Err(AnimationError::UnknownDirection(s.to_string())),
        }
    }
}
