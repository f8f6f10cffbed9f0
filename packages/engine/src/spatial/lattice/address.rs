//! Address resolver
//!
//! Users type 1-based axis values as text. Parsing validates them up front so a
//! bad field is an `InvalidAddress`, never a lookup that silently misses.

use std::fmt;

use super::{Coord, WorldPos, EXTENT};
use crate::core::{EngineError, EngineResult};

/// A reference to one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Address {
    Grid(Coord),
    World(WorldPos),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Grid(coord) => write!(f, "grid {}", coord),
            Address::World(pos) => write!(f, "position {}", pos),
        }
    }
}

/// Two addresses of the same form; a swap request cannot mix forms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AddressPair {
    Grid(Coord, Coord),
    World(WorldPos, WorldPos),
}

impl AddressPair {
    pub fn split(self) -> (Address, Address) {
        match self {
            AddressPair::Grid(a, b) => (Address::Grid(a), Address::Grid(b)),
            AddressPair::World(a, b) => (Address::World(a), Address::World(b)),
        }
    }
}

/// Validated 1-based coordinate, each axis in [1, 5].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserCoord {
    x: u8,
    y: u8,
    z: u8,
}

impl UserCoord {
    pub fn new(x: i64, y: i64, z: i64) -> EngineResult<Self> {
        Ok(Self {
            x: check_axis(x, &x.to_string())?,
            y: check_axis(y, &y.to_string())?,
            z: check_axis(z, &z.to_string())?,
        })
    }

    /// Parse three text fields as typed into the coordinate inputs.
    pub fn parse(x: &str, y: &str, z: &str) -> EngineResult<Self> {
        Ok(Self {
            x: parse_axis(x)?,
            y: parse_axis(y)?,
            z: parse_axis(z)?,
        })
    }

    pub fn to_coord(self) -> Coord {
        Coord::new(self.x - 1, self.y - 1, self.z - 1)
    }

    pub fn world(self, spacing: f32) -> WorldPos {
        WorldPos::new(
            resolve_axis(self.x, spacing),
            resolve_axis(self.y, spacing),
            resolve_axis(self.z, spacing),
        )
    }
}

/// `(user - 3) * spacing`; reproduces the generator's `(c - 2) * spacing`.
#[inline]
pub fn resolve_axis(user: u8, spacing: f32) -> f32 {
    (user as f32 - 3.0) * spacing
}

fn parse_axis(text: &str) -> EngineResult<u8> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EngineError::invalid_address(text, "empty coordinate"));
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| EngineError::invalid_address(text, "not an integer"))?;
    check_axis(value, text)
}

fn check_axis(value: i64, input: &str) -> EngineResult<u8> {
    if (1..=EXTENT as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(EngineError::invalid_address(
            input,
            format!("outside 1..={}", EXTENT),
        ))
    }
}
