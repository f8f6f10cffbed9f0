//! Lattice - the 5x5x5 grid model
//!
//! Each slot has a fixed `Coord` for its whole life; only the label it shows changes.
//! Labels are stored flat, indexed by `x*25 + y*5 + z`, the same order the
//! generator enumerates (x outer, z inner) and the search engine records steps in.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, EngineResult};
use crate::domain::cube::{CubeState, Label};

mod address;
mod indexing;

pub use address::{resolve_axis, Address, AddressPair, UserCoord};
pub use indexing::{coord_of, flat_index};

/// Cells per axis
pub const EXTENT: u8 = 5;
/// Total cell count (EXTENT^3)
pub const CELL_COUNT: usize = 125;
/// Distance between neighbouring cell centres, in scene units
pub const DEFAULT_SPACING: f32 = 1.2;

/// Fixed 0-based slot of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl Coord {
    pub const fn new(x: u8, y: u8, z: u8) -> Self {
        Self { x, y, z }
    }
}

/// Shown the way users type it: 1-based.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x as u32 + 1, self.y as u32 + 1, self.z as u32 + 1)
    }
}

/// Scene-space centre of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise interpolation, `t` in [0, 1].
    pub fn lerp(self, to: WorldPos, t: f32) -> WorldPos {
        WorldPos {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
            z: self.z + (to.z - self.z) * t,
        }
    }
}

impl fmt::Display for WorldPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// Snapshot of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cell {
    pub index: usize,
    pub coord: Coord,
    pub label: Label,
    pub position: WorldPos,
}

/// The cube as the view sees it: spacing plus the current label permutation.
#[derive(Clone)]
pub struct Lattice {
    spacing: f32,
    labels: CubeState,
}

impl Lattice {
    /// Lay out the 125 cells with labels 1..=125 in enumeration order.
    pub fn generate(spacing: f32) -> Self {
        Self {
            spacing,
            labels: CubeState::identity(),
        }
    }

    #[inline]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    #[inline]
    pub fn labels(&self) -> &CubeState {
        &self.labels
    }

    /// Replace every label at once (run selection, scrubbing).
    pub fn set_labels(&mut self, labels: CubeState) {
        self.labels = labels;
    }

    #[inline]
    pub fn label(&self, index: usize) -> Label {
        self.labels.get(index)
    }

    /// World position derived from the coordinate: `(c - 2) * spacing`.
    pub fn position_of(&self, coord: Coord) -> WorldPos {
        let center = (EXTENT / 2) as f32;
        WorldPos {
            x: (coord.x as f32 - center) * self.spacing,
            y: (coord.y as f32 - center) * self.spacing,
            z: (coord.z as f32 - center) * self.spacing,
        }
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        if index >= CELL_COUNT {
            return None;
        }
        let coord = self.coord(index);
        Some(Cell {
            index,
            coord,
            label: self.labels.get(index),
            position: self.position_of(coord),
        })
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..CELL_COUNT).filter_map(move |idx| self.cell(idx))
    }

    pub fn find_by_coord(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(self.index(coord))
        } else {
            None
        }
    }

    /// Exact match only: positions are recomputed with the generator's formula,
    /// so a valid address reproduces the stored floats bit for bit.
    pub fn find_by_position(&self, position: WorldPos) -> Option<usize> {
        (0..CELL_COUNT).find(|&idx| self.position_of(self.coord(idx)) == position)
    }

    pub fn resolve(&self, address: Address) -> EngineResult<usize> {
        let found = match address {
            Address::Grid(coord) => self.find_by_coord(coord),
            Address::World(position) => self.find_by_position(position),
        };
        found.ok_or_else(|| EngineError::CellNotFound {
            address: address.to_string(),
        })
    }

    pub fn swap_labels(&mut self, a: usize, b: usize) {
        self.labels.swap(a, b);
    }

    /// Coordinate -> label map is a bijection onto 1..=125.
    pub fn is_bijection(&self) -> bool {
        self.labels.is_permutation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_a_bijection_in_enumeration_order() {
        let lattice = Lattice::generate(DEFAULT_SPACING);
        assert!(lattice.is_bijection());

        let cells: Vec<Cell> = lattice.cells().collect();
        assert_eq!(cells.len(), CELL_COUNT);
        assert_eq!(cells[0].label, 1);
        assert_eq!(cells[0].coord, Coord::new(0, 0, 0));
        // z is the innermost axis
        assert_eq!(cells[1].coord, Coord::new(0, 0, 1));
        assert_eq!(cells[5].coord, Coord::new(0, 1, 0));
        assert_eq!(cells[25].coord, Coord::new(1, 0, 0));
        assert_eq!(cells[124].label, 125);

        let mut seen: Vec<Label> = cells.iter().map(|c| c.label).collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=125).collect::<Vec<Label>>());
    }

    #[test]
    fn generation_is_pure() {
        let a: Vec<Cell> = Lattice::generate(2.0).cells().collect();
        let b: Vec<Cell> = Lattice::generate(2.0).cells().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn positions_are_centered_on_origin() {
        let lattice = Lattice::generate(1.5);
        let first = lattice.cell(0).unwrap();
        let center = lattice.cell(62).unwrap();
        let last = lattice.cell(124).unwrap();
        assert_eq!(first.position, WorldPos::new(-3.0, -3.0, -3.0));
        assert_eq!(center.coord, Coord::new(2, 2, 2));
        assert_eq!(center.position, WorldPos::new(0.0, 0.0, 0.0));
        assert_eq!(last.position, WorldPos::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn lookups_miss_without_panicking() {
        let lattice = Lattice::generate(DEFAULT_SPACING);
        assert_eq!(lattice.find_by_coord(Coord::new(5, 0, 0)), None);
        assert_eq!(lattice.find_by_position(WorldPos::new(0.1, 0.0, 0.0)), None);
        assert!(lattice.cell(CELL_COUNT).is_none());

        let err = lattice
            .resolve(Address::Grid(Coord::new(0, 9, 0)))
            .unwrap_err();
        assert_eq!(err.kind(), "CellNotFound");
    }

    #[test]
    fn world_lookup_round_trips_every_cell() {
        let lattice = Lattice::generate(DEFAULT_SPACING);
        for cell in lattice.cells() {
            assert_eq!(lattice.find_by_position(cell.position), Some(cell.index));
        }
    }

    #[test]
    fn swap_exchanges_labels_only() {
        let mut lattice = Lattice::generate(DEFAULT_SPACING);
        let before_a = lattice.cell(3).unwrap();
        let before_b = lattice.cell(90).unwrap();

        lattice.swap_labels(3, 90);

        let after_a = lattice.cell(3).unwrap();
        let after_b = lattice.cell(90).unwrap();
        assert_eq!(after_a.label, before_b.label);
        assert_eq!(after_b.label, before_a.label);
        assert_eq!(after_a.coord, before_a.coord);
        assert_eq!(after_a.position, before_a.position);
        assert!(lattice.is_bijection());
    }
}
