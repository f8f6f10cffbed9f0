use super::*;

const E: usize = EXTENT as usize;

impl Lattice {
    // === Index conversion ===
    #[inline]
    pub fn index(&self, coord: Coord) -> usize {
        flat_index(coord)
    }

    #[inline]
    pub fn coord(&self, index: usize) -> Coord {
        coord_of(index)
    }

    // === Bounds checking ===
    #[inline]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < EXTENT && coord.y < EXTENT && coord.z < EXTENT
    }
}

/// `x*25 + y*5 + z`, the step-record index space.
#[inline]
pub fn flat_index(coord: Coord) -> usize {
    debug_assert!(
        coord.x < EXTENT && coord.y < EXTENT && coord.z < EXTENT,
        "flat_index: out of bounds {:?}",
        coord
    );
    (coord.x as usize) * E * E + (coord.y as usize) * E + coord.z as usize
}

#[inline]
pub fn coord_of(index: usize) -> Coord {
    debug_assert!(index < CELL_COUNT, "coord_of: index {} out of range", index);
    Coord {
        x: (index / (E * E)) as u8,
        y: ((index / E) % E) as u8,
        z: (index % E) as u8,
    }
}
