//! Spatial layout of the cube: slots, coordinates, addresses.

pub mod lattice;
