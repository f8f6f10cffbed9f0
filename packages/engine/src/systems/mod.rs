//! Systems that drive the cube forward.

pub mod search;
