//! Precomputed math tables.

mod circle;

pub use circle::{CircleTable, FIXED_ONE};
