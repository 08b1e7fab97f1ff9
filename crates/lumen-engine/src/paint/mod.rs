//! Pixel color model.

mod rgba;

pub use rgba::Rgba;
