//! Coordinate types shared by the presentation pipeline and input mapping.
//!
//! Spaces in use:
//! - normalized window space: `[0, 1] x [0, 1]`, origin top-left
//! - backbuffer pixels: integer, origin top-left
//! - NDC: `[-1, 1]`, where the presentation quad lives

mod aspect;
mod resolution;
mod vec2;

pub use aspect::AspectTransform;
pub use resolution::Resolution;
pub use vec2::{Vec2, Vec2i, Vec3};
