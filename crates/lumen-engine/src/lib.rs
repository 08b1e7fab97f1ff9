//! Lumen engine crate.
//!
//! A small 2D engine built around a software backbuffer: the application
//! writes RGBA pixels at a fixed logical resolution, and the engine uploads
//! them and presents them aspect-correct in a resizable window. Timing,
//! randomness, fixed-point math tables, argument capture and CSV tables come
//! along as engine services.

pub mod args;
pub mod coords;
pub mod core;
pub mod csv;
pub mod device;
pub mod input;
pub mod logging;
pub mod math;
pub mod paint;
pub mod random;
pub mod render;
pub mod time;
pub mod window;

mod error;

pub use error::{EngineError, Result};

pub use crate::core::{App, AppControl, Engine, EngineConfig, FrameCtx};
pub use coords::{Resolution, Vec2, Vec2i};
pub use paint::Rgba;
pub use render::FrameOutcome;
