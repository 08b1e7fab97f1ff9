//! Engine context and the application contract.
//!
//! [`Engine`] is an explicitly constructed context object: it owns the
//! presentation pipeline, the frame clock, the random streams and the math
//! tables, and is handed to the application every frame through [`FrameCtx`].

mod app;
mod config;
mod engine;
mod frame;

pub use app::{App, AppControl};
pub use config::EngineConfig;
pub use engine::Engine;
pub use frame::FrameCtx;
