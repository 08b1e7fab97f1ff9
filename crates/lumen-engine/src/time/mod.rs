//! Time subsystem.
//!
//! `FrameClock` is the engine's time base: seconds since init, never going
//! backward even when the underlying wall clock does. The raw clock is behind
//! the `TimeSource` trait so tests can script anomalies.

mod frame_clock;
mod source;

pub use frame_clock::{FrameClock, FrameTime};
pub use source::{SystemTimeSource, TimeSource};
