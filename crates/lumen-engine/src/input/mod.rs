//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types. The
//! runtime translates platform events into [`InputEvent`]s; pointer positions
//! are normalized to the window (`[0, 1]`, top-left origin) so they can be fed
//! straight into `Engine::mouse_to_backbuffer`.

mod state;
pub(crate) mod translate;
mod types;

pub use state::InputState;
pub use types::{ButtonState, InputEvent, Key, MouseButton};
