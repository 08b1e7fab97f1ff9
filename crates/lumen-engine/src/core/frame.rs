use crate::coords::Vec2i;
use crate::input::InputState;
use crate::render::PresentBackend;
use crate::time::FrameTime;

use super::Engine;

/// Per-frame context passed to `App::on_frame`.
pub struct FrameCtx<'a, B: PresentBackend> {
    pub engine: &'a mut Engine<B>,
    pub input: &'a InputState,
    pub time: FrameTime,
}

impl<B: PresentBackend> FrameCtx<'_, B> {
    /// Backbuffer pixel under the pointer, if the pointer is in the window.
    pub fn mouse_backbuffer(&self) -> Option<Vec2i> {
        self.input
            .pointer
            .map(|pos| self.engine.mouse_to_backbuffer(pos))
    }
}
