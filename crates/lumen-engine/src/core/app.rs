use winit::event::WindowEvent;

use crate::render::WgpuPresenter;

use super::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application driven by `window::Runtime`.
pub trait App {
    /// Called once, after the engine exists and before the first frame.
    fn on_init(&mut self, ctx: &mut FrameCtx<'_, WgpuPresenter<'_>>) {
        let _ = ctx;
    }

    /// Called for every raw window event, after input state was updated.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per frame; draw into `ctx.engine.backbuffer_mut()` here.
    /// The runtime presents the backbuffer right after.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, WgpuPresenter<'_>>) -> AppControl;
}
