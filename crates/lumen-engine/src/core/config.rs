use crate::coords::Resolution;
use crate::paint::Rgba;
use crate::render::{PipelineOptions, DEFAULT_SCRATCH_CAPACITY};

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Logical resolution the application draws at.
    pub backbuffer: Resolution,

    /// Initial window size in physical pixels.
    pub window: Resolution,

    pub vsync: bool,

    /// Backbuffer row 0 on top of the screen.
    pub inverse_y: bool,

    /// Per-stream element capacity of the frame scratch geometry.
    pub scratch_capacity: usize,

    /// Color of the letterbox/pillarbox bars.
    pub clear_color: Rgba,

    /// Color shown through transparent backbuffer pixels.
    pub debug_underlay: Option<Rgba>,
}

impl EngineConfig {
    /// Defaults with the window starting at the backbuffer size.
    pub fn with_backbuffer(width: u32, height: u32) -> Self {
        let size = Resolution::new(width, height);
        Self {
            backbuffer: size,
            window: size,
            ..Self::default()
        }
    }

    pub fn vsync(mut self, enabled: bool) -> Self {
        self.vsync = enabled;
        self
    }

    pub fn window(mut self, size: Resolution) -> Self {
        self.window = size;
        self
    }

    pub(crate) fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            inverse_y: self.inverse_y,
            clear_color: self.clear_color,
            underlay: self.debug_underlay,
            scratch_capacity: self.scratch_capacity,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backbuffer: Resolution::new(320, 180),
            window: Resolution::new(1280, 720),
            vsync: true,
            inverse_y: true,
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
            clear_color: Rgba::TRANSPARENT,
            debug_underlay: cfg!(debug_assertions).then_some(Rgba::DEBUG_UNDERLAY),
        }
    }
}
