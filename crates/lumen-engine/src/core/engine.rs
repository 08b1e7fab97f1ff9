use crate::args::CmdLine;
use crate::coords::{Resolution, Vec2, Vec2i};
use crate::error::Result;
use crate::math::CircleTable;
use crate::random::RandomStreams;
use crate::render::{Backbuffer, FrameOutcome, PresentBackend, PresentationPipeline};
use crate::time::{FrameClock, FrameTime, SystemTimeSource, TimeSource};

use super::EngineConfig;

/// Engine context: presentation, timing, randomness and math tables.
///
/// Constructed explicitly and owned by the frame loop; nothing here is global.
/// Single-threaded: `Engine` is meant to live on the thread that presents.
pub struct Engine<B: PresentBackend, S: TimeSource = SystemTimeSource> {
    pipeline: PresentationPipeline<B>,
    clock: FrameClock<S>,
    random: RandomStreams,
    math_tables: CircleTable,
    cmd_line: CmdLine,
    vsync: bool,
}

impl<B: PresentBackend> Engine<B> {
    /// Creates an engine timed by the system clock.
    pub fn new(backend: B, config: EngineConfig) -> Result<Self> {
        Self::with_time_source(backend, config, SystemTimeSource)
    }
}

impl<B: PresentBackend, S: TimeSource> Engine<B, S> {
    /// Creates an engine on top of an arbitrary raw clock.
    ///
    /// Random streams are seeded from the clock's epoch reading.
    pub fn with_time_source(backend: B, config: EngineConfig, source: S) -> Result<Self> {
        let mut pipeline = PresentationPipeline::new(
            backend,
            config.window,
            config.backbuffer,
            config.pipeline_options(),
        )?;
        pipeline.set_vsync(config.vsync);

        let clock = FrameClock::with_source(source);
        let seed = clock.epoch().as_nanos() as u64;
        let math_tables = CircleTable::new();

        log::info!(
            "engine init: backbuffer {}x{}, window {}x{}, vsync {}, circle table {} entries",
            config.backbuffer.width,
            config.backbuffer.height,
            config.window.width,
            config.window.height,
            config.vsync,
            math_tables.len()
        );

        Ok(Self {
            pipeline,
            clock,
            random: RandomStreams::new(seed),
            math_tables,
            cmd_line: CmdLine::default(),
            vsync: config.vsync,
        })
    }

    // ── presentation ──────────────────────────────────────────────────────

    /// Presents the backbuffer as one aspect-corrected frame.
    pub fn draw_2d(&mut self) -> FrameOutcome {
        self.pipeline.draw_2d()
    }

    /// Reallocates the backbuffer and its textures. Contents are undefined
    /// until the application draws again.
    pub fn resize_backbuffer(&mut self, width: u32, height: u32) -> Result<()> {
        self.pipeline.resize_backbuffer(Resolution::new(width, height))
    }

    /// Backbuffer pixel shown at a normalized window position (`[0, 1]`,
    /// top-left origin). Out-of-range positions saturate to the edge pixels.
    pub fn mouse_to_backbuffer(&self, pos: Vec2) -> Vec2i {
        self.pipeline.mouse_to_backbuffer(pos)
    }

    pub fn on_window_resize(&mut self, width: u32, height: u32) {
        self.pipeline.on_window_resize(Resolution::new(width, height));
    }

    #[inline]
    pub fn window_size(&self) -> Resolution {
        self.pipeline.window_size()
    }

    pub fn set_inverse_y(&mut self, inverse_y: bool) {
        self.pipeline.set_inverse_y(inverse_y);
    }

    #[inline]
    pub fn inverse_y(&self) -> bool {
        self.pipeline.inverse_y()
    }

    #[inline]
    pub fn backbuffer(&self) -> &Backbuffer {
        self.pipeline.backbuffer()
    }

    #[inline]
    pub fn backbuffer_mut(&mut self) -> &mut Backbuffer {
        self.pipeline.backbuffer_mut()
    }

    #[inline]
    pub fn backbuffer_size(&self) -> Resolution {
        self.pipeline.backbuffer().size()
    }

    pub fn set_vsync(&mut self, enabled: bool) {
        self.vsync = enabled;
        self.pipeline.set_vsync(enabled);
    }

    #[inline]
    pub fn vsync(&self) -> bool {
        self.vsync
    }

    pub fn pipeline(&self) -> &PresentationPipeline<B> {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut PresentationPipeline<B> {
        &mut self.pipeline
    }

    // ── time ──────────────────────────────────────────────────────────────

    /// Seconds since the engine was created. Never decreases.
    pub fn time(&mut self) -> f64 {
        self.clock.time()
    }

    /// Advances the frame clock.
    pub fn tick(&mut self) -> FrameTime {
        self.clock.tick()
    }

    // ── randomness ────────────────────────────────────────────────────────

    /// Integer in `[min, max]`, inclusive.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn random(&mut self, min: i64, max: i64) -> i64 {
        self.random.range(min, max)
    }

    pub fn random8(&mut self) -> u8 {
        self.random.next_u8()
    }

    pub fn random16(&mut self) -> u16 {
        self.random.next_u16()
    }

    pub fn random32(&mut self) -> u32 {
        self.random.next_u32()
    }

    pub fn random64(&mut self) -> u64 {
        self.random.next_u64()
    }

    pub fn random_streams(&mut self) -> &mut RandomStreams {
        &mut self.random
    }

    // ── misc ──────────────────────────────────────────────────────────────

    #[inline]
    pub fn math_tables(&self) -> &CircleTable {
        &self.math_tables
    }

    pub fn set_cmd_line(&mut self, cmd_line: CmdLine) {
        self.cmd_line = cmd_line;
    }

    #[inline]
    pub fn cmd_line(&self) -> &CmdLine {
        &self.cmd_line
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::render::testing::{Call, RecordingBackend};

    fn engine() -> Engine<RecordingBackend, impl FnMut() -> Duration> {
        let config = EngineConfig::with_backbuffer(64, 32).vsync(false);
        Engine::with_time_source(RecordingBackend::default(), config, || {
            Duration::from_secs(1_000)
        })
        .unwrap()
    }

    #[test]
    fn construction_applies_vsync_setting() {
        let e = engine();
        assert!(!e.vsync());
        assert!(e.pipeline().backend().calls().contains(&Call::SetVsync(false)));
    }

    #[test]
    fn same_epoch_gives_same_random_sequence() {
        let mut a = engine();
        let mut b = engine();
        let xs: Vec<i64> = (0..8).map(|_| a.random(0, 1000)).collect();
        let ys: Vec<i64> = (0..8).map(|_| b.random(0, 1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn frozen_clock_reports_zero() {
        let mut e = engine();
        assert_eq!(e.time(), 0.0);
        assert_eq!(e.tick().frame_index, 0);
        assert_eq!(e.tick().frame_index, 1);
    }

    #[test]
    fn math_tables_are_ready() {
        let e = engine();
        assert_eq!(e.math_tables().len(), 2048);
        assert_eq!(e.math_tables().as_slice()[0], 65536);
    }

    #[test]
    fn cmd_line_is_stored() {
        let mut e = engine();
        assert!(e.cmd_line().is_empty());
        e.set_cmd_line(CmdLine::from_args(["demo", "-w"]));
        assert_eq!(e.cmd_line().arguments()[1], "-w");
    }
}
