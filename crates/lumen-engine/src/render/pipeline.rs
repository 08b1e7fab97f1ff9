use crate::coords::{AspectTransform, Resolution, Vec2, Vec2i, Vec3};
use crate::device::SurfaceErrorAction;
use crate::error::{EngineError, Result};
use crate::paint::Rgba;

use super::{Backbuffer, GpuTexture, PresentBackend, ScratchGeometry};

/// Name of the sampler uniform in the present program.
pub const SAMPLER_UNIFORM: &str = "s_texture";

/// Result of one `draw_2d` call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Presented,
    /// Nothing was presented this frame (zero-size window or transient surface
    /// error); try again next frame.
    Skipped,
    /// The surface cannot be recovered.
    Fatal,
}

/// Presentation options fixed at construction.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub inverse_y: bool,
    pub clear_color: Rgba,
    /// Color the underlay texture is cleared to every frame. Shows through
    /// transparent backbuffer pixels; `None` clears it to transparent.
    pub underlay: Option<Rgba>,
    pub scratch_capacity: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            inverse_y: true,
            clear_color: Rgba::TRANSPARENT,
            underlay: cfg!(debug_assertions).then_some(Rgba::DEBUG_UNDERLAY),
            scratch_capacity: super::DEFAULT_SCRATCH_CAPACITY,
        }
    }
}

/// Composes the software backbuffer onto the window each frame.
///
/// Owns the backbuffer, its two GPU textures (the uploaded image and an
/// underlay drawn beneath it) and the scratch geometry. The backbuffer keeps its
/// aspect ratio inside the window; the uncovered bars keep the clear color.
pub struct PresentationPipeline<B: PresentBackend> {
    backend: B,
    window: Resolution,

    backbuffer: Backbuffer,
    backbuffer_texture: B::Texture,
    underlay_texture: B::Texture,

    scratch: ScratchGeometry,

    inverse_y: bool,
    clear_color: Rgba,
    underlay: Option<Rgba>,
}

impl<B: PresentBackend> PresentationPipeline<B> {
    pub fn new(
        mut backend: B,
        window: Resolution,
        backbuffer: Resolution,
        options: PipelineOptions,
    ) -> Result<Self> {
        validate_backbuffer_size(backbuffer)?;

        let backbuffer_texture = backend.create_texture(backbuffer);
        let underlay_texture = backend.create_texture(backbuffer);

        Ok(Self {
            backend,
            window,
            backbuffer: Backbuffer::new(backbuffer),
            backbuffer_texture,
            underlay_texture,
            scratch: ScratchGeometry::with_capacity(options.scratch_capacity),
            inverse_y: options.inverse_y,
            clear_color: options.clear_color,
            underlay: options.underlay,
        })
    }

    /// Reallocates the backbuffer and both of its textures at `size`.
    ///
    /// Contents are undefined until the client writes them again.
    pub fn resize_backbuffer(&mut self, size: Resolution) -> Result<()> {
        validate_backbuffer_size(size)?;

        self.underlay_texture.create(size);
        self.backbuffer.recreate(size);
        self.backbuffer_texture.create(size);

        log::info!("backbuffer resized to {}x{}", size.width, size.height);
        Ok(())
    }

    /// Records a new window size. Cheap; takes effect on the next draw or
    /// mouse mapping.
    pub fn on_window_resize(&mut self, size: Resolution) {
        if self.window != size {
            log::debug!("window resized to {}x{}", size.width, size.height);
        }
        self.window = size;
    }

    #[inline]
    pub fn window_size(&self) -> Resolution {
        self.window
    }

    #[inline]
    pub fn backbuffer(&self) -> &Backbuffer {
        &self.backbuffer
    }

    #[inline]
    pub fn backbuffer_mut(&mut self) -> &mut Backbuffer {
        &mut self.backbuffer
    }

    /// `true` (default): backbuffer row 0 is the top row on screen, matching
    /// the top-left origin of `mouse_to_backbuffer`. `false`: row 0 is the
    /// bottom row, for y-up backbuffers.
    pub fn set_inverse_y(&mut self, inverse_y: bool) {
        self.inverse_y = inverse_y;
    }

    #[inline]
    pub fn inverse_y(&self) -> bool {
        self.inverse_y
    }

    pub fn set_vsync(&mut self, enabled: bool) {
        self.backend.set_vsync(enabled);
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Geometry composed by the last `draw_2d` call; empty when that call
    /// skipped the frame.
    #[inline]
    pub fn scratch(&self) -> &ScratchGeometry {
        &self.scratch
    }

    /// Current letterbox/pillarbox factors.
    ///
    /// A zero-size window (minimized) maps as identity.
    pub fn aspect(&self) -> AspectTransform {
        if !self.window.is_valid() {
            return AspectTransform::IDENTITY;
        }
        AspectTransform::new(self.window, self.backbuffer.size())
    }

    /// Uploads the backbuffer and presents it, aspect-corrected, as one frame.
    pub fn draw_2d(&mut self) -> FrameOutcome {
        self.scratch.begin_frame();

        if !self.window.is_valid() {
            return FrameOutcome::Skipped;
        }

        self.backbuffer_texture.upload(self.backbuffer.as_bytes());

        if let Err(action) = self.backend.begin_frame(self.clear_color) {
            return match action {
                SurfaceErrorAction::Fatal => FrameOutcome::Fatal,
                SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                    FrameOutcome::Skipped
                }
            };
        }

        let aspect = self.aspect();
        self.scratch.push_quad(
            Vec3::new(-aspect.x_aspect, -aspect.y_aspect, 0.0),
            Vec3::new(2.0 * aspect.x_aspect, 0.0, 0.0),
            Vec3::new(0.0, 2.0 * aspect.y_aspect, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            self.inverse_y,
        );
        self.backend.upload_geometry(&self.scratch);

        self.backend.bind_program();
        self.backend.set_uniform(SAMPLER_UNIFORM, 0);

        self.underlay_texture
            .clear(self.underlay.unwrap_or(Rgba::TRANSPARENT));

        let index_count = self.scratch.indices().len() as u32;
        self.backend.draw(&self.underlay_texture, 0, index_count);
        self.backend.draw(&self.backbuffer_texture, 0, index_count);

        self.backend.present();
        FrameOutcome::Presented
    }

    /// Maps a normalized window position (`[0, 1]`, top-left origin) to the
    /// backbuffer pixel under it. Positions over the bars or outside the
    /// window saturate to the nearest edge pixel.
    pub fn mouse_to_backbuffer(&self, pos: Vec2) -> Vec2i {
        self.aspect().window_to_pixel(pos, self.backbuffer.size())
    }
}

fn validate_backbuffer_size(size: Resolution) -> Result<()> {
    if !size.is_valid() {
        return Err(EngineError::InvalidArgument(format!(
            "backbuffer size must be positive, got {}x{}",
            size.width, size.height
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::testing::{Call, RecordingBackend};

    fn pipeline(window: (u32, u32), back: (u32, u32)) -> PresentationPipeline<RecordingBackend> {
        PresentationPipeline::new(
            RecordingBackend::default(),
            window.into(),
            back.into(),
            PipelineOptions {
                underlay: Some(Rgba::DEBUG_UNDERLAY),
                scratch_capacity: 32,
                ..PipelineOptions::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn rejects_zero_sized_backbuffer() {
        let err = PresentationPipeline::new(
            RecordingBackend::default(),
            Resolution::new(640, 480),
            Resolution::new(0, 10),
            PipelineOptions::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, EngineError::InvalidArgument(_)));

        let mut p = pipeline((640, 480), (320, 240));
        assert!(p.resize_backbuffer(Resolution::new(10, 0)).is_err());
        assert_eq!(p.backbuffer().size(), Resolution::new(320, 240));
    }

    #[test]
    fn draw_2d_issues_calls_in_order() {
        let mut p = pipeline((640, 480), (320, 240));
        p.backbuffer_mut().set(0, 0, Rgba::WHITE);
        p.backend().clear_calls();

        assert_eq!(p.draw_2d(), FrameOutcome::Presented);

        let calls = p.backend().calls();
        assert_eq!(
            calls.as_slice(),
            &[
                Call::Upload { texture: 0, bytes: 320 * 240 * 4 },
                Call::BeginFrame(Rgba::TRANSPARENT),
                Call::UploadGeometry { vertices: 4, indices: 6 },
                Call::BindProgram,
                Call::SetUniform("s_texture".into(), 0),
                Call::Clear { texture: 1, color: Rgba::DEBUG_UNDERLAY },
                Call::Draw { texture: 1, unit: 0, index_count: 6 },
                Call::Draw { texture: 0, unit: 0, index_count: 6 },
                Call::Present,
            ]
        );
    }

    #[test]
    fn uploaded_bytes_match_backbuffer() {
        let mut p = pipeline((64, 64), (2, 1));
        p.backbuffer_mut().set(1, 0, Rgba::new(9, 8, 7, 255));
        p.draw_2d();
        assert_eq!(p.backend().texture_data(0), &[0, 0, 0, 0, 9, 8, 7, 255]);
    }

    #[test]
    fn matching_aspect_fills_ndc() {
        let mut p = pipeline((1920, 1080), (320, 180));
        p.draw_2d();
        let v = p.scratch().vertices();
        assert_eq!(v[0], Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(v[2], Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn square_window_letterboxes_quad() {
        let mut p = pipeline((1000, 1000), (320, 180));
        p.draw_2d();
        let v = p.scratch().vertices();
        assert_eq!(v[0].x, -1.0);
        assert_eq!(v[1].x, 1.0);
        assert!((v[0].y + 0.5625).abs() < 1e-6);
        assert!((v[2].y - 0.5625).abs() < 1e-6);
        // centered
        assert!((v[0].y + v[2].y).abs() < 1e-6);
    }

    #[test]
    fn window_resize_changes_next_frame_only() {
        let mut p = pipeline((1000, 1000), (100, 100));
        p.draw_2d();
        assert_eq!(p.scratch().vertices()[0], Vec3::new(-1.0, -1.0, 0.0));

        p.on_window_resize(Resolution::new(2000, 1000));
        p.on_window_resize(Resolution::new(2000, 1000));
        assert_eq!(p.backbuffer().size(), Resolution::new(100, 100));

        p.draw_2d();
        assert!((p.scratch().vertices()[0].x + 0.5).abs() < 1e-6);
        assert_eq!(p.scratch().vertices()[0].y, -1.0);
    }

    #[test]
    fn zero_height_window_skips_frame() {
        let mut p = pipeline((640, 480), (320, 240));
        p.on_window_resize(Resolution::new(640, 0));
        p.backend().clear_calls();

        assert_eq!(p.draw_2d(), FrameOutcome::Skipped);
        assert!(p.backend().calls().is_empty());
        // mapping still lands inside the backbuffer
        let px = p.mouse_to_backbuffer(Vec2::new(0.5, 0.5));
        assert_eq!(px, Vec2i::new(160, 120));
    }

    #[test]
    fn surface_errors_map_to_outcomes() {
        let mut p = pipeline((640, 480), (320, 240));

        p.backend_mut().fail_next = Some(SurfaceErrorAction::SkipFrame);
        assert_eq!(p.draw_2d(), FrameOutcome::Skipped);

        p.backend_mut().fail_next = Some(SurfaceErrorAction::Fatal);
        assert_eq!(p.draw_2d(), FrameOutcome::Fatal);

        assert_eq!(p.draw_2d(), FrameOutcome::Presented);
    }

    #[test]
    fn skipped_frame_leaves_no_stale_geometry() {
        let mut p = pipeline((640, 480), (320, 240));
        assert_eq!(p.draw_2d(), FrameOutcome::Presented);
        assert_eq!(p.scratch().vertices().len(), 4);

        p.backend_mut().fail_next = Some(SurfaceErrorAction::SkipFrame);
        assert_eq!(p.draw_2d(), FrameOutcome::Skipped);
        assert!(p.scratch().vertices().is_empty());
        assert!(p.scratch().indices().is_empty());

        p.on_window_resize(Resolution::new(640, 0));
        assert_eq!(p.draw_2d(), FrameOutcome::Skipped);
        assert!(p.scratch().tex_coords().is_empty());
    }

    #[test]
    fn inverse_y_is_persistent() {
        let mut p = pipeline((640, 480), (320, 240));
        p.set_inverse_y(false);
        p.draw_2d();
        p.draw_2d();
        assert_eq!(p.scratch().tex_coords()[0], [0.0, 0.0]);

        p.set_inverse_y(true);
        p.draw_2d();
        assert_eq!(p.scratch().tex_coords()[0], [0.0, 1.0]);
    }

    #[test]
    fn scratch_capacity_is_stable_across_frames() {
        let mut p = pipeline((640, 480), (320, 240));
        p.draw_2d();
        let cap = p.scratch().allocated();
        for _ in 0..10 {
            p.draw_2d();
        }
        assert_eq!(p.scratch().allocated(), cap);
        assert_eq!(p.scratch().vertices().len(), 4);
    }

    #[test]
    fn resize_backbuffer_recreates_both_textures() {
        let mut p = pipeline((640, 480), (320, 240));
        p.resize_backbuffer(Resolution::new(160, 90)).unwrap();

        assert_eq!(p.backbuffer().size(), Resolution::new(160, 90));
        assert_eq!(p.backend().texture_size(0), Resolution::new(160, 90));
        assert_eq!(p.backend().texture_size(1), Resolution::new(160, 90));
        assert_eq!(p.backbuffer().as_bytes().len(), 160 * 90 * 4);
    }

    #[test]
    fn release_underlay_is_transparent() {
        let mut p = PresentationPipeline::new(
            RecordingBackend::default(),
            Resolution::new(64, 64),
            Resolution::new(8, 8),
            PipelineOptions { underlay: None, ..PipelineOptions::default() },
        )
        .unwrap();
        p.draw_2d();
        assert!(p
            .backend()
            .calls()
            .contains(&Call::Clear { texture: 1, color: Rgba::TRANSPARENT }));
    }
}
