use crate::coords::Resolution;
use crate::device::SurfaceErrorAction;
use crate::paint::Rgba;

use super::ScratchGeometry;

/// GPU texture as seen by the presentation pipeline.
///
/// Backends decide the representation; the pipeline only creates, fills and
/// samples it.
pub trait GpuTexture {
    /// (Re)allocates storage at `size`. Previous contents become undefined.
    fn create(&mut self, size: Resolution);

    /// Replaces the whole texture with tightly packed RGBA8 rows.
    fn upload(&mut self, pixels: &[u8]);

    /// Fills the whole texture with `color`.
    fn clear(&mut self, color: Rgba);

    fn size(&self) -> Resolution;
}

/// Presentation surface plus the textured-quad program.
///
/// Call order within one frame, as issued by `PresentationPipeline::draw_2d`:
/// `begin_frame`, `upload_geometry`, `bind_program`, `set_uniform`, `draw`
/// (any number of times), `present`.
pub trait PresentBackend {
    type Texture: GpuTexture;

    /// Creates a texture owned by this backend.
    fn create_texture(&mut self, size: Resolution) -> Self::Texture;

    /// Acquires the next surface image and clears it to `clear`.
    ///
    /// Surface loss and similar conditions are handled here; the returned
    /// action tells the caller whether to skip the frame or stop.
    fn begin_frame(&mut self, clear: Rgba) -> Result<(), SurfaceErrorAction>;

    /// Makes `geometry` the vertex/index source for subsequent draws.
    fn upload_geometry(&mut self, geometry: &ScratchGeometry);

    fn bind_program(&mut self);

    /// Sets an integer uniform on the bound program (sampler units).
    fn set_uniform(&mut self, name: &str, value: i32);

    /// Draws `index_count` indices of the uploaded geometry sampling `texture`
    /// from texture unit `unit`.
    fn draw(&mut self, texture: &Self::Texture, unit: u32, index_count: u32);

    /// Submits the frame and presents it. May block on vertical sync.
    fn present(&mut self);

    /// Switches between vsync-paced and immediate presentation.
    fn set_vsync(&mut self, enabled: bool);
}
