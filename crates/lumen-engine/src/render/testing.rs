//! Recording `PresentBackend` for tests.
//!
//! Captures every call the pipeline makes, in order, and keeps texture contents
//! on the CPU so tests can assert on exactly what would reach the GPU.

use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::Resolution;
use crate::device::SurfaceErrorAction;
use crate::paint::Rgba;

use super::{GpuTexture, PresentBackend, ScratchGeometry};

/// One recorded backend or texture call. Textures are identified by creation
/// order, starting at 0.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateTexture { texture: usize, size: Resolution },
    Upload { texture: usize, bytes: usize },
    Clear { texture: usize, color: Rgba },
    BeginFrame(Rgba),
    UploadGeometry { vertices: usize, indices: usize },
    BindProgram,
    SetUniform(String, i32),
    Draw { texture: usize, unit: u32, index_count: u32 },
    Present,
    SetVsync(bool),
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<Call>,
    textures: Vec<TextureState>,
}

#[derive(Debug, Default, Clone)]
struct TextureState {
    size: Resolution,
    data: Vec<u8>,
}

/// Texture handle produced by [`RecordingBackend`].
#[derive(Debug)]
pub struct RecordingTexture {
    id: usize,
    recorder: Rc<RefCell<Recorder>>,
}

impl RecordingTexture {
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }
}

impl GpuTexture for RecordingTexture {
    fn create(&mut self, size: Resolution) {
        let mut rec = self.recorder.borrow_mut();
        rec.textures[self.id] = TextureState {
            size,
            data: vec![0; size.pixel_count() * 4],
        };
        rec.calls.push(Call::CreateTexture { texture: self.id, size });
    }

    fn upload(&mut self, pixels: &[u8]) {
        let mut rec = self.recorder.borrow_mut();
        rec.textures[self.id].data.clear();
        rec.textures[self.id].data.extend_from_slice(pixels);
        rec.calls.push(Call::Upload { texture: self.id, bytes: pixels.len() });
    }

    fn clear(&mut self, color: Rgba) {
        let mut rec = self.recorder.borrow_mut();
        let state = &mut rec.textures[self.id];
        let bytes = [color.r, color.g, color.b, color.a];
        for px in state.data.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        rec.calls.push(Call::Clear { texture: self.id, color });
    }

    fn size(&self) -> Resolution {
        self.recorder.borrow().textures[self.id].size
    }
}

/// Backend that records calls instead of talking to a GPU.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    recorder: Rc<RefCell<Recorder>>,
    /// When set, the next `begin_frame` fails with this action.
    pub fail_next: Option<SurfaceErrorAction>,
    pub vsync: bool,
    presented: u64,
}

impl RecordingBackend {
    /// Snapshot of all calls so far.
    pub fn calls(&self) -> Vec<Call> {
        self.recorder.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.recorder.borrow_mut().calls.clear();
    }

    /// Current contents of texture `id`.
    pub fn texture_data(&self, id: usize) -> Vec<u8> {
        self.recorder.borrow().textures[id].data.clone()
    }

    pub fn texture_size(&self, id: usize) -> Resolution {
        self.recorder.borrow().textures[id].size
    }

    /// Number of frames presented.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    fn push(&self, call: Call) {
        self.recorder.borrow_mut().calls.push(call);
    }
}

impl PresentBackend for RecordingBackend {
    type Texture = RecordingTexture;

    fn create_texture(&mut self, size: Resolution) -> RecordingTexture {
        let id = {
            let mut rec = self.recorder.borrow_mut();
            rec.textures.push(TextureState::default());
            rec.textures.len() - 1
        };
        let mut texture = RecordingTexture { id, recorder: Rc::clone(&self.recorder) };
        texture.create(size);
        texture
    }

    fn begin_frame(&mut self, clear: Rgba) -> Result<(), SurfaceErrorAction> {
        if let Some(action) = self.fail_next.take() {
            return Err(action);
        }
        self.push(Call::BeginFrame(clear));
        Ok(())
    }

    fn upload_geometry(&mut self, geometry: &ScratchGeometry) {
        self.push(Call::UploadGeometry {
            vertices: geometry.vertices().len(),
            indices: geometry.indices().len(),
        });
    }

    fn bind_program(&mut self) {
        self.push(Call::BindProgram);
    }

    fn set_uniform(&mut self, name: &str, value: i32) {
        self.push(Call::SetUniform(name.to_string(), value));
    }

    fn draw(&mut self, texture: &RecordingTexture, unit: u32, index_count: u32) {
        self.push(Call::Draw { texture: texture.id, unit, index_count });
    }

    fn present(&mut self) {
        self.presented += 1;
        self.push(Call::Present);
    }

    fn set_vsync(&mut self, enabled: bool) {
        self.vsync = enabled;
        self.push(Call::SetVsync(enabled));
    }
}
