//! Backbuffer presentation.
//!
//! The client draws into a CPU-side RGBA [`Backbuffer`]; every frame the
//! [`PresentationPipeline`] uploads it to a texture and draws it as one
//! aspect-corrected quad through a [`PresentBackend`].
//!
//! Convention:
//! - backbuffer pixels are RGBA8, row-major, top-left origin
//! - quad geometry is emitted in clip space, +Y up

mod backbuffer;
mod backend;
mod pipeline;
mod present;
mod scratch;
pub mod testing;

pub use backbuffer::Backbuffer;
pub use backend::{GpuTexture, PresentBackend};
pub use pipeline::{FrameOutcome, PipelineOptions, PresentationPipeline, SAMPLER_UNIFORM};
pub use present::{WgpuPresenter, WgpuTexture};
pub use scratch::{ScratchGeometry, DEFAULT_SCRATCH_CAPACITY};
