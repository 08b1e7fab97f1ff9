/// Surface image being presented this frame, with the encoder recording the
/// clear and draw passes. Must be handed back to `Gpu::submit`.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
