//! wgpu implementation of [`PresentBackend`].

use bytemuck::{Pod, Zeroable};

use crate::coords::Resolution;
use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::paint::Rgba;

use super::{GpuTexture, PresentBackend, ScratchGeometry, SAMPLER_UNIFORM};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PresentVertex {
    position: [f32; 3],
    uv: [f32; 2],
}

impl PresentVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PresentVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Device handles a texture needs to (re)allocate and fill itself.
#[derive(Clone)]
struct TextureShared {
    device: wgpu::Device,
    queue: wgpu::Queue,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    format: wgpu::TextureFormat,
}

/// RGBA8 texture sampled by the present program.
pub struct WgpuTexture {
    shared: TextureShared,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    size: Resolution,

    clear_bytes: Vec<u8>,
    /// Color the texture currently holds in full, if any.
    cleared_to: Option<Rgba>,
}

impl WgpuTexture {
    fn new(shared: TextureShared, size: Resolution) -> Self {
        let (texture, bind_group) = allocate(&shared, size);
        Self {
            shared,
            texture,
            bind_group,
            size,
            clear_bytes: Vec::new(),
            cleared_to: None,
        }
    }

    fn write(&self, bytes: &[u8]) {
        self.shared.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.size.width * 4),
                rows_per_image: Some(self.size.height),
            },
            extent(self.size),
        );
    }
}

impl GpuTexture for WgpuTexture {
    fn create(&mut self, size: Resolution) {
        let (texture, bind_group) = allocate(&self.shared, size);
        self.texture = texture;
        self.bind_group = bind_group;
        self.size = size;
        self.cleared_to = None;
    }

    fn upload(&mut self, pixels: &[u8]) {
        let expected = self.size.pixel_count() * 4;
        if pixels.len() != expected {
            log::error!(
                "texture upload of {} bytes does not match {}x{} texture",
                pixels.len(),
                self.size.width,
                self.size.height
            );
            return;
        }
        self.write(pixels);
        self.cleared_to = None;
    }

    fn clear(&mut self, color: Rgba) {
        if self.cleared_to == Some(color) {
            return;
        }

        let len = self.size.pixel_count() * 4;
        self.clear_bytes.clear();
        self.clear_bytes.reserve(len);
        for _ in 0..self.size.pixel_count() {
            self.clear_bytes.extend_from_slice(&[color.r, color.g, color.b, color.a]);
        }

        let bytes = std::mem::take(&mut self.clear_bytes);
        self.write(&bytes);
        self.clear_bytes = bytes;
        self.cleared_to = Some(color);
    }

    fn size(&self) -> Resolution {
        self.size
    }
}

fn extent(size: Resolution) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}

fn allocate(shared: &TextureShared, size: Resolution) -> (wgpu::Texture, wgpu::BindGroup) {
    let texture = shared.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("lumen backbuffer texture"),
        size: extent(size),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: shared.format,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let bind_group = shared.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("lumen present bind group"),
        layout: &shared.layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&shared.sampler),
            },
        ],
    });

    (texture, bind_group)
}

/// Presents through a wgpu surface.
///
/// Each `draw` records its own render pass into the frame encoder; the frame
/// is submitted on `present`.
pub struct WgpuPresenter<'w> {
    gpu: Gpu<'w>,
    pipeline: wgpu::RenderPipeline,
    shared: TextureShared,

    vertex_scratch: Vec<PresentVertex>,
    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize,

    frame: Option<GpuFrame>,
    program_bound: bool,
    sampler_unit: i32,
    warned_unit: bool,
}

impl<'w> WgpuPresenter<'w> {
    pub fn new(gpu: Gpu<'w>) -> Self {
        let device = gpu.device();
        let surface_format = gpu.surface_format();
        let format = gpu.backbuffer_format();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lumen present shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/present.wgsl").into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen present bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen present pipeline layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lumen present pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[PresentVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        // Pixel-exact magnification.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lumen present sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let shared = TextureShared {
            device: device.clone(),
            queue: gpu.queue().clone(),
            layout,
            sampler,
            format,
        };

        Self {
            gpu,
            pipeline,
            shared,
            vertex_scratch: Vec::new(),
            vbo: None,
            vbo_capacity: 0,
            ibo: None,
            ibo_capacity: 0,
            frame: None,
            program_bound: false,
            sampler_unit: 0,
            warned_unit: false,
        }
    }

    #[inline]
    pub fn gpu(&self) -> &Gpu<'w> {
        &self.gpu
    }

    /// Forwards a window resize to the surface.
    pub fn resize_surface(&mut self, size: Resolution) {
        self.gpu.resize(size);
    }

    fn ensure_buffer(
        device: &wgpu::Device,
        slot: &mut Option<wgpu::Buffer>,
        capacity: &mut usize,
        required: usize,
        usage: wgpu::BufferUsages,
        label: &'static str,
    ) {
        if required <= *capacity && slot.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(256);
        *slot = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: new_cap as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        *capacity = new_cap;
    }
}

impl PresentBackend for WgpuPresenter<'_> {
    type Texture = WgpuTexture;

    fn create_texture(&mut self, size: Resolution) -> WgpuTexture {
        WgpuTexture::new(self.shared.clone(), size)
    }

    fn begin_frame(&mut self, clear: Rgba) -> Result<(), SurfaceErrorAction> {
        // A frame left open by an interrupted draw is dropped unpresented.
        self.frame = None;
        self.program_bound = false;

        let mut frame = self.gpu.acquire()?;

        {
            let _clear_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lumen clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.frame = Some(frame);
        Ok(())
    }

    fn upload_geometry(&mut self, geometry: &ScratchGeometry) {
        self.vertex_scratch.clear();
        self.vertex_scratch.extend(
            geometry
                .vertices()
                .iter()
                .zip(geometry.tex_coords())
                .map(|(v, uv)| PresentVertex { position: [v.x, v.y, v.z], uv: *uv }),
        );

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&self.vertex_scratch);
        let index_bytes: &[u8] = bytemuck::cast_slice(geometry.indices());
        if vertex_bytes.is_empty() || index_bytes.is_empty() {
            return;
        }

        let device = self.gpu.device();
        Self::ensure_buffer(
            device,
            &mut self.vbo,
            &mut self.vbo_capacity,
            vertex_bytes.len(),
            wgpu::BufferUsages::VERTEX,
            "lumen present vbo",
        );
        Self::ensure_buffer(
            device,
            &mut self.ibo,
            &mut self.ibo_capacity,
            index_bytes.len(),
            wgpu::BufferUsages::INDEX,
            "lumen present ibo",
        );

        let queue = self.gpu.queue();
        if let (Some(vbo), Some(ibo)) = (self.vbo.as_ref(), self.ibo.as_ref()) {
            queue.write_buffer(vbo, 0, vertex_bytes);
            queue.write_buffer(ibo, 0, index_bytes);
        }
    }

    fn bind_program(&mut self) {
        self.program_bound = true;
    }

    fn set_uniform(&mut self, name: &str, value: i32) {
        if name == SAMPLER_UNIFORM {
            self.sampler_unit = value;
        } else {
            log::debug!("present program has no uniform {name:?}");
        }
    }

    fn draw(&mut self, texture: &WgpuTexture, unit: u32, index_count: u32) {
        if !self.program_bound || index_count == 0 {
            return;
        }
        if unit as i32 != self.sampler_unit && !self.warned_unit {
            log::warn!(
                "draw on texture unit {unit} while {SAMPLER_UNIFORM} samples unit {}",
                self.sampler_unit
            );
            self.warned_unit = true;
        }

        let Some(frame) = self.frame.as_mut() else { return };
        let Some(vbo) = self.vbo.as_ref() else { return };
        let Some(ibo) = self.ibo.as_ref() else { return };

        let GpuFrame { view, encoder, .. } = frame;
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen present pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &texture.bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..index_count, 0, 0..1);
    }

    fn present(&mut self) {
        self.program_bound = false;
        if let Some(frame) = self.frame.take() {
            self.gpu.submit(frame);
        }
    }

    fn set_vsync(&mut self, enabled: bool) {
        log::info!("vsync {}", if enabled { "on" } else { "off" });
        self.gpu.set_vsync(enabled);
    }
}
