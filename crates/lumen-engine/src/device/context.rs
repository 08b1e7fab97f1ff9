use anyhow::{Context, Result};
use winit::window::Window;

use crate::coords::Resolution;

use super::surface;
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// wgpu device, queue and the window surface the backbuffer is presented to.
///
/// The surface borrows the window, so `Gpu` cannot outlive it. Drawable size
/// is tracked separately from the surface configuration because a minimized
/// window reports zero, which wgpu refuses to configure.
pub struct Gpu<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    caps: wgpu::SurfaceCapabilities,
    config: wgpu::SurfaceConfiguration,
    size: Resolution,
}

impl<'w> Gpu<'w> {
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = Resolution::from(window.inner_size());
        anyhow::ensure!(size.is_valid(), "cannot present to a zero-size window ({size:?})");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create window surface")?;

        let adapter = open_adapter(&instance, &surface).await?;
        let (device, queue) = open_device(&adapter, &init).await?;

        let caps = surface.get_capabilities(&adapter);
        let config = surface_config(&caps, &init, size)?;
        surface.configure(&device, &config);

        log::info!(
            "present surface: {:?} {}x{} {:?}",
            config.format,
            size.width,
            size.height,
            config.present_mode
        );

        Ok(Self { surface, device, queue, caps, config, size })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Format for textures holding backbuffer bytes.
    ///
    /// Follows the surface encoding so texel values reach the screen
    /// unchanged by the sRGB conversion on either side.
    pub fn backbuffer_format(&self) -> wgpu::TextureFormat {
        if self.config.format.is_srgb() {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        }
    }

    /// Drawable size in physical pixels; zero while minimized.
    pub fn size(&self) -> Resolution {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn resize(&mut self, new_size: Resolution) {
        surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    /// Reconfigures the surface only when the resolved present mode changes.
    pub fn set_vsync(&mut self, enabled: bool) {
        let mode = surface::choose_present_mode(&self.caps, GpuInit::present_mode_for(enabled));
        if self.config.present_mode == mode {
            return;
        }
        log::debug!("present mode {:?} -> {mode:?}", self.config.present_mode);
        self.config.present_mode = mode;
        if self.size.is_valid() {
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Acquires the next surface image with a fresh encoder.
    ///
    /// Surface errors are resolved here (reconfigure, skip or fatal) and the
    /// caller only sees what to do about the current frame.
    pub fn acquire(&mut self) -> std::result::Result<GpuFrame, SurfaceErrorAction> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(err) => {
                return Err(surface::map_surface_error(
                    &self.surface,
                    &self.device,
                    &self.config,
                    self.size,
                    err,
                ));
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen present encoder"),
            });

        Ok(GpuFrame { surface_texture, view, encoder })
    }

    /// Submits the frame's commands, then flips the surface image.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, view, encoder } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }
}

async fn open_adapter(instance: &wgpu::Instance, surface: &wgpu::Surface<'_>) -> Result<wgpu::Adapter> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(surface),
            force_fallback_adapter: false,
        })
        .await
        .context("no GPU adapter can present to this window")?;

    let info = adapter.get_info();
    log::info!("gpu adapter: {} ({:?}, {:?})", info.name, info.backend, info.device_type);
    Ok(adapter)
}

async fn open_device(adapter: &wgpu::Adapter, init: &GpuInit) -> Result<(wgpu::Device, wgpu::Queue)> {
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("lumen device"),
            required_features: init.required_features,
            required_limits: init.required_limits.clone(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to open wgpu device")
}

fn surface_config(
    caps: &wgpu::SurfaceCapabilities,
    init: &GpuInit,
    size: Resolution,
) -> Result<wgpu::SurfaceConfiguration> {
    let format = surface::choose_surface_format(caps, init.prefer_srgb)
        .context("surface reports no supported formats")?;

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width,
        height: size.height,
        present_mode: surface::choose_present_mode(caps, init.present_mode),
        alpha_mode: surface::choose_alpha_mode(caps, init.alpha_mode),
        view_formats: vec![],
        desired_maximum_frame_latency: init.desired_maximum_frame_latency,
    })
}
