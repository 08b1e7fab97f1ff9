use lumen_engine::csv::CsvTable;
use lumen_engine::input::{Key, MouseButton};
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::render::WgpuPresenter;
use lumen_engine::window::{Runtime, RuntimeConfig};
use lumen_engine::{App, AppControl, EngineConfig, FrameCtx, Rgba};

/// Backbuffer sizes cycled with `R`.
const SIZES: [(u32, u32); 3] = [(320, 180), (256, 256), (160, 240)];

struct Demo {
    palette: Vec<Rgba>,
    stars: Vec<(u32, u32)>,
    size_index: usize,
}

impl Demo {
    fn new(palette: Vec<Rgba>) -> Self {
        Self {
            palette,
            stars: Vec::new(),
            size_index: 0,
        }
    }

    fn scatter_stars(&mut self, ctx: &mut FrameCtx<'_, WgpuPresenter<'_>>) {
        let size = ctx.engine.backbuffer_size();
        self.stars = (0..64)
            .map(|_| {
                (
                    ctx.engine.random(0, size.width as i64 - 1) as u32,
                    ctx.engine.random(0, size.height as i64 - 1) as u32,
                )
            })
            .collect();
    }
}

impl App for Demo {
    fn on_init(&mut self, ctx: &mut FrameCtx<'_, WgpuPresenter<'_>>) {
        log::info!("args: {:?}", ctx.engine.cmd_line().arguments());
        self.scatter_stars(ctx);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, WgpuPresenter<'_>>) -> AppControl {
        let input = ctx.input;
        if input.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if input.key_pressed(Key::Space) {
            let vsync = !ctx.engine.vsync();
            ctx.engine.set_vsync(vsync);
        }
        if input.key_pressed(Key::Char('I')) {
            let flipped = !ctx.engine.inverse_y();
            ctx.engine.set_inverse_y(flipped);
        }
        if input.key_pressed(Key::Char('R')) {
            self.size_index = (self.size_index + 1) % SIZES.len();
            let (w, h) = SIZES[self.size_index];
            if let Err(e) = ctx.engine.resize_backbuffer(w, h) {
                log::error!("resize failed: {e}");
            }
            self.scatter_stars(ctx);
        }
        if input.button_pressed(MouseButton::Left) {
            self.scatter_stars(ctx);
        }

        let t = ctx.time.time;
        let mouse = ctx.mouse_backbuffer();
        let size = ctx.engine.backbuffer_size();
        let (w, h) = (size.width, size.height);

        // Circle outline from the fixed-point quarter table.
        let r = (w.min(h) / 3).max(1) as i64;
        let (cx, cy) = ((w / 2) as i64, (h / 2) as i64);
        let circle = ctx.engine.math_tables();
        let outline: Vec<(i64, i64)> = (-r..=r)
            .flat_map(|dy| {
                let dx = (circle.x_for_y(((dy << 16) / r) as i32) as i64 * r) >> 16;
                [(cx - dx, cy + dy), (cx + dx, cy + dy)]
            })
            .collect();

        let palette = &self.palette;
        let back = ctx.engine.backbuffer_mut();
        let shift = (t * 24.0) as usize;
        for y in 0..h {
            let Some(row) = back.row_mut(y) else { continue };
            for (x, px) in row.iter_mut().enumerate() {
                let band = (x + y as usize + shift) / 8;
                *px = palette[band % palette.len()];
            }
        }

        for (x, y) in outline {
            back.set(x as u32, y as u32, Rgba::WHITE);
        }

        for &(x, y) in &self.stars {
            back.set(x, y, Rgba::rgb(255, 255, 180));
        }

        if let Some(p) = mouse {
            // Leave the hovered pixel transparent so the underlay shows.
            back.set(p.x as u32, p.y as u32, Rgba::TRANSPARENT);
        }

        AppControl::Continue
    }
}

/// Palette from `r,g,b` CSV rows, or a built-in ramp.
fn load_palette(path: Option<&str>) -> Vec<Rgba> {
    let fallback = || {
        (0..8u8)
            .map(|i| Rgba::rgb(20 + i * 12, 24 + i * 8, 60 + i * 20))
            .collect()
    };

    let Some(path) = path else {
        return fallback();
    };

    match CsvTable::load_file(path, ',') {
        Ok(table) => {
            let colors: Vec<Rgba> = table
                .rows()
                .iter()
                .map(|row| {
                    Rgba::rgb(
                        row.value_by_name("r", 0),
                        row.value_by_name("g", 0),
                        row.value_by_name("b", 0),
                    )
                })
                .collect();
            if colors.is_empty() { fallback() } else { colors }
        }
        Err(e) => {
            log::warn!("palette {path}: {e}; using built-in ramp");
            fallback()
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let palette_arg = std::env::args().nth(1);
    let demo = Demo::new(load_palette(palette_arg.as_deref()));

    let (w, h) = SIZES[0];
    let config = RuntimeConfig {
        title: "lumen demo".to_string(),
        engine: EngineConfig::with_backbuffer(w, h),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, demo)
}
