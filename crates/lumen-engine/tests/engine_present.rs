//! End-to-end checks of the engine's presentation path against the recording
//! backend.

use lumen_engine::render::testing::{Call, RecordingBackend};
use lumen_engine::{Engine, EngineConfig, EngineError, FrameOutcome, Resolution, Rgba, Vec2, Vec2i};

fn engine(window: (u32, u32), back: (u32, u32)) -> Engine<RecordingBackend> {
    let config = EngineConfig {
        backbuffer: back.into(),
        window: window.into(),
        debug_underlay: Some(Rgba::DEBUG_UNDERLAY),
        scratch_capacity: 64,
        ..EngineConfig::default()
    };
    Engine::new(RecordingBackend::default(), config).unwrap()
}

fn backend(e: &Engine<RecordingBackend>) -> &RecordingBackend {
    e.pipeline().backend()
}

#[test]
fn drawn_pixels_reach_the_backbuffer_texture() {
    let mut e = engine((800, 600), (4, 2));
    e.backbuffer_mut().set(3, 1, Rgba::new(10, 20, 30, 255));

    assert_eq!(e.draw_2d(), FrameOutcome::Presented);

    let data = backend(&e).texture_data(0);
    let last = &data[data.len() - 4..];
    assert_eq!(last, &[10, 20, 30, 255]);
    assert_eq!(backend(&e).presented(), 1);
}

#[test]
fn underlay_is_drawn_before_backbuffer_each_frame() {
    let mut e = engine((800, 600), (8, 8));
    e.draw_2d();
    e.draw_2d();

    let draws: Vec<usize> = backend(&e)
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            Call::Draw { texture, .. } => Some(texture),
            _ => None,
        })
        .collect();
    assert_eq!(draws, [1, 0, 1, 0]);
    assert_eq!(backend(&e).texture_data(1)[..4], [127, 127, 255, 255]);
}

#[test]
fn resize_backbuffer_rejects_zero_and_keeps_old_size() {
    let mut e = engine((800, 600), (320, 180));
    let err = e.resize_backbuffer(0, 180).unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
    assert_eq!(e.backbuffer_size(), Resolution::new(320, 180));

    e.resize_backbuffer(64, 64).unwrap();
    assert_eq!(e.backbuffer_size(), Resolution::new(64, 64));
    assert_eq!(backend(&e).texture_size(0), Resolution::new(64, 64));
}

#[test]
fn mouse_mapping_follows_window_resizes() {
    let mut e = engine((1920, 1080), (320, 180));
    assert_eq!(e.mouse_to_backbuffer(Vec2::new(0.5, 0.5)), Vec2i::new(160, 90));

    // Square window: wide backbuffer is letterboxed, the bars saturate.
    e.on_window_resize(1000, 1000);
    assert_eq!(e.window_size(), Resolution::new(1000, 1000));
    assert_eq!(e.mouse_to_backbuffer(Vec2::new(0.5, 0.0)).y, 0);
    assert_eq!(e.mouse_to_backbuffer(Vec2::new(0.5, 1.0)).y, 179);
    assert_eq!(e.mouse_to_backbuffer(Vec2::new(0.0, 0.5)).x, 0);
}

#[test]
fn minimized_window_skips_presentation() {
    let mut e = engine((800, 600), (320, 180));
    e.on_window_resize(0, 0);
    backend(&e).clear_calls();

    assert_eq!(e.draw_2d(), FrameOutcome::Skipped);
    assert!(backend(&e).calls().is_empty());

    e.on_window_resize(800, 600);
    assert_eq!(e.draw_2d(), FrameOutcome::Presented);
}

#[test]
fn vsync_toggle_reaches_backend() {
    let mut e = engine((800, 600), (320, 180));
    assert!(e.vsync());
    e.set_vsync(false);
    assert!(!e.vsync());
    assert!(!backend(&e).vsync);
}

#[test]
fn inverse_y_toggle_flips_texture_rows() {
    let mut e = engine((800, 600), (320, 180));
    assert!(e.inverse_y());
    e.draw_2d();
    assert_eq!(e.pipeline().scratch().tex_coords()[0], [0.0, 1.0]);

    e.set_inverse_y(false);
    e.draw_2d();
    assert_eq!(e.pipeline().scratch().tex_coords()[0], [0.0, 0.0]);
}
