use super::{Resolution, Vec2, Vec2i};

/// Scale factors that fit the backbuffer into the window without distortion.
///
/// Derived per frame from the two resolutions, never stored:
///
/// - `aspect = window.w / window.h`, `back_aspect = back.w / back.h`
/// - `ratio = back_aspect / aspect`
/// - window narrower than the backbuffer: width fills, height shrinks by `1 / ratio`
///   (letterbox)
/// - otherwise: height fills, width shrinks by `ratio` (pillarbox)
///
/// One factor is always exactly `1.0`; the quad stays centered, and the bars are
/// whatever the clear color left behind.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AspectTransform {
    pub x_aspect: f32,
    pub y_aspect: f32,
}

impl AspectTransform {
    pub const IDENTITY: Self = Self { x_aspect: 1.0, y_aspect: 1.0 };

    /// Requires `window.height > 0` and `backbuffer.height > 0`.
    pub fn new(window: Resolution, backbuffer: Resolution) -> Self {
        debug_assert!(window.height > 0 && backbuffer.height > 0);

        let aspect = window.aspect();
        let back_aspect = backbuffer.aspect();
        let ratio = back_aspect / aspect;

        if aspect < back_aspect {
            Self { x_aspect: 1.0, y_aspect: 1.0 / ratio }
        } else {
            Self { x_aspect: ratio, y_aspect: 1.0 }
        }
    }

    #[inline]
    pub fn is_letterboxed(self) -> bool {
        self.y_aspect < 1.0
    }

    #[inline]
    pub fn is_pillarboxed(self) -> bool {
        self.x_aspect < 1.0
    }

    /// Maps a position relative to the backbuffer (`[0, 1]`, top-left origin)
    /// to the normalized window position where it is displayed.
    #[inline]
    pub fn backbuffer_to_window(self, rel: Vec2) -> Vec2 {
        let centered = rel - Vec2::splat(0.5);
        Vec2::new(centered.x * self.x_aspect, centered.y * self.y_aspect) + Vec2::splat(0.5)
    }

    /// Maps a normalized window position to a position relative to the
    /// backbuffer, without clamping.
    #[inline]
    pub fn window_to_backbuffer(self, pos: Vec2) -> Vec2 {
        let centered = pos - Vec2::splat(0.5);
        Vec2::new(centered.x / self.x_aspect, centered.y / self.y_aspect) + Vec2::splat(0.5)
    }

    /// Maps a normalized window position to a backbuffer pixel.
    ///
    /// Positions outside the displayed quad (bars, or outside the window)
    /// saturate to the nearest edge pixel. The result is always inside
    /// `[0, w - 1] x [0, h - 1]`.
    pub fn window_to_pixel(self, pos: Vec2, backbuffer: Resolution) -> Vec2i {
        let rel = self.window_to_backbuffer(pos);
        // NaN input lands on 0 through the `as` cast.
        let rel = rel.clamp(0.0, 1.0);
        let scaled = Vec2::new(rel.x * backbuffer.width as f32, rel.y * backbuffer.height as f32);

        let max_x = backbuffer.width.saturating_sub(1) as i32;
        let max_y = backbuffer.height.saturating_sub(1) as i32;
        Vec2i::new((scaled.x as i32).min(max_x), (scaled.y as i32).min(max_y))
    }
}

impl Default for AspectTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
