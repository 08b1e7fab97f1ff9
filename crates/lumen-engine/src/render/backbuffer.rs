use crate::coords::Resolution;
use crate::paint::Rgba;

/// CPU-side pixel surface at the logical game resolution.
///
/// Row-major, row 0 first, `width * height` pixels. Client code draws here every
/// frame; `PresentationPipeline::draw_2d` uploads it wholesale.
#[derive(Debug, Clone)]
pub struct Backbuffer {
    size: Resolution,
    pixels: Vec<Rgba>,
}

impl Backbuffer {
    /// Allocates a transparent buffer. `size` must be valid.
    pub fn new(size: Resolution) -> Self {
        debug_assert!(size.is_valid());
        Self {
            size,
            pixels: vec![Rgba::TRANSPARENT; size.pixel_count()],
        }
    }

    /// Reallocates at `size`. Previous contents are discarded.
    pub(crate) fn recreate(&mut self, size: Resolution) {
        self.size = size;
        self.pixels.clear();
        self.pixels.resize(size.pixel_count(), Rgba::TRANSPARENT);
    }

    #[inline]
    pub fn size(&self) -> Resolution {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw bytes in upload order (`r, g, b, a` per pixel).
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size.width && y < self.size.height)
            .then(|| y as usize * self.size.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Writes one pixel; out-of-bounds writes are dropped and return `false`.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    /// Mutable view of row `y`, or `None` past the last row.
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [Rgba]> {
        if y >= self.size.height {
            return None;
        }
        let w = self.size.width as usize;
        let start = y as usize * w;
        Some(&mut self.pixels[start..start + w])
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(Rgba::TRANSPARENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_transparent_and_sized() {
        let bb = Backbuffer::new(Resolution::new(4, 3));
        assert_eq!(bb.pixels().len(), 12);
        assert_eq!(bb.as_bytes().len(), 48);
        assert!(bb.pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
    }

    #[test]
    fn set_get_row_major() {
        let mut bb = Backbuffer::new(Resolution::new(4, 3));
        assert!(bb.set(1, 2, Rgba::WHITE));
        assert_eq!(bb.get(1, 2), Some(Rgba::WHITE));
        assert_eq!(bb.pixels()[2 * 4 + 1], Rgba::WHITE);
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut bb = Backbuffer::new(Resolution::new(4, 3));
        assert!(!bb.set(4, 0, Rgba::WHITE));
        assert!(!bb.set(0, 3, Rgba::WHITE));
        assert_eq!(bb.get(4, 0), None);
        assert!(bb.row_mut(3).is_none());
    }

    #[test]
    fn row_mut_addresses_one_row() {
        let mut bb = Backbuffer::new(Resolution::new(3, 2));
        bb.row_mut(1).unwrap().fill(Rgba::BLACK);
        assert_eq!(bb.get(0, 0), Some(Rgba::TRANSPARENT));
        assert_eq!(bb.get(2, 1), Some(Rgba::BLACK));
    }

    #[test]
    fn recreate_discards_contents() {
        let mut bb = Backbuffer::new(Resolution::new(2, 2));
        bb.fill(Rgba::WHITE);
        bb.recreate(Resolution::new(3, 1));
        assert_eq!(bb.size(), Resolution::new(3, 1));
        assert!(bb.pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
    }
}
