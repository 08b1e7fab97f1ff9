use crate::coords::Vec3;

/// Default per-stream capacity of the frame scratch buffers, in elements.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 1 << 16;

/// Per-frame geometry arena.
///
/// Four parallel streams (positions, normals, texture coordinates, indices)
/// reserved once to a fixed capacity. `begin_frame` drops the logical length to
/// zero and keeps the allocation, so steady-state frames do not allocate.
#[derive(Debug)]
pub struct ScratchGeometry {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<[f32; 2]>,
    indices: Vec<u32>,
    capacity: usize,
}

impl ScratchGeometry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            normals: Vec::with_capacity(capacity),
            tex_coords: Vec::with_capacity(capacity),
            indices: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Resets every stream to length zero and makes sure each can hold
    /// `capacity` elements. Never shrinks.
    pub fn begin_frame(&mut self) {
        self.vertices.clear();
        self.normals.clear();
        self.tex_coords.clear();
        self.indices.clear();

        self.vertices.reserve(self.capacity);
        self.normals.reserve(self.capacity);
        self.tex_coords.reserve(self.capacity);
        self.indices.reserve(self.capacity);
    }

    /// Appends one quad spanning `base`, `base + tx`, `base + tx + ty`, `base + ty`.
    ///
    /// All four normals are `normal`. Texture row 0 (V = 0) sits on the `base`
    /// edge, or on the `base + ty` edge when `inverse_y` is set. Indices form
    /// `(0, 1, 2), (2, 3, 0)` relative to the first new vertex.
    pub fn push_quad(&mut self, base: Vec3, tx: Vec3, ty: Vec3, normal: Vec3, inverse_y: bool) {
        let idx = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&[base, base + tx, base + ty + tx, base + ty]);
        self.normals.extend_from_slice(&[normal; 4]);

        let (v_low, v_high) = if inverse_y { (1.0, 0.0) } else { (0.0, 1.0) };
        self.tex_coords.extend_from_slice(&[
            [0.0, v_low],
            [1.0, v_low],
            [1.0, v_high],
            [0.0, v_high],
        ]);

        self.indices
            .extend_from_slice(&[idx, idx + 1, idx + 2, idx + 2, idx + 3, idx]);
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[inline]
    pub fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Reserved element count per stream.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Smallest allocated capacity across the four streams.
    pub fn allocated(&self) -> usize {
        self.vertices
            .capacity()
            .min(self.normals.capacity())
            .min(self.tex_coords.capacity())
            .min(self.indices.capacity())
    }
}

impl Default for ScratchGeometry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SCRATCH_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad(s: &mut ScratchGeometry, inverse_y: bool) {
        s.push_quad(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            inverse_y,
        );
    }

    #[test]
    fn quad_has_expected_layout() {
        let mut s = ScratchGeometry::with_capacity(16);
        s.begin_frame();
        unit_quad(&mut s, false);

        assert_eq!(
            s.vertices(),
            &[
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ]
        );
        assert!(s.normals().iter().all(|n| *n == Vec3::new(0.0, 0.0, 1.0)));
        assert_eq!(s.tex_coords(), &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
        assert_eq!(s.indices(), &[0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn inverse_y_flips_v() {
        let mut s = ScratchGeometry::with_capacity(16);
        s.begin_frame();
        unit_quad(&mut s, true);
        assert_eq!(s.tex_coords(), &[[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]);
    }

    #[test]
    fn second_quad_offsets_indices() {
        let mut s = ScratchGeometry::with_capacity(16);
        s.begin_frame();
        unit_quad(&mut s, false);
        unit_quad(&mut s, false);
        assert_eq!(&s.indices()[6..], &[4, 5, 6, 6, 7, 4]);
    }

    #[test]
    fn begin_frame_resets_length_and_keeps_capacity() {
        let mut s = ScratchGeometry::with_capacity(64);
        s.begin_frame();
        let cap = s.allocated();
        assert!(cap >= 64);

        for _ in 0..100 {
            unit_quad(&mut s, false);
        }
        let grown = s.allocated();
        assert!(grown >= cap);

        s.begin_frame();
        assert!(s.vertices().is_empty());
        assert!(s.indices().is_empty());
        assert_eq!(s.allocated(), grown);
    }
}
