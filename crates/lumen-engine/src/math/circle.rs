/// `1.0` in 16.16 fixed point.
pub const FIXED_ONE: i32 = 1 << 16;

/// Quarter circle sampled in 16.16 fixed point.
///
/// Entry `i` holds `round(sqrt(1 - y^2) * 65536)` for `y = i / (len - 1)`, so
/// entry 0 is `FIXED_ONE` and the last entry is 0. Full-circle lookups are
/// derived by symmetry (see [`CircleTable::x_for_y`]).
///
/// Built once at engine init and read-only afterwards.
#[derive(Debug, Clone)]
pub struct CircleTable {
    size_bits: u32,
    mask: i32,
    half_mask: i32,
    table: Box<[i32]>,
}

impl CircleTable {
    pub const DEFAULT_SIZE_BITS: u32 = 12;

    pub fn new() -> Self {
        Self::with_size_bits(Self::DEFAULT_SIZE_BITS)
    }

    /// Builds a table with `2^(size_bits - 1)` entries.
    ///
    /// `size_bits` must be in `2..=24`.
    pub fn with_size_bits(size_bits: u32) -> Self {
        assert!(
            (2..=24).contains(&size_bits),
            "circle table size_bits must be in 2..=24, got {size_bits}"
        );

        let len = 1usize << (size_bits - 1);
        let mask = (1i32 << (size_bits - 1)) - 1;
        let half_mask = mask / 2;

        let last = (len - 1) as f64;
        let table: Box<[i32]> = (0..len)
            .map(|i| {
                let y = i as f64 / last;
                let x = (1.0 - y * y).sqrt();
                (x * FIXED_ONE as f64 + 0.5) as i32
            })
            .collect();

        log::debug!("circle table built: {len} entries ({size_bits} bits)");

        Self { size_bits, mask, half_mask, table }
    }

    #[inline]
    pub fn size_bits(&self) -> u32 {
        self.size_bits
    }

    /// Largest valid index (`len - 1`).
    #[inline]
    pub fn mask(&self) -> i32 {
        self.mask
    }

    #[inline]
    pub fn half_mask(&self) -> i32 {
        self.half_mask
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.table
    }

    /// Entry at a quantized Y index, clamped to the table.
    #[inline]
    pub fn get(&self, index: usize) -> i32 {
        self.table[index.min(self.table.len() - 1)]
    }

    /// Quarter-circle X for a 16.16 Y.
    ///
    /// Uses `|y|`, so the lower half mirrors the upper. Y beyond `±1.0` clamps
    /// to the rim and yields 0.
    pub fn x_for_y(&self, y_16_16: i32) -> i32 {
        let y = (y_16_16.unsigned_abs() as i64).min(FIXED_ONE as i64);
        // Round to the nearest sample.
        let index = (y * self.mask as i64 + (FIXED_ONE as i64 / 2)) >> 16;
        self.get(index as usize)
    }
}

impl Default for CircleTable {
    fn default() -> Self {
        Self::new()
    }
}
