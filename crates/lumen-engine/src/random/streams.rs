use rand_core::RngCore;

use super::StreamRng;

/// Four width-specific generators.
///
/// Seeded once from the clock epoch with offsets 0..=3 and kept for the
/// lifetime of the engine. Single-owner: not meant to be shared across threads.
#[derive(Debug, Clone)]
pub struct RandomStreams {
    rnd_8: StreamRng,
    rnd_16: StreamRng,
    rnd_32: StreamRng,
    rnd_64: StreamRng,
}

impl RandomStreams {
    pub fn new(seed: u64) -> Self {
        Self {
            rnd_8: StreamRng::new(seed),
            rnd_16: StreamRng::new(seed.wrapping_add(1)),
            rnd_32: StreamRng::new(seed.wrapping_add(2)),
            rnd_64: StreamRng::new(seed.wrapping_add(3)),
        }
    }

    /// Uniform integer in `[min, max]` (inclusive).
    ///
    /// The range is reduced by modulo on the narrowest stream covering it
    /// (thresholds `0x10`, `0x1000`, `0x100_0000`). This is biased for ranges
    /// that do not divide the stream's period; the bias is negligible for the
    /// small ranges games draw from.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min <= max, "random range: min ({min}) must be <= max ({max})");

        let span = (max as i128 - min as i128 + 1) as u128;
        if span > u64::MAX as u128 {
            // Full i64 domain: every raw value is a valid draw.
            return self.rnd_64.next_u64() as i64;
        }

        let range = span as u64;
        let offset = if range < 0x1000 {
            if range < 0x10 {
                self.rnd_8.next_u64() % range
            } else {
                self.rnd_16.next_u64() % range
            }
        } else if range < 0x100_0000 {
            self.rnd_32.next_u64() % range
        } else {
            self.rnd_64.next_u64() % range
        };

        (min as i128 + offset as i128) as i64
    }

    #[inline]
    pub fn next_u8(&mut self) -> u8 {
        (self.rnd_8.next_u64() >> 56) as u8
    }

    #[inline]
    pub fn next_u16(&mut self) -> u16 {
        (self.rnd_16.next_u64() >> 48) as u16
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.rnd_32.next_u32()
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.rnd_64.next_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_stays_in_bounds() {
        let mut r = RandomStreams::new(12345);
        for (min, max) in [(0, 0), (-3, 3), (0, 9), (100, 5000), (-1 << 40, 1 << 40)] {
            for _ in 0..2000 {
                let v = r.range(min, max);
                assert!((min..=max).contains(&v), "{v} outside [{min}, {max}]");
            }
        }
    }

    #[test]
    fn degenerate_range_returns_min() {
        let mut r = RandomStreams::new(1);
        assert_eq!(r.range(7, 7), 7);
        assert_eq!(r.range(i64::MIN, i64::MIN), i64::MIN);
    }

    #[test]
    fn full_domain_does_not_overflow() {
        let mut r = RandomStreams::new(9);
        for _ in 0..100 {
            let _ = r.range(i64::MIN, i64::MAX);
        }
        let v = r.range(i64::MAX - 1, i64::MAX);
        assert!(v == i64::MAX - 1 || v == i64::MAX);
    }

    #[test]
    fn digits_pass_chi_square() {
        const N: usize = 100_000;
        let mut r = RandomStreams::new(0xDEAD_BEEF);
        let mut counts = [0usize; 10];
        for _ in 0..N {
            counts[r.range(0, 9) as usize] += 1;
        }

        assert!(counts.iter().all(|&c| c > 0));

        let expected = N as f64 / 10.0;
        let chi2: f64 = counts
            .iter()
            .map(|&c| {
                let d = c as f64 - expected;
                d * d / expected
            })
            .sum();
        // 9 degrees of freedom; p = 0.001 critical value is 27.88.
        assert!(chi2 < 27.88, "chi-square {chi2} with counts {counts:?}");
    }

    #[test]
    fn widths_are_independent_streams() {
        let mut a = RandomStreams::new(77);
        let mut b = RandomStreams::new(77);

        // Draw heavily from other widths on `b` only.
        for _ in 0..500 {
            b.next_u64();
            b.next_u32();
            b.next_u16();
            b.range(0, 1 << 30);
        }

        for _ in 0..100 {
            assert_eq!(a.next_u8(), b.next_u8());
        }
    }

    #[test]
    fn small_ranges_use_the_8_bit_stream() {
        let mut a = RandomStreams::new(5);
        let mut b = RandomStreams::new(5);
        b.range(0, 1 << 20);
        b.range(0, 1000);
        // Both streams untouched at width 8, so the next small draws agree.
        for _ in 0..50 {
            assert_eq!(a.range(0, 9), b.range(0, 9));
        }
    }

    #[test]
    #[should_panic(expected = "min (5) must be <= max (4)")]
    fn inverted_range_panics() {
        let mut r = RandomStreams::new(0);
        r.range(5, 4);
    }
}
