//! Seeded Mersenne Twister generator.
//!
//! [`MersenneRng`] wraps the 32-bit MT19937 core of `rand_mt` with the sampling
//! routines of the classic "randomkit" library: 53-bit uniform doubles,
//! rejection sampled bounded integers and polar-method Gaussian deviates. A
//! given seed always yields the same sequence, which makes every optimizer
//! run reproducible.
//!
//! The generator also implements [`RngCore`] and [`SeedableRng`], so the
//! distributions of the `rand` crate can draw from it too.

use rand::{RngCore, SeedableRng, rand_core::impls};
use rand_mt::Mt;

/// MT19937 generator with a cached Gaussian deviate.
#[derive(Debug, Clone)]
pub struct MersenneRng {
    mt: Mt,
    gauss: Option<f64>,
}

impl MersenneRng {
    /// Creates a generator from the low 32 bits of `seed`.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            mt: Mt::new((seed & 0xffff_ffff) as u32),
            gauss: None,
        }
    }

    /// Returns the next tempered 32-bit output.
    pub fn next_raw(&mut self) -> u32 {
        self.mt.next_u32()
    }

    fn next_wide(&mut self) -> u64 {
        let high = u64::from(self.next_raw());
        let low = u64::from(self.next_raw());
        (high << 32) | low
    }

    /// Returns a uniform double in `[0, 1)` built from two outputs.
    #[expect(clippy::cast_precision_loss)]
    pub fn next_uniform(&mut self) -> f64 {
        let a = u64::from(self.next_raw() >> 5);
        let b = u64::from(self.next_raw() >> 6);
        (a as f64 * 67_108_864.0 + b as f64) / 9_007_199_254_740_992.0
    }

    /// Returns a uniform integer in `[0, max]`, inclusive.
    pub fn next_interval(&mut self, max: u64) -> u64 {
        if max == 0 {
            return 0;
        }
        let mask = u64::MAX >> max.leading_zeros();
        if max <= u64::from(u32::MAX) {
            loop {
                let value = u64::from(self.next_raw()) & mask;
                if value <= max {
                    return value;
                }
            }
        }
        loop {
            let value = self.next_wide() & mask;
            if value <= max {
                return value;
            }
        }
    }

    /// Returns a uniform index in `0..len`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    #[expect(clippy::cast_possible_truncation)]
    pub fn next_index(&mut self, len: usize) -> usize {
        assert!(len > 0, "cannot draw an index from an empty range");
        self.next_interval(len as u64 - 1) as usize
    }

    /// Returns a standard normal deviate.
    ///
    /// Deviates are produced in pairs by the polar method; the second of each
    /// pair is returned by the following call.
    pub fn next_gaussian(&mut self) -> f64 {
        if let Some(cached) = self.gauss.take() {
            return cached;
        }
        loop {
            let x1 = 2.0 * self.next_uniform() - 1.0;
            let x2 = 2.0 * self.next_uniform() - 1.0;
            let r2 = x1 * x1 + x2 * x2;
            if r2 < 1.0 && r2 != 0.0 {
                let f = (-2.0 * r2.ln() / r2).sqrt();
                self.gauss = Some(f * x1);
                return f * x2;
            }
        }
    }
}

impl RngCore for MersenneRng {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        self.next_wide()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst);
    }
}

impl SeedableRng for MersenneRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from(u32::from_le_bytes(seed)))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}
