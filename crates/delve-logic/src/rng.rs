//! Seeded random source threaded through every generation phase.
//!
//! Each generator owns its own `RandomSource`; there is no process-wide RNG,
//! so dungeons generated side by side stay independent and reproducible.

use crate::error::GenError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic PRNG producing closed-range integers and coin flips.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(u64::from(seed)),
        }
    }

    /// Reset the state so the draw sequence restarts for `seed`.
    pub fn seed(&mut self, seed: u32) {
        self.rng = StdRng::seed_from_u64(u64::from(seed));
    }

    /// Uniform integer in `[low, high]`.
    pub fn uniform_int(&mut self, low: i32, high: i32) -> Result<i32, GenError> {
        if low > high {
            return Err(GenError::InvalidRange { low, high });
        }
        Ok(self.rng.gen_range(low..=high))
    }

    /// Fair coin flip, drawn as `uniform_int(0, 1) == 1`.
    pub fn next_bool(&mut self) -> bool {
        matches!(self.uniform_int(0, 1), Ok(1))
    }
}
