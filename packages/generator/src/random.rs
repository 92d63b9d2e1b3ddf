use std::ops::RangeInclusive;

use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};

/// Random source for one generated object.
pub(crate) struct Random {
    rng: StdRng,
}

impl Random {
    /// Seeds from `seed` mixed with `stream`, or from OS entropy when `seed` is zero.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        let rng = if seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(seed ^ stream)
        };

        Self { rng }
    }

    /// Uniform draw from `0..bound`. Panics on a zero bound.
    pub fn below(&mut self, bound: u64) -> u64 {
        self.rng.gen_range(0..bound)
    }

    /// Uniform draw from `range`, both ends included.
    pub fn size(&mut self, range: RangeInclusive<usize>) -> usize {
        self.rng.gen_range(range)
    }

    /// Three Altair participation flag bits.
    pub fn participation_flags(&mut self) -> u8 {
        self.rng.gen_range(0..=0b111)
    }

    pub fn index(&mut self, validators: usize) -> u64 {
        self.below(validators as u64)
    }

    pub fn array<const N: usize>(&mut self) -> [u8; N] {
        let mut bytes = [0; N];
        self.rng.fill_bytes(&mut bytes);
        bytes
    }

    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0; len];
        self.rng.fill_bytes(&mut bytes);
        bytes
    }
}
