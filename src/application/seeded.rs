// Counter-based pseudo-random draws
//
// Each entity gets its own ChaCha8 stream keyed by (seed, domain | index).
// The n-th draw of an entity only depends on that key and n, never on which
// other entities were generated before it.
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const ROBOT_DOMAIN: u64 = 1 << 40;
pub const OPERATIONS_DOMAIN: u64 = 2 << 40;

pub struct SeededDraws {
    rng: ChaCha8Rng,
}

impl SeededDraws {
    pub fn new(seed: u64, domain: u64, index: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(domain | index);
        Self { rng }
    }

    /// Uniform integer in `0..upper`.
    pub fn below(&mut self, upper: u32) -> u32 {
        self.rng.gen_range(0..upper)
    }

    pub fn int_in(&mut self, low: u32, high_inclusive: u32) -> u32 {
        self.rng.gen_range(low..=high_inclusive)
    }

    pub fn float_in(&mut self, low: f64, high: f64) -> f64 {
        self.rng.gen_range(low..high)
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability)
    }

    pub fn pick<'a, T, const N: usize>(&mut self, items: &'a [T; N]) -> &'a T {
        const { assert!(N > 0, "cannot pick from an empty table") };
        &items[self.rng.gen_range(0..N)]
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
