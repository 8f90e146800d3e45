//! Injectable randomness for every roll the simulation makes.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use sha2::Sha256;

/// Source of the rolls used by actions, events, and the daily event check.
///
/// Every probability roll consumes exactly one `unit()` draw so scripted
/// sources stay aligned with the call sequence.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// Uniform integer in `[min, max]`.
    fn range_inclusive(&mut self, min: i32, max: i32) -> i32;

    /// True with the given probability.
    fn chance(&mut self, probability: f32) -> bool {
        self.unit() < probability
    }

    /// Index chosen with probability `weight_i / sum(weights)`.
    ///
    /// Non-positive weights are never chosen; returns `None` when nothing has
    /// positive weight.
    fn pick_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        let total: f32 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let roll = self.unit() * total;
        let mut current = 0.0;
        let mut last_live = None;
        for (idx, weight) in weights.iter().enumerate() {
            if *weight <= 0.0 {
                continue;
            }
            current += *weight;
            last_live = Some(idx);
            if roll < current {
                return Some(idx);
            }
        }
        last_live
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn unit(&mut self) -> f32 {
        (**self).unit()
    }

    fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
        (**self).range_inclusive(min, max)
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    /// Deterministic stream derived from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self::wrap(SmallRng::seed_from_u64(derive_stream_seed(seed, b"castaway.day")))
    }

    /// Stream seeded from OS entropy, for unseeded runs.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::wrap(SmallRng::from_entropy())
    }
}

impl<R: RngCore> CountingRng<R> {
    pub const fn wrap(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

impl<R: RngCore> RandomSource for CountingRng<R> {
    fn unit(&mut self) -> f32 {
        self.r#gen::<f32>()
    }

    fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        self.gen_range(low..=high)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}
