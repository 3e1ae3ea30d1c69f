//! Seedable pseudo-random number generator (xorshift64).
//! Deterministic, fast, no-std compatible.

use glam::Vec3;

/// Seedable pseudo-random number generator (xorshift64).
///
/// Every random quantity in a session (star positions, gallery jitter,
/// lit-body drift) is drawn from one of these, so a fixed seed reproduces
/// the whole scene.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform float in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        // Top 24 bits fill an f32 mantissa exactly.
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform float in [-width/2, width/2).
    pub fn centered(&mut self, width: f32) -> f32 {
        (self.next_f32() - 0.5) * width
    }

    /// Vector with each axis uniform in [-width/2, width/2).
    pub fn centered_vec3(&mut self, width: f32) -> Vec3 {
        Vec3::new(self.centered(width), self.centered(width), self.centered(width))
    }
}
