//! 2D Perlin gradient noise over a seeded permutation table.
//!
//! The table is the identity permutation of `0..256` shuffled with a
//! [`StdRng`] seeded from the caller's seed, then doubled so corner hashes
//! never need a second wrap. The same seed always yields the same field.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Seeded 2D Perlin noise. Samples are signed, roughly in `[-1, 1]`.
#[derive(Clone)]
pub struct Perlin2D {
    perm: [u8; 512],
}

impl Perlin2D {
    /// Builds the permutation table for `seed`.
    pub fn new(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        table.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn hash(&self, x: i32, y: i32) -> u8 {
        let a = self.perm[(x & 255) as usize] as usize;
        self.perm[a + (y & 255) as usize]
    }

    /// Samples the field at `(x, y)`.
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let xi = x.floor() as i32;
        let yi = y.floor() as i32;

        let xf = x - x.floor();
        let yf = y - y.floor();

        let u = fade(xf);
        let v = fade(yf);

        let aa = self.hash(xi, yi);
        let ab = self.hash(xi, yi + 1);
        let ba = self.hash(xi + 1, yi);
        let bb = self.hash(xi + 1, yi + 1);

        let x1 = lerp(grad(aa, xf, yf), grad(ab, xf, yf - 1.0), v);
        let x2 = lerp(grad(ba, xf - 1.0, yf), grad(bb, xf - 1.0, yf - 1.0), v);

        lerp(x1, x2, u)
    }
}

impl Default for Perlin2D {
    fn default() -> Self {
        Self::new(0)
    }
}

impl core::fmt::Debug for Perlin2D {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Perlin2D")
            .field("perm", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: u8, x: f32, y: f32) -> f32 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}
