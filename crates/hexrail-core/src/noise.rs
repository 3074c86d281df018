//! Seeded 2D gradient noise used for terrain generation.
//!
//! The permutation table is shuffled with a Park-Miller linear congruential
//! generator so the same seed yields the same table on every platform.

const LCG_MULTIPLIER: u64 = 16_807;
const LCG_MODULUS: u64 = 2_147_483_647;

/// Park-Miller minimal standard generator.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Seed the generator. The state must stay within `1..LCG_MODULUS`.
    pub fn new(seed: u32) -> Self {
        let state = seed as u64 % LCG_MODULUS;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    /// Advance and return the next state.
    pub fn next_u32(&mut self) -> u32 {
        self.state = (self.state * LCG_MULTIPLIER) % LCG_MODULUS;
        self.state as u32
    }
}

/// Classic 2D gradient noise over a 512-entry permutation table.
#[derive(Clone)]
pub struct GradientNoise {
    perm: [u8; 512],
}

impl GradientNoise {
    /// Build the permutation table for `seed`.
    pub fn new(seed: u32) -> Self {
        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);
        let mut lcg = Lcg::new(seed);

        for i in (1..256).rev() {
            let j = lcg.next_u32() as usize % (i + 1);
            table.swap(i, j);
        }

        Self {
            perm: std::array::from_fn(|i| table[i & 255]),
        }
    }

    /// Sample the noise at `(x, y)`. Output lies roughly in `[-1, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let xi = (x0 as i64 & 255) as usize;
        let yi = (y0 as i64 & 255) as usize;
        let xf = x - x0;
        let yf = y - y0;

        let u = fade(xf);
        let v = fade(yf);

        let p = &self.perm;
        let aa = p[p[xi] as usize + yi];
        let ab = p[p[xi] as usize + yi + 1];
        let ba = p[p[xi + 1] as usize + yi];
        let bb = p[p[xi + 1] as usize + yi + 1];

        let bottom = lerp(grad(aa, xf, yf), grad(ba, xf - 1.0, yf), u);
        let top = lerp(grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0), u);
        lerp(bottom, top, v)
    }

    /// Fractal sum of `octaves` layers, normalized by the total amplitude.
    pub fn fractal(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if max_amplitude == 0.0 {
            0.0
        } else {
            total / max_amplitude
        }
    }
}

impl std::fmt::Debug for GradientNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradientNoise")
            .field("perm", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_sequence() {
        let mut lcg = Lcg::new(1);
        assert_eq!(lcg.next_u32(), 16_807);
        assert_eq!(lcg.next_u32(), 282_475_249);
    }

    #[test]
    fn test_lcg_zero_seed() {
        let mut a = Lcg::new(0);
        assert_ne!(a.next_u32(), 0);
    }

    #[test]
    fn test_permutation_is_permutation() {
        let noise = GradientNoise::new(42);
        let mut seen = [false; 256];
        for &v in &noise.perm[..256] {
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(noise.perm[..256], noise.perm[256..]);
    }

    #[test]
    fn test_noise_determinism() {
        let a = GradientNoise::new(7);
        let b = GradientNoise::new(7);
        for i in 0..50 {
            let x = i as f64 * 0.37;
            let y = i as f64 * 0.11;
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_noise_zero_at_lattice() {
        let noise = GradientNoise::new(3);
        assert_eq!(noise.sample(4.0, 9.0), 0.0);
    }

    #[test]
    fn test_fade_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert_eq!(fade(0.5), 0.5);
    }

    #[test]
    fn test_fractal_range() {
        let noise = GradientNoise::new(99);
        for i in 0..200 {
            let v = noise.fractal(i as f64 * 0.13, i as f64 * 0.07, 5, 0.5, 2.0);
            assert!((-1.0..=1.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = GradientNoise::new(1);
        let b = GradientNoise::new(2);
        let differs = (0..20).any(|i| {
            let x = 0.3 + i as f64 * 0.41;
            a.sample(x, x * 0.5) != b.sample(x, x * 0.5)
        });
        assert!(differs);
    }
}
