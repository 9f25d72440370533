//! Seeded 2D simplex noise with fBm octave stacking
//!
//! Every terrain pass and the placement sampler own one `SimplexNoise`.
//! The permutation tables are built once from the seed and never change,
//! so an instance can be shared by reference across all chunk builds.

const F2: f64 = 0.366_025_403_784_438_6; // (sqrt(3) - 1) / 2
const G2: f64 = 0.211_324_865_405_187_1; // (3 - sqrt(3)) / 6

const PARK_MILLER_MULTIPLIER: u64 = 16807;
const PARK_MILLER_MODULUS: u64 = 2_147_483_647;

/// Seeds are scaled by this before truncation so fractional seeds
/// (e.g. `42.0 * 2.713`) still produce distinct generator states.
const SEED_SCALE: f64 = 1000.0;

/// The 12 edge directions of a cube, projected onto the xy plane.
const GRAD3: [[f64; 2]; 12] = [
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [0.0, 1.0],
    [0.0, -1.0],
];

/// Park-Miller minimal standard generator, only used to shuffle the table.
struct ParkMiller {
    state: u64,
}

impl ParkMiller {
    fn new(seed: f64) -> Self {
        let scaled = (seed.abs() * SEED_SCALE).floor() as u64 % PARK_MILLER_MODULUS;
        ParkMiller {
            state: if scaled == 0 { 1 } else { scaled },
        }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state * PARK_MILLER_MULTIPLIER % PARK_MILLER_MODULUS;
        self.state
    }
}

#[derive(Clone)]
pub struct SimplexNoise {
    perm: [u8; 512],
    perm_mod12: [u8; 512],
    seed: f64,
}

impl SimplexNoise {
    /// Build the permutation tables for `seed`. The seed must be finite;
    /// callers validate it at the settings boundary.
    pub fn new(seed: f64) -> Self {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }

        let mut rng = ParkMiller::new(seed);
        for i in (1..table.len()).rev() {
            let j = (rng.next() % (i as u64 + 1)) as usize;
            table.swap(i, j);
        }

        let mut perm = [0u8; 512];
        let mut perm_mod12 = [0u8; 512];
        for i in 0..512 {
            perm[i] = table[i & 255];
            perm_mod12[i] = perm[i] % 12;
        }

        SimplexNoise {
            perm,
            perm_mod12,
            seed,
        }
    }

    pub fn seed(&self) -> f64 {
        self.seed
    }

    /// Single-octave simplex noise, approximately in [-1, 1].
    pub fn noise_2d(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let gi0 = self.perm_mod12[ii + self.perm[jj] as usize] as usize;
        let gi1 = self.perm_mod12[ii + i1 + self.perm[jj + j1] as usize] as usize;
        let gi2 = self.perm_mod12[ii + 1 + self.perm[jj + 1] as usize] as usize;

        let n0 = corner(gi0, x0, y0);
        let n1 = corner(gi1, x1, y1);
        let n2 = corner(gi2, x2, y2);

        70.0 * (n0 + n1 + n2)
    }

    /// Fractal Brownian motion, normalized by the summed amplitudes so the
    /// result stays in the same range as `noise_2d`. Zero octaves yield 0.
    pub fn fbm(&self, x: f64, y: f64, octaves: u32, lacunarity: f64, gain: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            total += self.noise_2d(x * frequency, y * frequency) * amplitude;
            max_value += amplitude;
            frequency *= lacunarity;
            amplitude *= gain;
        }

        if max_value == 0.0 {
            return 0.0;
        }
        total / max_value
    }
}

#[inline]
fn corner(gradient: usize, x: f64, y: f64) -> f64 {
    let t = 0.5 - x * x - y * y;
    if t < 0.0 {
        return 0.0;
    }
    let t2 = t * t;
    let g = GRAD3[gradient];
    t2 * t2 * (g[0] * x + g[1] * y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn permutation_is_a_shuffle_of_the_identity() {
        let noise = SimplexNoise::new(42.0);
        let mut seen = [false; 256];
        for &p in &noise.perm[..256] {
            assert!(!seen[p as usize]);
            seen[p as usize] = true;
        }
        assert_eq!(&noise.perm[..256], &noise.perm[256..]);
        for i in 0..512 {
            assert_eq!(noise.perm_mod12[i], noise.perm[i] % 12);
        }
    }

    #[test]
    fn same_seed_gives_identical_bits() {
        let a = SimplexNoise::new(42.0);
        let b = SimplexNoise::new(42.0);
        for k in 0..200 {
            let x = k as f64 * 0.731 - 40.0;
            let y = k as f64 * -0.417 + 13.0;
            assert_eq!(a.noise_2d(x, y).to_bits(), b.noise_2d(x, y).to_bits());
        }
    }

    #[test]
    fn derived_seeds_decorrelate() {
        let a = SimplexNoise::new(42.0);
        let b = SimplexNoise::new(42.0 * 2.713);
        assert_ne!(a.perm, b.perm);
    }

    #[test]
    fn lattice_origin_is_zero() {
        // All three corner offsets at the origin give a zero dot product
        // with the first corner, and the others fall outside the kernel.
        let noise = SimplexNoise::new(7.0);
        assert!(noise.noise_2d(0.0, 0.0).abs() < 1e-12);
    }

    #[test]
    fn zero_octaves_is_flat() {
        let noise = SimplexNoise::new(3.0);
        assert_eq!(noise.fbm(12.5, -3.0, 0, 2.0, 0.5), 0.0);
    }

    proptest! {
        #[test]
        fn noise_stays_near_unit_range(seed in -1.0e6f64..1.0e6, x in -1.0e4f64..1.0e4, y in -1.0e4f64..1.0e4) {
            let noise = SimplexNoise::new(seed);
            prop_assert!(noise.noise_2d(x, y).abs() <= 1.0 + 1e-9);
        }

        #[test]
        fn fbm_is_normalized(
            seed in 0.0f64..1.0e5,
            x in -5.0e3f64..5.0e3,
            y in -5.0e3f64..5.0e3,
            octaves in 1u32..8,
            lacunarity in 1.5f64..3.0,
            gain in 0.2f64..0.8,
        ) {
            let noise = SimplexNoise::new(seed);
            prop_assert!(noise.fbm(x, y, octaves, lacunarity, gain).abs() <= 1.0 + 1e-9);
        }
    }
}
