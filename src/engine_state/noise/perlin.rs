//! # Perlin Noise
//!
//! Seeded 2D and 3D gradient noise with an octave helper for fractal terrain.
//!
//! ## Algorithm
//!
//! A 256 entry permutation of `0..=255` is shuffled with a seeded RNG and stored twice in
//! a 512 entry table, so `perm[perm[x] + y + 1]` never needs a range check. Each sample:
//!
//! 1. scales the input by `frequency`
//! 2. finds the lattice cell and the local offset inside it
//! 3. hashes the cell corners through the table
//! 4. takes a dot product between each corner's gradient and the offset to the sample
//! 5. eases the offsets with `6t^5 - 15t^4 + 10t^3` and interpolates the corner values
//!
//! 2D gradients are restricted to the four axis-aligned unit vectors so the dot products
//! collapse to a signed copy of one coordinate. The signed result lies in `[-1, 1]` and is
//! remapped to `[0, 1]` by the public sampling functions.
//!
//! Every lattice point has a zero signed value; see [`PerlinNoise::generate_2d_signed`].

/// Number of distinct lattice hashes.
const PERMUTATION_SIZE: usize = 256;

/// A seeded Perlin noise source.
///
/// # Example
/// ```ignore
/// let noise = PerlinNoise::new(1337);
/// let height = noise.octave_generate_2d(120.0, 48.0, 0.02, 2, 0.7);
/// assert!((0.0..=1.0).contains(&height));
/// ```
#[derive(Clone)]
pub struct PerlinNoise {
    permutation: [usize; PERMUTATION_SIZE * 2],
}

impl PerlinNoise {
    /// Builds the permutation table for `seed`.
    pub fn new(seed: u64) -> Self {
        let mut values: Vec<usize> = (0..PERMUTATION_SIZE).collect();
        let mut rng = fastrand::Rng::with_seed(seed);
        rng.shuffle(&mut values);

        let mut permutation = [0usize; PERMUTATION_SIZE * 2];
        for (i, value) in values.iter().enumerate() {
            permutation[i] = *value;
            permutation[i + PERMUTATION_SIZE] = *value;
        }

        Self { permutation }
    }

    /// Samples 2D noise in `[0, 1]`.
    pub fn generate_2d(&self, x: f64, y: f64, frequency: f64) -> f64 {
        (self.generate_2d_signed(x, y, frequency) + 1.0) / 2.0
    }

    /// Samples 2D noise before the `[0, 1]` remap.
    ///
    /// The result lies in `[-1, 1]`. Whenever `x * frequency` and `y * frequency` are both
    /// integers the sample sits on a lattice point and the result is exactly `0.0`.
    pub fn generate_2d_signed(&self, x: f64, y: f64, frequency: f64) -> f64 {
        let x = x * frequency;
        let y = y * frequency;

        let (cell_x, x) = split(x);
        let (cell_y, y) = split(y);

        let u = fade(x);
        let v = fade(y);

        let p = &self.permutation;
        let aa = p[p[cell_x] + cell_y];
        let ab = p[p[cell_x] + cell_y + 1];
        let ba = p[p[cell_x + 1] + cell_y];
        let bb = p[p[cell_x + 1] + cell_y + 1];

        let bottom = lerp(grad_2d(aa, x, y), grad_2d(ba, x - 1.0, y), u);
        let top = lerp(grad_2d(ab, x, y - 1.0), grad_2d(bb, x - 1.0, y - 1.0), u);

        lerp(bottom, top, v)
    }

    /// Samples 3D noise, clamped to `[0, 1]`.
    ///
    /// The remapped value can land slightly outside the unit range where two gradient
    /// components add up. Clamping keeps it in the same range as the 2D samples, and
    /// thresholds below `1.0` see the same result either way.
    pub fn generate_3d(&self, x: f64, y: f64, z: f64, frequency: f64) -> f64 {
        let x = x * frequency;
        let y = y * frequency;
        let z = z * frequency;

        let (cell_x, x) = split(x);
        let (cell_y, y) = split(y);
        let (cell_z, z) = split(z);

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let p = &self.permutation;
        let a = p[cell_x] + cell_y;
        let aa = p[a] + cell_z;
        let ab = p[a + 1] + cell_z;
        let b = p[cell_x + 1] + cell_y;
        let ba = p[b] + cell_z;
        let bb = p[b + 1] + cell_z;

        let near = lerp(
            lerp(grad_3d(p[aa], x, y, z), grad_3d(p[ba], x - 1.0, y, z), u),
            lerp(
                grad_3d(p[ab], x, y - 1.0, z),
                grad_3d(p[bb], x - 1.0, y - 1.0, z),
                u,
            ),
            v,
        );
        let far = lerp(
            lerp(
                grad_3d(p[aa + 1], x, y, z - 1.0),
                grad_3d(p[ba + 1], x - 1.0, y, z - 1.0),
                u,
            ),
            lerp(
                grad_3d(p[ab + 1], x, y - 1.0, z - 1.0),
                grad_3d(p[bb + 1], x - 1.0, y - 1.0, z - 1.0),
                u,
            ),
            v,
        );

        ((lerp(near, far, w) + 1.0) / 2.0).clamp(0.0, 1.0)
    }

    /// Sums `octaves` layers of 2D noise, each at twice the frequency and `persistence`
    /// times the amplitude of the previous one, normalised back into `[0, 1]`.
    ///
    /// Zero octaves have no amplitude to normalise by and yield `0.0`.
    pub fn octave_generate_2d(
        &self,
        x: f64,
        y: f64,
        frequency: f64,
        octaves: u32,
        persistence: f64,
    ) -> f64 {
        let mut total = 0.0;
        let mut max_value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = frequency;

        for _ in 0..octaves {
            total += self.generate_2d(x, y, frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        if max_value == 0.0 {
            return 0.0;
        }

        total / max_value
    }
}

/// Splits a coordinate into its wrapped lattice cell and the offset inside that cell.
#[inline]
fn split(coordinate: f64) -> (usize, f64) {
    let floor = coordinate.floor();
    let cell = (floor as i64 & (PERMUTATION_SIZE as i64 - 1)) as usize;
    (cell, coordinate - floor)
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(from: f64, to: f64, amount: f64) -> f64 {
    (1.0 - amount) * from + amount * to
}

#[inline]
fn grad_2d(hash: usize, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => y,
        1 => -y,
        2 => -x,
        _ => x,
    }
}

#[inline]
fn grad_3d(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    match hash & 0xF {
        0x0 => x + y,
        0x1 => -x + y,
        0x2 => x - y,
        0x3 => -x - y,
        0x4 => x + z,
        0x5 => -x + z,
        0x6 => x - z,
        0x7 => -x - z,
        0x8 => y + z,
        0x9 => -y + z,
        0xA => y - z,
        0xB => -y - z,
        0xC => y + x,
        0xD => -y + z,
        0xE => y - x,
        _ => -y - z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_seed_same_table() {
        let a = PerlinNoise::new(42);
        let b = PerlinNoise::new(42);
        assert_eq!(a.permutation, b.permutation);
        assert_eq!(a.generate_2d(3.7, 9.1, 1.0), b.generate_2d(3.7, 9.1, 1.0));
    }

    #[test]
    fn table_is_a_duplicated_permutation() {
        let noise = PerlinNoise::new(7);
        let mut first_half = noise.permutation[..PERMUTATION_SIZE].to_vec();
        assert_eq!(&noise.permutation[..PERMUTATION_SIZE], &noise.permutation[PERMUTATION_SIZE..]);
        first_half.sort_unstable();
        assert_eq!(first_half, (0..PERMUTATION_SIZE).collect::<Vec<_>>());
    }

    #[test]
    fn lattice_points_are_zero_before_remap() {
        let noise = PerlinNoise::new(99);
        for (x, y, frequency) in [(0.0, 0.0, 1.0), (5.0, 12.0, 1.0), (20.0, 40.0, 0.5), (300.0, 7.0, 1.0)] {
            assert_eq!(noise.generate_2d_signed(x, y, frequency), 0.0);
            assert_eq!(noise.generate_2d(x, y, frequency), 0.5);
        }
    }

    #[test]
    fn single_octave_is_plain_noise() {
        let noise = PerlinNoise::new(3);
        for (x, y) in [(1.25, 2.5), (17.3, 0.9), (100.1, 55.55)] {
            let plain = noise.generate_2d(x, y, 0.02);
            let octave = noise.octave_generate_2d(x, y, 0.02, 1, 0.7);
            assert!((plain - octave).abs() < 1e-12);
        }
    }

    #[test]
    fn zero_octaves_yield_zero() {
        let noise = PerlinNoise::new(3);
        assert_eq!(noise.octave_generate_2d(12.5, 3.5, 0.02, 0, 0.5), 0.0);
    }

    #[test]
    fn noise_varies_between_lattice_points() {
        let noise = PerlinNoise::new(11);
        let samples: Vec<f64> = (0..32)
            .map(|i| noise.generate_2d(i as f64 * 0.37 + 0.1, 4.3, 1.0))
            .collect();
        let first = samples[0];
        assert!(samples.iter().any(|s| (s - first).abs() > 1e-6));
    }

    #[test]
    fn dense_3d_scan_stays_in_unit_range() {
        let noise = PerlinNoise::new(7);
        for i in 0..40 {
            for j in 0..40 {
                for k in 0..40 {
                    let sample = noise.generate_3d(i as f64 * 0.1, j as f64 * 0.1, k as f64 * 0.1, 1.0);
                    assert!((0.0..=1.0).contains(&sample));
                }
            }
        }
    }

    proptest! {
        #[test]
        fn samples_stay_in_unit_range(
            x in -1000.0f64..1000.0,
            y in -1000.0f64..1000.0,
            z in -1000.0f64..1000.0,
            seed in any::<u64>(),
        ) {
            let noise = PerlinNoise::new(seed);
            let two = noise.generate_2d(x, y, 0.37);
            let three = noise.generate_3d(x, y, z, 0.04);
            let octave = noise.octave_generate_2d(x, y, 0.02, 3, 0.7);
            prop_assert!((0.0..=1.0).contains(&two));
            prop_assert!((0.0..=1.0).contains(&three));
            prop_assert!((0.0..=1.0).contains(&octave));
        }
    }
}
