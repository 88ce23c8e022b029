//! # Heightmap Generation
//!
//! Surface height per world column, from four noise families:
//!
//! * **Continentalness** decides ocean versus land and shifts the baseline.
//! * **Peaks and valleys** adds the dramatic relief. Its octaves are
//!   accumulated with a running gradient so steep areas are damped, which
//!   gives eroded-looking slopes instead of uniform bumps.
//! * **Peaks-and-valleys location** says where that relief is allowed.
//! * **Smooth** fills the gentle rolling terrain everywhere else.
//!
//! Simplex noise is only piecewise smooth: its derivative jumps across the
//! edges of the skewed simplex grid. A gradient taken by differencing across
//! such an edge spikes, so samples that land close to an edge take their
//! gradient a little further away instead, by central differences.

use std::sync::Arc;

use super::noise_field::{NoiseFamily, NoiseField, LACUNARITY, PERSISTENCE};

/// Skew factor of the 2D simplex grid: (sqrt(3) - 1) / 2.
const SKEW_2D: f64 = 0.366_025_403_784_438_6;

/// Step used for finite differences, in noise space.
const GRADIENT_STEP: f64 = 1.0e-3;
/// Distance to a simplex edge below which a sample counts as on the border.
const BORDER_THRESHOLD: f64 = 2.0 * GRADIENT_STEP;
/// How many times the offset is doubled while looking for a point off the border.
pub const MAX_GRADIENT_ATTEMPTS: u32 = 8;

/// Height of the sea floor baseline before continentalness is applied.
const BASE_HEIGHT: f64 = 4.0;
const CONTINENT_AMPLITUDE: f64 = 28.0;
const PEAKS_AMPLITUDE: f64 = 72.0;
const SMOOTH_AMPLITUDE: f64 = 10.0;
const LOCATION_WEIGHT: f64 = 3.0;
/// Exponent applied to the [0, 1] location value; higher keeps peaks rarer.
const LOCATION_POWER: i32 = 3;

/// True if a noise-space point lies within [`BORDER_THRESHOLD`] of an edge of its simplex cell.
fn near_simplex_border(x: f64, z: f64) -> bool {
    let skew = (x + z) * SKEW_2D;
    let sx = x + skew;
    let sz = z + skew;
    let fx = sx - sx.floor();
    let fz = sz - sz.floor();

    fx < BORDER_THRESHOLD
        || fx > 1.0 - BORDER_THRESHOLD
        || fz < BORDER_THRESHOLD
        || fz > 1.0 - BORDER_THRESHOLD
        || (fx - fz).abs() < BORDER_THRESHOLD
}

/// Builds surface heights for world columns.
///
/// Cloning is cheap: clones share one [`NoiseField`].
#[derive(Clone)]
pub struct HeightmapGenerator {
    noise: Arc<NoiseField>,
}

impl HeightmapGenerator {
    pub fn new(seed: u64) -> Self {
        Self::from_noise(Arc::new(NoiseField::new(seed)))
    }

    pub fn from_noise(noise: Arc<NoiseField>) -> Self {
        HeightmapGenerator { noise }
    }

    pub fn seed(&self) -> u64 {
        self.noise.seed()
    }

    pub fn noise(&self) -> &Arc<NoiseField> {
        &self.noise
    }

    /// Heights for a `size` × `size` square of columns starting at `(min_x, min_z)`.
    ///
    /// # Returns
    /// Row-major heights, indexed by `dx + dz * size`.
    pub fn generate(&self, min_x: i32, min_z: i32, size: usize) -> Vec<i32> {
        let mut heights = Vec::with_capacity(size * size);
        for dz in 0..size as i32 {
            for dx in 0..size as i32 {
                heights.push(self.height_at(min_x + dx, min_z + dz));
            }
        }
        heights
    }

    /// Surface height of a single column.
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let (x, z) = (x as f64, z as f64);

        let continentalness = self.noise.fractal(NoiseFamily::Continentalness, x, z);
        let smooth = self.noise.fractal(NoiseFamily::Smooth, x, z);
        let location = self.noise.fractal(NoiseFamily::PeaksAndValleysLocation, x, z);
        let peaks = self.peaks_and_valleys(x, z);

        let land = smoothstep(-0.1, 0.3, continentalness);
        let peak_weight = ((location + 1.0) * 0.5).clamp(0.0, 1.0).powi(LOCATION_POWER);

        let baseline = BASE_HEIGHT + continentalness * CONTINENT_AMPLITUDE;
        let peak_height = peaks * PEAKS_AMPLITUDE * peak_weight * land;
        let smooth_height = smooth * SMOOTH_AMPLITUDE * (1.0 - peak_weight) * (1.0 - land * 0.5);

        (baseline + peak_height + smooth_height + location * LOCATION_WEIGHT).round() as i32
    }

    /// Gradient-damped fractal sum of the peaks-and-valleys family.
    fn peaks_and_valleys(&self, x: f64, z: f64) -> f64 {
        let family = NoiseFamily::PeaksAndValleys;
        let mut frequency = family.base_frequency();
        let mut amplitude = 1.0;
        let mut total = 0.0;
        let mut norm = 0.0;
        let mut slope = [0.0, 0.0];

        for octave in 0..family.octaves() {
            let (nx, nz) = (x * frequency, z * frequency);
            let value = self.noise.sample(family, octave, nx, nz);
            let gradient = self.gradient(octave, nx, nz);
            slope[0] += gradient[0];
            slope[1] += gradient[1];

            total += amplitude * value / (1.0 + slope[0] * slope[0] + slope[1] * slope[1]);
            norm += amplitude;
            frequency *= LACUNARITY;
            amplitude *= PERSISTENCE;
        }

        total / norm
    }

    /// Noise-space gradient of one peaks-and-valleys octave.
    fn gradient(&self, octave: usize, x: f64, z: f64) -> [f64; 2] {
        let sample = |x: f64, z: f64| self.noise.sample(NoiseFamily::PeaksAndValleys, octave, x, z);

        if !near_simplex_border(x, z) {
            let here = sample(x, z);
            return [
                (sample(x + GRADIENT_STEP, z) - here) / GRADIENT_STEP,
                (sample(x, z + GRADIENT_STEP) - here) / GRADIENT_STEP,
            ];
        }

        // Moving along x alone changes both skewed fractions by different
        // amounts, so the point also leaves the diagonal band.
        let mut offset = 2.0 * GRADIENT_STEP;
        for _ in 0..MAX_GRADIENT_ATTEMPTS {
            if !near_simplex_border(x + offset, z) {
                break;
            }
            offset *= 2.0;
        }

        let ox = x + offset;
        [
            (sample(ox + GRADIENT_STEP, z) - sample(ox - GRADIENT_STEP, z)) / (2.0 * GRADIENT_STEP),
            (sample(ox, z + GRADIENT_STEP) - sample(ox, z - GRADIENT_STEP)) / (2.0 * GRADIENT_STEP),
        ]
    }
}

fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_is_deterministic() {
        let a = HeightmapGenerator::new(42).generate(-40, 96, 32);
        let b = HeightmapGenerator::new(42).generate(-40, 96, 32);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32 * 32);
    }

    #[test]
    fn generate_matches_single_columns() {
        let generator = HeightmapGenerator::new(9);
        let heights = generator.generate(100, -20, 8);
        assert_eq!(heights[3 + 5 * 8], generator.height_at(103, -15));
    }

    #[test]
    fn lattice_points_are_on_the_border() {
        assert!(near_simplex_border(0.0, 0.0));
        assert!(near_simplex_border(0.25, 0.25));
        assert!(!near_simplex_border(0.1, 0.3));
    }

    #[test]
    fn border_gradient_is_finite() {
        let generator = HeightmapGenerator::new(3);
        for &(x, z) in &[(0.0, 0.0), (1.0, 1.0), (0.5, 0.5), (-2.0, 7.0)] {
            let [gx, gz] = generator.gradient(0, x, z);
            assert!(gx.is_finite() && gz.is_finite());
        }
    }

    #[test]
    fn heights_stay_in_a_plausible_band() {
        let generator = HeightmapGenerator::new(1234);
        for height in generator.generate(-512, -512, 64) {
            assert!((-128..=256).contains(&height), "height {height} out of range");
        }
    }
}
