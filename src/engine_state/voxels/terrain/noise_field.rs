//! Seeded noise primitives shared by terrain generation.
//!
//! Every sampler is derived from the world seed alone, so two fields built
//! from the same seed answer every query identically on any thread.

use noise::{NoiseFn, Simplex};

/// The independent octave families the heightmap is built from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NoiseFamily {
    PeaksAndValleys,
    Smooth,
    Continentalness,
    PeaksAndValleysLocation,
}

impl NoiseFamily {
    pub const ALL: [NoiseFamily; 4] = [
        NoiseFamily::PeaksAndValleys,
        NoiseFamily::Smooth,
        NoiseFamily::Continentalness,
        NoiseFamily::PeaksAndValleysLocation,
    ];

    pub const fn octaves(self) -> usize {
        match self {
            NoiseFamily::PeaksAndValleys => 5,
            NoiseFamily::Smooth => 3,
            NoiseFamily::Continentalness => 7,
            NoiseFamily::PeaksAndValleysLocation => 2,
        }
    }

    /// Frequency of the first octave, in cycles per block.
    pub const fn base_frequency(self) -> f64 {
        match self {
            NoiseFamily::PeaksAndValleys => 1.0 / 384.0,
            NoiseFamily::Smooth => 1.0 / 256.0,
            NoiseFamily::Continentalness => 1.0 / 2048.0,
            NoiseFamily::PeaksAndValleysLocation => 1.0 / 1024.0,
        }
    }

    const fn salt(self) -> u64 {
        match self {
            NoiseFamily::PeaksAndValleys => 0x9E37_79B9,
            NoiseFamily::Smooth => 0x85EB_CA6B,
            NoiseFamily::Continentalness => 0xC2B2_AE35,
            NoiseFamily::PeaksAndValleysLocation => 0x27D4_EB2F,
        }
    }
}

/// Each octave doubles the frequency and halves the amplitude.
pub const LACUNARITY: f64 = 2.0;
pub const PERSISTENCE: f64 = 0.5;

/// splitmix64 finaliser.
#[inline]
const fn mix(mut value: u64) -> u64 {
    value = (value ^ (value >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value = (value ^ (value >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}

/// Deterministic simplex samplers and per-column randomness for one world seed.
pub struct NoiseField {
    seed: u64,
    samplers: [Vec<Simplex>; 4],
}

impl NoiseField {
    pub fn new(seed: u64) -> Self {
        let samplers = NoiseFamily::ALL.map(|family| {
            (0..family.octaves() as u64)
                .map(|octave| {
                    let mixed = mix(seed ^ mix(family.salt().wrapping_add(octave)));
                    Simplex::new((mixed >> 32) as u32 ^ mixed as u32)
                })
                .collect()
        });
        NoiseField { seed, samplers }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Raw simplex value in roughly [-1, 1] for one octave, at noise-space coordinates.
    #[inline]
    pub fn sample(&self, family: NoiseFamily, octave: usize, x: f64, z: f64) -> f64 {
        self.samplers[family as usize][octave].get([x, z])
    }

    /// Sum of all octaves of a family at world coordinates, normalised to roughly [-1, 1].
    pub fn fractal(&self, family: NoiseFamily, x: f64, z: f64) -> f64 {
        let mut frequency = family.base_frequency();
        let mut amplitude = 1.0;
        let mut total = 0.0;
        let mut norm = 0.0;
        for octave in 0..family.octaves() {
            total += amplitude * self.sample(family, octave, x * frequency, z * frequency);
            norm += amplitude;
            frequency *= LACUNARITY;
            amplitude *= PERSISTENCE;
        }
        total / norm
    }

    /// A 64-bit value that depends only on the seed, the column and `salt`.
    pub fn random(&self, x: i32, z: i32, salt: u64) -> u64 {
        let column = ((x as u32 as u64) << 32) | z as u32 as u64;
        mix(self.seed ^ mix(column ^ mix(salt)))
    }

    /// Deterministic coin flip with the given probability for one column.
    pub fn chance(&self, x: i32, z: i32, salt: u64, probability: f64) -> bool {
        fastrand::Rng::with_seed(self.random(x, z, salt)).f64() < probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_samples() {
        let a = NoiseField::new(42);
        let b = NoiseField::new(42);
        for family in NoiseFamily::ALL {
            assert_eq!(a.fractal(family, 123.5, -77.25), b.fractal(family, 123.5, -77.25));
        }
        assert_eq!(a.random(-3, 9, 1), b.random(-3, 9, 1));
    }

    #[test]
    fn families_are_independent() {
        let field = NoiseField::new(7);
        let x = 0.37;
        let z = 0.81;
        let pv = field.sample(NoiseFamily::PeaksAndValleys, 0, x, z);
        let smooth = field.sample(NoiseFamily::Smooth, 0, x, z);
        assert_ne!(pv, smooth);
    }

    #[test]
    fn chance_respects_extremes() {
        let field = NoiseField::new(1);
        assert!((0..64).all(|x| !field.chance(x, 0, 5, 0.0)));
        assert!((0..64).all(|x| field.chance(x, 0, 5, 1.0)));
    }
}
