//! Fractal combinators: octave sums of the coherent-noise primitives.

use cgmath::Point3;

use crate::noise::generator::{
    gradient_coherent_noise_3d, simplex_noise_3d, NoiseQuality,
};

use super::{Module, NoiseSource, MAX_OCTAVE_COUNT};

/// Default frequency for the fractal modules.
pub const FRACTAL_DEFAULT_FREQUENCY: f64 = 1.0;
/// Default lacunarity (per-octave frequency multiplier).
pub const FRACTAL_DEFAULT_LACUNARITY: f64 = 2.0;
/// Default number of octaves.
pub const FRACTAL_DEFAULT_OCTAVE_COUNT: u32 = 6;
/// Default persistence (per-octave amplitude multiplier).
pub const FRACTAL_DEFAULT_PERSISTENCE: f64 = 0.5;

/// Parameters for the persistence-weighted fractals: [`perlin`], [`billow`],
/// and [`simplex`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FractalParams {
    /// Frequency of the first octave.
    pub frequency: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Number of octaves summed. Must be in `1..=MAX_OCTAVE_COUNT`.
    pub octave_count: u32,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Interpolation quality of the underlying coherent noise.
    pub quality: NoiseQuality,
    /// Seed; octave `n` samples with `seed + n`.
    pub seed: i32,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            frequency: FRACTAL_DEFAULT_FREQUENCY,
            lacunarity: FRACTAL_DEFAULT_LACUNARITY,
            octave_count: FRACTAL_DEFAULT_OCTAVE_COUNT,
            persistence: FRACTAL_DEFAULT_PERSISTENCE,
            quality: NoiseQuality::default(),
            seed: 0,
        }
    }
}

/// Parameters for [`ridged_multi`], which weights octaves spectrally instead
/// of by persistence.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RidgedParams {
    /// Frequency of the first octave.
    pub frequency: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Number of octaves summed. Must be in `1..=MAX_OCTAVE_COUNT`.
    pub octave_count: u32,
    /// Interpolation quality of the underlying coherent noise.
    pub quality: NoiseQuality,
    /// Seed; octave `n` samples with `seed + n`.
    pub seed: i32,
}

impl Default for RidgedParams {
    fn default() -> Self {
        Self {
            frequency: FRACTAL_DEFAULT_FREQUENCY,
            lacunarity: FRACTAL_DEFAULT_LACUNARITY,
            octave_count: FRACTAL_DEFAULT_OCTAVE_COUNT,
            quality: NoiseQuality::default(),
            seed: 0,
        }
    }
}

fn assert_octave_count(octave_count: u32) {
    assert!(
        (1..=MAX_OCTAVE_COUNT).contains(&octave_count),
        "octave count {octave_count} outside 1..={MAX_OCTAVE_COUNT}"
    );
}

struct Perlin {
    params: FractalParams,
}

impl NoiseSource for Perlin {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let mut value = 0.0;
        let mut current_persistence = 1.0;
        let mut pos = pos * self.params.frequency;

        for octave in 0..self.params.octave_count {
            let octave_seed = self.params.seed.wrapping_add(octave as i32);
            let signal = gradient_coherent_noise_3d(pos, octave_seed, self.params.quality);
            value += signal * current_persistence;

            pos = pos * self.params.lacunarity;
            current_persistence *= self.params.persistence;
        }

        value
    }
}

/// Outputs three-dimensional Perlin noise: a persistence-weighted sum of
/// gradient-coherent octaves.
///
/// # Panics
/// Panics if the octave count is outside `1..=MAX_OCTAVE_COUNT`.
pub fn perlin(params: FractalParams) -> Module {
    assert_octave_count(params.octave_count);
    Module::new(Perlin { params })
}

struct Billow {
    params: FractalParams,
}

impl NoiseSource for Billow {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let mut value = 0.0;
        let mut current_persistence = 1.0;
        let mut pos = pos * self.params.frequency;

        for octave in 0..self.params.octave_count {
            let octave_seed = self.params.seed.wrapping_add(octave as i32);
            let signal = gradient_coherent_noise_3d(pos, octave_seed, self.params.quality);
            // Folding the signal produces the billowy, cloud-like lobes.
            let signal = 2.0 * signal.abs() - 1.0;
            value += signal * current_persistence;

            pos = pos * self.params.lacunarity;
            current_persistence *= self.params.persistence;
        }

        value + 0.5
    }
}

/// Outputs "billowy" noise suitable for clouds and rounded rock formations.
///
/// # Panics
/// Panics if the octave count is outside `1..=MAX_OCTAVE_COUNT`.
pub fn billow(params: FractalParams) -> Module {
    assert_octave_count(params.octave_count);
    Module::new(Billow { params })
}

struct RidgedMulti {
    params: RidgedParams,
    /// Per-octave weights, `frequencyⁿ^(-1)`, precomputed at construction.
    spectral_weights: Vec<f64>,
}

impl RidgedMulti {
    /// Exponent of the spectral weight falloff.
    const H: f64 = 1.0;
    /// Offset applied to each octave's folded signal.
    const OFFSET: f64 = 1.0;
    /// Feedback gain carried from one octave into the next.
    const GAIN: f64 = 2.0;

    fn new(params: RidgedParams) -> Self {
        let mut spectral_weights = Vec::with_capacity(params.octave_count as usize);
        let mut frequency: f64 = 1.0;
        for _ in 0..params.octave_count {
            spectral_weights.push(frequency.powf(-Self::H));
            frequency *= params.lacunarity;
        }
        Self {
            params,
            spectral_weights,
        }
    }
}

impl NoiseSource for RidgedMulti {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let mut value = 0.0;
        let mut weight = 1.0;
        let mut pos = pos * self.params.frequency;

        for octave in 0..self.params.octave_count {
            let octave_seed = self.params.seed.wrapping_add(octave as i32) & 0x7fffffff;
            let signal = gradient_coherent_noise_3d(pos, octave_seed, self.params.quality);

            // Fold into a ridge, square to sharpen, and self-weight so
            // successive octaves only roughen the ridge lines.
            let mut signal = Self::OFFSET - signal.abs();
            signal *= signal;
            signal *= weight;

            weight = (signal * Self::GAIN).clamp(0.0, 1.0);

            value += signal * self.spectral_weights[octave as usize];
            pos = pos * self.params.lacunarity;
        }

        (value * 1.25) - 1.0
    }
}

/// Outputs three-dimensional ridged-multifractal noise, the classic
/// sharp-crested mountain field.
///
/// # Panics
/// Panics if the octave count is outside `1..=MAX_OCTAVE_COUNT`.
pub fn ridged_multi(params: RidgedParams) -> Module {
    assert_octave_count(params.octave_count);
    Module::new(RidgedMulti::new(params))
}

struct Simplex {
    params: FractalParams,
}

impl NoiseSource for Simplex {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let mut value = 0.0;
        let mut current_persistence = 1.0;
        let mut pos = pos * self.params.frequency;

        for octave in 0..self.params.octave_count {
            let octave_seed = self.params.seed.wrapping_add(octave as i32);
            let signal = simplex_noise_3d(pos, octave_seed);
            value += signal * current_persistence;

            pos = pos * self.params.lacunarity;
            current_persistence *= self.params.persistence;
        }

        value
    }
}

/// Outputs a fractal sum of three-dimensional simplex noise.
///
/// The simplex kernel has no quality variants; the `quality` field of the
/// parameters is ignored.
///
/// # Panics
/// Panics if the octave count is outside `1..=MAX_OCTAVE_COUNT`.
pub fn simplex(params: FractalParams) -> Module {
    assert_octave_count(params.octave_count);
    Module::new(Simplex { params })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn probe_points() -> Vec<Point3<f64>> {
        (0..200)
            .map(|i| {
                let t = i as f64;
                Point3::new(t * 0.37 - 40.0, t * 0.61 - 55.0, t * 0.23 - 20.0)
            })
            .collect()
    }

    #[test]
    fn fractals_are_deterministic() {
        let modules = [
            perlin(FractalParams::default()),
            billow(FractalParams::default()),
            ridged_multi(RidgedParams::default()),
            simplex(FractalParams::default()),
        ];
        for m in &modules {
            for &p in &probe_points() {
                assert_eq!(m.sample(p).to_bits(), m.sample(p).to_bits());
            }
        }
    }

    #[test]
    fn shared_module_is_deterministic_across_threads() {
        let m = ridged_multi(RidgedParams::default());
        let points = probe_points();
        let expected: Vec<f64> = points.iter().map(|&p| m.sample(p)).collect();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = m.clone();
                let points = points.clone();
                thread::spawn(move || points.iter().map(|&p| m.sample(p)).collect::<Vec<f64>>())
            })
            .collect();

        for handle in handles {
            for (got, want) in handle.join().unwrap().iter().zip(expected.iter()) {
                assert_eq!(got.to_bits(), want.to_bits());
            }
        }
    }

    #[test]
    fn seeds_shift_the_field() {
        let a = perlin(FractalParams { seed: 0, ..Default::default() });
        let b = perlin(FractalParams { seed: 1, ..Default::default() });
        let p = Point3::new(1.7, 2.9, -3.1);
        assert_ne!(a.sample(p), b.sample(p));
    }

    #[test]
    #[should_panic]
    fn zero_octaves_is_a_contract_violation() {
        let _ = perlin(FractalParams {
            octave_count: 0,
            ..Default::default()
        });
    }

    #[test]
    #[should_panic]
    fn octave_cap_is_enforced() {
        let _ = ridged_multi(RidgedParams {
            octave_count: MAX_OCTAVE_COUNT + 1,
            ..Default::default()
        });
    }
}
