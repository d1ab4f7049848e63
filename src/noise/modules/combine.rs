//! Value combinators: pointwise combination and remapping of child modules.

use std::sync::Mutex;

use cgmath::Point3;

use crate::noise::generator::{linear_interp, scurve3};

use super::{Module, NoiseSource};

/// Default lower bound for [`select`].
pub const SELECT_DEFAULT_LOWER_BOUND: f64 = -1.0;
/// Default upper bound for [`select`].
pub const SELECT_DEFAULT_UPPER_BOUND: f64 = 1.0;
/// Default edge falloff for [`select`].
pub const SELECT_DEFAULT_EDGE_FALLOFF: f64 = 0.0;

/// Default lower bound for [`clamp`].
pub const CLAMP_DEFAULT_LOWER_BOUND: f64 = -1.0;
/// Default upper bound for [`clamp`].
pub const CLAMP_DEFAULT_UPPER_BOUND: f64 = 1.0;

struct Abs {
    source: Module,
}

impl NoiseSource for Abs {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        self.source.sample(pos).abs()
    }
}

/// Outputs the absolute value of the source value.
pub fn abs(source: Module) -> Module {
    Module::new(Abs { source })
}

struct Add {
    source0: Module,
    source1: Module,
}

impl NoiseSource for Add {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        self.source0.sample(pos) + self.source1.sample(pos)
    }
}

/// Outputs the sum of the two source values.
pub fn add(source0: Module, source1: Module) -> Module {
    Module::new(Add { source0, source1 })
}

struct Multiply {
    source0: Module,
    source1: Module,
}

impl NoiseSource for Multiply {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        self.source0.sample(pos) * self.source1.sample(pos)
    }
}

/// Outputs the product of the two source values.
pub fn multiply(source0: Module, source1: Module) -> Module {
    Module::new(Multiply { source0, source1 })
}

struct Max {
    source0: Module,
    source1: Module,
}

impl NoiseSource for Max {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        self.source0.sample(pos).max(self.source1.sample(pos))
    }
}

/// Outputs the larger of the two source values.
pub fn max(source0: Module, source1: Module) -> Module {
    Module::new(Max { source0, source1 })
}

struct Min {
    source0: Module,
    source1: Module,
}

impl NoiseSource for Min {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        self.source0.sample(pos).min(self.source1.sample(pos))
    }
}

/// Outputs the smaller of the two source values.
pub fn min(source0: Module, source1: Module) -> Module {
    Module::new(Min { source0, source1 })
}

struct Power {
    source0: Module,
    source1: Module,
}

impl NoiseSource for Power {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        self.source0.sample(pos).powf(self.source1.sample(pos))
    }
}

/// Raises the first source value to the power of the second source value.
pub fn power(source0: Module, source1: Module) -> Module {
    Module::new(Power { source0, source1 })
}

struct Blend {
    source0: Module,
    source1: Module,
    control: Module,
}

impl NoiseSource for Blend {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        linear_interp(
            self.source0.sample(pos),
            self.source1.sample(pos),
            self.control.sample(pos),
        )
    }
}

/// Outputs a weighted blend of the two source values, with the weight
/// supplied by a control module. Control 0 yields the first source, control
/// 1 the second.
pub fn blend(source0: Module, source1: Module, control: Module) -> Module {
    Module::new(Blend {
        source0,
        source1,
        control,
    })
}

struct Clamp {
    source: Module,
    lower_bound: f64,
    upper_bound: f64,
}

impl NoiseSource for Clamp {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        self.source.sample(pos).clamp(self.lower_bound, self.upper_bound)
    }
}

/// Outputs the source value clamped into `[lower_bound, upper_bound]`.
///
/// # Panics
/// Panics if `lower_bound > upper_bound`.
pub fn clamp(source: Module, lower_bound: f64, upper_bound: f64) -> Module {
    assert!(
        lower_bound <= upper_bound,
        "clamp bounds are inverted: {lower_bound} > {upper_bound}"
    );
    Module::new(Clamp {
        source,
        lower_bound,
        upper_bound,
    })
}

struct ScaleBias {
    source: Module,
    scale: f64,
    bias: f64,
}

impl NoiseSource for ScaleBias {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        self.source.sample(pos) * self.scale + self.bias
    }
}

/// Applies a scaling factor and a bias to the source value.
pub fn scale_bias(source: Module, scale: f64, bias: f64) -> Module {
    Module::new(ScaleBias {
        source,
        scale,
        bias,
    })
}

struct Exponent {
    source: Module,
    exponent: f64,
}

impl NoiseSource for Exponent {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let value = self.source.sample(pos);
        // Remap from [-1, 1] to [0, 1], raise, and remap back.
        ((value + 1.0) / 2.0).abs().powf(self.exponent) * 2.0 - 1.0
    }
}

/// Maps the source value onto an exponential curve.
pub fn exponent(source: Module, exponent: f64) -> Module {
    Module::new(Exponent { source, exponent })
}

struct Invert {
    source: Module,
}

impl NoiseSource for Invert {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        -self.source.sample(pos)
    }
}

/// Negates the source value.
pub fn invert(source: Module) -> Module {
    Module::new(Invert { source })
}

/// Bounds for the [`select`] combinator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SelectBounds {
    /// Lower bound of the selection range.
    pub lower_bound: f64,
    /// Upper bound of the selection range.
    pub upper_bound: f64,
    /// Width of the smoothed transition band at each edge of the range.
    /// Zero disables blending entirely.
    pub edge_falloff: f64,
}

impl Default for SelectBounds {
    fn default() -> Self {
        Self {
            lower_bound: SELECT_DEFAULT_LOWER_BOUND,
            upper_bound: SELECT_DEFAULT_UPPER_BOUND,
            edge_falloff: SELECT_DEFAULT_EDGE_FALLOFF,
        }
    }
}

struct Select {
    source0: Module,
    source1: Module,
    control: Module,
    lower_bound: f64,
    upper_bound: f64,
    edge_falloff: f64,
}

impl NoiseSource for Select {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let control_value = self.control.sample(pos);

        if self.edge_falloff > 0.0 {
            if control_value < self.lower_bound - self.edge_falloff {
                return self.source0.sample(pos);
            }
            if control_value < self.lower_bound + self.edge_falloff {
                let lower_curve = self.lower_bound - self.edge_falloff;
                let upper_curve = self.lower_bound + self.edge_falloff;
                let alpha =
                    scurve3((control_value - lower_curve) / (upper_curve - lower_curve));
                return linear_interp(self.source0.sample(pos), self.source1.sample(pos), alpha);
            }
            if control_value < self.upper_bound - self.edge_falloff {
                return self.source1.sample(pos);
            }
            if control_value < self.upper_bound + self.edge_falloff {
                let lower_curve = self.upper_bound - self.edge_falloff;
                let upper_curve = self.upper_bound + self.edge_falloff;
                let alpha =
                    scurve3((control_value - lower_curve) / (upper_curve - lower_curve));
                return linear_interp(self.source1.sample(pos), self.source0.sample(pos), alpha);
            }
            return self.source0.sample(pos);
        }

        if control_value < self.lower_bound || control_value > self.upper_bound {
            self.source0.sample(pos)
        } else {
            self.source1.sample(pos)
        }
    }
}

/// Outputs a value selected from one of two sources, chosen by a control
/// module.
///
/// With zero edge falloff this is a pure threshold: the second source is
/// selected while the control value lies inside `[lower_bound, upper_bound]`
/// (inclusive), the first source otherwise. A positive falloff widens each
/// edge into a band where the two sources are blended with a cubic
/// smoothstep. Falloffs wider than half the range are narrowed to fit.
///
/// # Panics
/// Panics if `lower_bound >= upper_bound`.
pub fn select(source0: Module, source1: Module, control: Module, bounds: SelectBounds) -> Module {
    assert!(
        bounds.lower_bound < bounds.upper_bound,
        "select bounds are inverted: {} >= {}",
        bounds.lower_bound,
        bounds.upper_bound
    );
    let half_range = (bounds.upper_bound - bounds.lower_bound) / 2.0;
    Module::new(Select {
        source0,
        source1,
        control,
        lower_bound: bounds.lower_bound,
        upper_bound: bounds.upper_bound,
        edge_falloff: bounds.edge_falloff.min(half_range),
    })
}

struct Cache {
    source: Module,
    entry: Mutex<Option<(Point3<f64>, f64)>>,
}

impl NoiseSource for Cache {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let mut entry = self.entry.lock().unwrap();
        if let Some((cached_pos, cached_value)) = *entry {
            if cached_pos == pos {
                return cached_value;
            }
        }
        let value = self.source.sample(pos);
        *entry = Some((pos, value));
        value
    }
}

/// Caches the last value generated by the source.
///
/// The memo is a single last-input/last-output pair keyed by exact input
/// equality and owned by this combinator instance, so repeated sampling at
/// one position (the classifier probing several modules at the same voxel)
/// skips re-evaluating an expensive shared sub-graph. Sampling stays
/// deterministic; the cache only short-circuits identical inputs.
pub fn cache(source: Module) -> Module {
    Module::new(Cache {
        source,
        entry: Mutex::new(None),
    })
}

#[cfg(test)]
mod tests {
    use super::super::pattern::constant;
    use super::*;
    use cgmath::Point3;

    fn origin() -> Point3<f64> {
        Point3::new(0.0, 0.0, 0.0)
    }

    #[test]
    fn abs_of_constants() {
        assert_eq!(abs(constant(0.0)).sample(origin()), 0.0);
        assert_eq!(abs(constant(1.0)).sample(origin()), 1.0);
        assert_eq!(abs(constant(-1.0)).sample(origin()), 1.0);
    }

    #[test]
    fn add_constants() {
        let sum = add(constant(1.0), constant(4.0));
        assert_eq!(sum.sample(origin()), 5.0);
    }

    #[test]
    fn blend_follows_control() {
        assert_eq!(
            blend(constant(1.0), constant(2.0), constant(0.0)).sample(origin()),
            1.0
        );
        assert_eq!(
            blend(constant(1.0), constant(2.0), constant(1.0)).sample(origin()),
            2.0
        );
        assert_eq!(
            blend(constant(1.0), constant(2.0), constant(0.5)).sample(origin()),
            1.5
        );
    }

    #[test]
    fn min_max_power_multiply() {
        assert_eq!(min(constant(1.0), constant(4.0)).sample(origin()), 1.0);
        assert_eq!(max(constant(1.0), constant(4.0)).sample(origin()), 4.0);
        assert_eq!(multiply(constant(3.0), constant(4.0)).sample(origin()), 12.0);
        assert_eq!(power(constant(2.0), constant(3.0)).sample(origin()), 8.0);
    }

    #[test]
    fn clamp_limits_output() {
        let clamped = clamp(constant(2.5), -1.0, 1.0);
        assert_eq!(clamped.sample(origin()), 1.0);
        let clamped = clamp(constant(-2.5), -1.0, 1.0);
        assert_eq!(clamped.sample(origin()), -1.0);
        let passthrough = clamp(constant(0.25), -1.0, 1.0);
        assert_eq!(passthrough.sample(origin()), 0.25);
    }

    #[test]
    #[should_panic]
    fn clamp_rejects_inverted_bounds() {
        let _ = clamp(constant(0.0), 1.0, -1.0);
    }

    #[test]
    fn scale_bias_and_invert() {
        assert_eq!(scale_bias(constant(2.0), 3.0, 1.0).sample(origin()), 7.0);
        assert_eq!(invert(constant(0.5)).sample(origin()), -0.5);
    }

    #[test]
    fn exponent_identity_at_one() {
        // exponent 1.0 leaves values in [-1, 1] unchanged.
        for v in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            let m = exponent(constant(v), 1.0);
            assert!((m.sample(origin()) - v).abs() < 1e-12);
        }
    }

    #[test]
    fn select_with_zero_falloff_is_pure_threshold() {
        for (control, expected) in [(-2.0, 10.0), (-1.0, 20.0), (0.0, 20.0), (1.0, 20.0), (2.0, 10.0)] {
            let m = select(
                constant(10.0),
                constant(20.0),
                constant(control),
                SelectBounds {
                    lower_bound: -1.0,
                    upper_bound: 1.0,
                    edge_falloff: 0.0,
                },
            );
            assert_eq!(m.sample(origin()), expected, "control = {control}");
        }
    }

    #[test]
    fn select_falloff_blends_inside_band() {
        // Control sits exactly on the lower bound, the middle of the falloff
        // band, so the output is the midpoint of the two sources.
        let m = select(
            constant(0.0),
            constant(1.0),
            constant(-1.0),
            SelectBounds {
                lower_bound: -1.0,
                upper_bound: 1.0,
                edge_falloff: 0.25,
            },
        );
        assert!((m.sample(origin()) - 0.5).abs() < 1e-12);

        // Well inside the plateau the falloff is irrelevant.
        let m = select(
            constant(0.0),
            constant(1.0),
            constant(0.0),
            SelectBounds {
                lower_bound: -1.0,
                upper_bound: 1.0,
                edge_falloff: 0.25,
            },
        );
        assert_eq!(m.sample(origin()), 1.0);
    }

    #[test]
    fn cache_returns_source_values() {
        use crate::noise::modules::fractal::{perlin, FractalParams};

        let source = perlin(FractalParams::default());
        let cached = cache(source.clone());

        let p0 = Point3::new(1.25, -2.5, 3.75);
        let p1 = Point3::new(-4.0, 0.5, 9.25);

        assert_eq!(cached.sample(p0), source.sample(p0));
        // Repeated sample hits the memo and must agree exactly.
        assert_eq!(cached.sample(p0), source.sample(p0));
        // A new position invalidates the memo.
        assert_eq!(cached.sample(p1), source.sample(p1));
        assert_eq!(cached.sample(p0), source.sample(p0));
    }
}
