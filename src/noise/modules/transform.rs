//! Domain-transform combinators: modify the input coordinate before
//! delegating to a child module.

use cgmath::{Deg, EuclideanSpace, Matrix3, Point3, Vector3};

use super::fractal::{perlin, FractalParams};
use super::{Module, NoiseSource};

/// Default frequency for [`turbulence`].
pub const TURBULENCE_DEFAULT_FREQUENCY: f64 = 1.0;
/// Default displacement power for [`turbulence`].
pub const TURBULENCE_DEFAULT_POWER: f64 = 1.0;
/// Default roughness (octave count of the distortion fields) for
/// [`turbulence`].
pub const TURBULENCE_DEFAULT_ROUGHNESS: u32 = 3;

struct ScalePoint {
    source: Module,
    factor: Vector3<f64>,
}

impl NoiseSource for ScalePoint {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        self.source.sample(Point3::new(
            pos.x * self.factor.x,
            pos.y * self.factor.y,
            pos.z * self.factor.z,
        ))
    }
}

/// Scales the coordinates of the input value before sampling the source.
pub fn scale_point(source: Module, factor: Vector3<f64>) -> Module {
    Module::new(ScalePoint { source, factor })
}

struct TranslatePoint {
    source: Module,
    translation: Vector3<f64>,
}

impl NoiseSource for TranslatePoint {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        self.source.sample(pos + self.translation)
    }
}

/// Moves the coordinates of the input value before sampling the source.
pub fn translate_point(source: Module, translation: Vector3<f64>) -> Module {
    Module::new(TranslatePoint {
        source,
        translation,
    })
}

struct Rotate {
    source: Module,
    matrix: Matrix3<f64>,
}

impl NoiseSource for Rotate {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        self.source.sample(Point3::from_vec(self.matrix * pos.to_vec()))
    }
}

/// Rotates the input value around the origin before sampling the source.
///
/// Angles are degrees per axis; the rotation applies z, then x, then y. The
/// matrix is built once at construction.
pub fn rotate(source: Module, degrees: Vector3<f64>) -> Module {
    let matrix = Matrix3::from_angle_y(Deg(degrees.y))
        * Matrix3::from_angle_x(Deg(degrees.x))
        * Matrix3::from_angle_z(Deg(degrees.z));
    Module::new(Rotate { source, matrix })
}

struct Displace {
    source: Module,
    xdisplace: Module,
    ydisplace: Module,
    zdisplace: Module,
}

impl NoiseSource for Displace {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let offset = Vector3::new(
            self.xdisplace.sample(pos),
            self.ydisplace.sample(pos),
            self.zdisplace.sample(pos),
        );
        self.source.sample(pos + offset)
    }
}

/// Uses three source modules to displace each coordinate of the input value
/// before sampling the source.
pub fn displace(
    source: Module,
    xdisplace: Module,
    ydisplace: Module,
    zdisplace: Module,
) -> Module {
    Module::new(Displace {
        source,
        xdisplace,
        ydisplace,
        zdisplace,
    })
}

/// Parameters for [`turbulence`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TurbulenceParams {
    /// Frequency of the three distortion fields.
    pub frequency: f64,
    /// Scale applied to each axis displacement.
    pub power: f64,
    /// Octave count of the distortion fields.
    pub roughness: u32,
    /// Base seed; the three axis fields use `seed`, `seed + 1`, `seed + 2`.
    pub seed: i32,
}

impl Default for TurbulenceParams {
    fn default() -> Self {
        Self {
            frequency: TURBULENCE_DEFAULT_FREQUENCY,
            power: TURBULENCE_DEFAULT_POWER,
            roughness: TURBULENCE_DEFAULT_ROUGHNESS,
            seed: 0,
        }
    }
}

struct Turbulence {
    source: Module,
    power: f64,
    xdistort: Module,
    ydistort: Module,
    zdistort: Module,
}

impl NoiseSource for Turbulence {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        // Each axis samples its distortion field at a fixed fractional offset
        // so the three displacement channels do not share zero-crossings at
        // integer lattice boundaries.
        let p0 = Point3::new(
            pos.x + (12414.0 / 65536.0),
            pos.y + (65124.0 / 65536.0),
            pos.z + (31337.0 / 65536.0),
        );
        let p1 = Point3::new(
            pos.x + (26519.0 / 65536.0),
            pos.y + (18128.0 / 65536.0),
            pos.z + (60493.0 / 65536.0),
        );
        let p2 = Point3::new(
            pos.x + (53820.0 / 65536.0),
            pos.y + (11213.0 / 65536.0),
            pos.z + (44845.0 / 65536.0),
        );

        let distorted = pos
            + Vector3::new(
                self.xdistort.sample(p0) * self.power,
                self.ydistort.sample(p1) * self.power,
                self.zdistort.sample(p2) * self.power,
            );
        self.source.sample(distorted)
    }
}

/// Randomly displaces the input value before sampling the source.
///
/// The displacement comes from three independent Perlin fields, one per
/// axis, seeded `seed`, `seed + 1`, and `seed + 2`.
///
/// # Panics
/// Panics if `roughness` is outside the fractal octave bounds.
pub fn turbulence(source: Module, params: TurbulenceParams) -> Module {
    let distort = |seed: i32| {
        perlin(FractalParams {
            frequency: params.frequency,
            octave_count: params.roughness,
            seed,
            ..Default::default()
        })
    };
    Module::new(Turbulence {
        source,
        power: params.power,
        xdistort: distort(params.seed),
        ydistort: distort(params.seed.wrapping_add(1)),
        zdistort: distort(params.seed.wrapping_add(2)),
    })
}
