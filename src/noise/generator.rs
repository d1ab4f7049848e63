//! # Primitive Noise Generators
//!
//! Deterministic coherent-noise primitives over 3D space. Everything in this
//! module is a pure function of its coordinates and seed: the same input
//! produces bit-identical output on every call, every thread, and every
//! process. This is the property the whole terrain pipeline leans on — chunks
//! are never persisted, they are re-derived from these functions on demand.
//!
//! Two families are provided:
//!
//! * **Gradient noise** hashes each lattice corner to a pseudo-random unit
//!   vector and takes the dot product with the corner-to-sample offset.
//!   It produces better-quality noise than value noise and is what the
//!   fractal combinators build on, although it costs more to calculate.
//! * **Value noise** hashes each lattice corner directly to a scalar.
//!   It is cheaper and drives the cellular (Voronoi) module's seed points.

use cgmath::{InnerSpace, Point3, Vector3};

/// Constants folded into the lattice hash, one prime per axis.
const X_NOISE_GEN: i32 = 1619;
const Y_NOISE_GEN: i32 = 31337;
const Z_NOISE_GEN: i32 = 6971;
const SEED_NOISE_GEN: i32 = 1013;
const SHIFT_NOISE_GEN: i32 = 8;

/// Quality setting for coherent-noise generation.
///
/// Selects the interpolation kernel applied per-axis before the eight
/// lattice-corner contributions are blended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum NoiseQuality {
    /// No smoothing. Fast, but the derivative is discontinuous at integer
    /// boundaries, which shows up as creasing artifacts.
    Fast,
    /// Cubic smoothstep (`3t² − 2t³`). The second derivative is still
    /// discontinuous at integer boundaries; minor creasing remains.
    #[default]
    Standard,
    /// Quintic smoothstep (`6t⁵ − 15t⁴ + 10t³`). First and second
    /// derivatives are continuous at integer boundaries; no creasing.
    Best,
}

/// Cubic s-curve: `3a² − 2a³`.
#[inline]
pub(crate) fn scurve3(a: f64) -> f64 {
    a * a * (3.0 - 2.0 * a)
}

/// Quintic s-curve: `6a⁵ − 15a⁴ + 10a³`.
#[inline]
pub(crate) fn scurve5(a: f64) -> f64 {
    let a3 = a * a * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    (6.0 * a5) - (15.0 * a4) + (10.0 * a3)
}

/// Linear interpolation between `n0` and `n1` by `a`.
#[inline]
pub(crate) fn linear_interp(n0: f64, n1: f64, a: f64) -> f64 {
    n0 + a * (n1 - n0)
}

/// Floor to `i32`, faster than `f64::floor` for lattice math.
#[inline]
pub(crate) fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < xi as f64 {
        xi - 1
    } else {
        xi
    }
}

const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Unit gradient directions, the twelve cube-edge midpoints with four
/// repeats. Indexed by the low bits of the lattice hash.
const GRADIENTS: [[f64; 3]; 16] = [
    [FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0],
    [-FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0],
    [FRAC_1_SQRT_2, -FRAC_1_SQRT_2, 0.0],
    [-FRAC_1_SQRT_2, -FRAC_1_SQRT_2, 0.0],
    [FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2],
    [-FRAC_1_SQRT_2, 0.0, FRAC_1_SQRT_2],
    [FRAC_1_SQRT_2, 0.0, -FRAC_1_SQRT_2],
    [-FRAC_1_SQRT_2, 0.0, -FRAC_1_SQRT_2],
    [0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2],
    [0.0, -FRAC_1_SQRT_2, FRAC_1_SQRT_2],
    [0.0, FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
    [0.0, -FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
    [FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0],
    [-FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0],
    [0.0, -FRAC_1_SQRT_2, FRAC_1_SQRT_2],
    [0.0, -FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
];

/// Hashes an integer lattice position and seed into the gradient table.
#[inline]
fn gradient_index(ipos: Point3<i32>, seed: i32) -> usize {
    let mut n = X_NOISE_GEN
        .wrapping_mul(ipos.x)
        .wrapping_add(Y_NOISE_GEN.wrapping_mul(ipos.y))
        .wrapping_add(Z_NOISE_GEN.wrapping_mul(ipos.z))
        .wrapping_add(SEED_NOISE_GEN.wrapping_mul(seed));
    n ^= n >> SHIFT_NOISE_GEN;
    (n & 0xf) as usize
}

/// Generates a gradient-noise value from a three-dimensional input value and
/// the integer coordinates of a nearby lattice point.
///
/// The difference between `fpos` and `ipos` must be less than or equal to one
/// on every axis. The corner is hashed to a pseudo-random normalized vector,
/// which is dotted with the corner-to-sample offset. The return value ranges
/// from -1.0 to +1.0.
pub fn gradient_noise_3d(fpos: Point3<f64>, ipos: Point3<i32>, seed: i32) -> f64 {
    let g = GRADIENTS[gradient_index(ipos, seed)];
    let vgrad = Vector3::new(g[0], g[1], g[2]);
    let vpoint = fpos - Point3::new(ipos.x as f64, ipos.y as f64, ipos.z as f64);

    vgrad.dot(vpoint) * 2.12
}

/// Generates a gradient-coherent-noise value from the coordinates of a
/// three-dimensional input value.
///
/// The eight surrounding lattice corners each contribute a gradient-noise
/// value; the contributions are blended trilinearly after each axis fraction
/// passes through the quality's interpolation kernel. The return value is
/// clamped to [-1.0, +1.0], so the documented range is a hard guarantee.
pub fn gradient_coherent_noise_3d(pos: Point3<f64>, seed: i32, quality: NoiseQuality) -> f64 {
    let pos0 = Point3::new(fast_floor(pos.x), fast_floor(pos.y), fast_floor(pos.z));
    let pos1 = Point3::new(pos0.x + 1, pos0.y + 1, pos0.z + 1);

    let diff = Vector3::new(
        pos.x - pos0.x as f64,
        pos.y - pos0.y as f64,
        pos.z - pos0.z as f64,
    );
    let (sx, sy, sz) = match quality {
        NoiseQuality::Fast => (diff.x, diff.y, diff.z),
        NoiseQuality::Standard => (scurve3(diff.x), scurve3(diff.y), scurve3(diff.z)),
        NoiseQuality::Best => (scurve5(diff.x), scurve5(diff.y), scurve5(diff.z)),
    };

    let mut ix0 = linear_interp(
        gradient_noise_3d(pos, Point3::new(pos0.x, pos0.y, pos0.z), seed),
        gradient_noise_3d(pos, Point3::new(pos1.x, pos0.y, pos0.z), seed),
        sx,
    );
    let mut ix1 = linear_interp(
        gradient_noise_3d(pos, Point3::new(pos0.x, pos1.y, pos0.z), seed),
        gradient_noise_3d(pos, Point3::new(pos1.x, pos1.y, pos0.z), seed),
        sx,
    );
    let iy0 = linear_interp(ix0, ix1, sy);
    ix0 = linear_interp(
        gradient_noise_3d(pos, Point3::new(pos0.x, pos0.y, pos1.z), seed),
        gradient_noise_3d(pos, Point3::new(pos1.x, pos0.y, pos1.z), seed),
        sx,
    );
    ix1 = linear_interp(
        gradient_noise_3d(pos, Point3::new(pos0.x, pos1.y, pos1.z), seed),
        gradient_noise_3d(pos, Point3::new(pos1.x, pos1.y, pos1.z), seed),
        sx,
    );
    let iy1 = linear_interp(ix0, ix1, sy);

    linear_interp(iy0, iy1, sz).clamp(-1.0, 1.0)
}

/// Generates a value-coherent-noise value from the coordinates of a
/// three-dimensional input value.
///
/// The return value ranges from -1.0 to +1.0. Cheaper than
/// [`gradient_coherent_noise_3d`] but lower quality.
pub fn value_coherent_noise_3d(pos: Point3<f64>, seed: i32, quality: NoiseQuality) -> f64 {
    let pos0 = Point3::new(fast_floor(pos.x), fast_floor(pos.y), fast_floor(pos.z));
    let pos1 = Point3::new(pos0.x + 1, pos0.y + 1, pos0.z + 1);

    let diff = Vector3::new(
        pos.x - pos0.x as f64,
        pos.y - pos0.y as f64,
        pos.z - pos0.z as f64,
    );
    let (sx, sy, sz) = match quality {
        NoiseQuality::Fast => (diff.x, diff.y, diff.z),
        NoiseQuality::Standard => (scurve3(diff.x), scurve3(diff.y), scurve3(diff.z)),
        NoiseQuality::Best => (scurve5(diff.x), scurve5(diff.y), scurve5(diff.z)),
    };

    let mut ix0 = linear_interp(
        value_noise_3d(Point3::new(pos0.x, pos0.y, pos0.z), seed),
        value_noise_3d(Point3::new(pos1.x, pos0.y, pos0.z), seed),
        sx,
    );
    let mut ix1 = linear_interp(
        value_noise_3d(Point3::new(pos0.x, pos1.y, pos0.z), seed),
        value_noise_3d(Point3::new(pos1.x, pos1.y, pos0.z), seed),
        sx,
    );
    let iy0 = linear_interp(ix0, ix1, sy);
    ix0 = linear_interp(
        value_noise_3d(Point3::new(pos0.x, pos0.y, pos1.z), seed),
        value_noise_3d(Point3::new(pos1.x, pos0.y, pos1.z), seed),
        sx,
    );
    ix1 = linear_interp(
        value_noise_3d(Point3::new(pos0.x, pos1.y, pos1.z), seed),
        value_noise_3d(Point3::new(pos1.x, pos1.y, pos1.z), seed),
        sx,
    );
    let iy1 = linear_interp(ix0, ix1, sy);

    linear_interp(iy0, iy1, sz)
}

/// Generates a value-noise value from integer lattice coordinates.
///
/// The return value ranges from -1.0 to +1.0.
pub fn value_noise_3d(ipos: Point3<i32>, seed: i32) -> f64 {
    1.0 - (int_value_noise_3d(ipos, seed) as f64 / 1_073_741_824.0)
}

/// Generates an integer-noise value from integer lattice coordinates.
///
/// The return value ranges from 0 to 2147483647. A noise function differs
/// from a random-number generator because it always returns the same output
/// value for the same input value.
pub fn int_value_noise_3d(ipos: Point3<i32>, seed: i32) -> i32 {
    let mut n = X_NOISE_GEN
        .wrapping_mul(ipos.x)
        .wrapping_add(Y_NOISE_GEN.wrapping_mul(ipos.y))
        .wrapping_add(Z_NOISE_GEN.wrapping_mul(ipos.z))
        .wrapping_add(SEED_NOISE_GEN.wrapping_mul(seed))
        & 0x7fffffff;
    n = (n >> 13) ^ n;
    n.wrapping_mul(n.wrapping_mul(n).wrapping_mul(60493).wrapping_add(19_990_303))
        .wrapping_add(1_376_312_589)
        & 0x7fffffff
}

/// Skewing factor for the 3D simplex grid.
const F3: f64 = 1.0 / 3.0;
/// Unskewing factor for the 3D simplex grid.
const G3: f64 = 1.0 / 6.0;

/// Generates a simplex-noise value from the coordinates of a
/// three-dimensional input value.
///
/// Samples the four corners of the containing simplex instead of the eight
/// corners of a cube, which avoids the axis-aligned artifacts of lattice
/// noise. The return value is clamped to [-1.0, +1.0].
pub fn simplex_noise_3d(pos: Point3<f64>, seed: i32) -> f64 {
    // Skew the input to determine the containing simplex cell.
    let skew = (pos.x + pos.y + pos.z) * F3;
    let i = fast_floor(pos.x + skew);
    let j = fast_floor(pos.y + skew);
    let k = fast_floor(pos.z + skew);

    let unskew = (i + j + k) as f64 * G3;
    let x0 = pos.x - (i as f64 - unskew);
    let y0 = pos.y - (j as f64 - unskew);
    let z0 = pos.z - (k as f64 - unskew);

    // Rank the offsets to pick which of the six tetrahedra we are in.
    let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
        if y0 >= z0 {
            (1, 0, 0, 1, 1, 0)
        } else if x0 >= z0 {
            (1, 0, 0, 1, 0, 1)
        } else {
            (0, 0, 1, 1, 0, 1)
        }
    } else if y0 < z0 {
        (0, 0, 1, 0, 1, 1)
    } else if x0 < z0 {
        (0, 1, 0, 0, 1, 1)
    } else {
        (0, 1, 0, 1, 1, 0)
    };

    let x1 = x0 - i1 as f64 + G3;
    let y1 = y0 - j1 as f64 + G3;
    let z1 = z0 - k1 as f64 + G3;
    let x2 = x0 - i2 as f64 + 2.0 * G3;
    let y2 = y0 - j2 as f64 + 2.0 * G3;
    let z2 = z0 - k2 as f64 + 2.0 * G3;
    let x3 = x0 - 1.0 + 3.0 * G3;
    let y3 = y0 - 1.0 + 3.0 * G3;
    let z3 = z0 - 1.0 + 3.0 * G3;

    let mut total = 0.0;
    let corners = [
        (x0, y0, z0, Point3::new(i, j, k)),
        (x1, y1, z1, Point3::new(i + i1, j + j1, k + k1)),
        (x2, y2, z2, Point3::new(i + i2, j + j2, k + k2)),
        (x3, y3, z3, Point3::new(i + 1, j + 1, k + 1)),
    ];
    for (x, y, z, corner) in corners {
        let t = 0.6 - x * x - y * y - z * z;
        if t > 0.0 {
            let g = GRADIENTS[gradient_index(corner, seed)];
            let t2 = t * t;
            total += t2 * t2 * (g[0] * x + g[1] * y + g[2] * z);
        }
    }

    (32.0 * total).clamp(-1.0, 1.0)
}
