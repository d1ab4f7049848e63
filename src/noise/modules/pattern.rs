//! Generator modules that produce fixed patterns rather than coherent noise.
//!
//! Mostly useful as control inputs, test scaffolding, and debug terrains.

use cgmath::Point3;

use crate::noise::generator::{fast_floor, value_noise_3d};

use super::{Module, NoiseSource};

/// Default value for [`constant`].
pub const CONSTANT_DEFAULT_VALUE: f64 = 0.0;
/// Default frequency for [`cylinders`].
pub const CYLINDERS_DEFAULT_FREQUENCY: f64 = 1.0;
/// Default frequency for [`spheres`].
pub const SPHERES_DEFAULT_FREQUENCY: f64 = 1.0;
/// Default lattice scale for [`white`].
pub const WHITE_DEFAULT_SCALE: u32 = 256;

struct Constant {
    value: f64,
}

impl NoiseSource for Constant {
    fn sample(&self, _pos: Point3<f64>) -> f64 {
        self.value
    }
}

/// Outputs a constant value everywhere.
pub fn constant(value: f64) -> Module {
    Module::new(Constant { value })
}

struct Checkerboard;

impl NoiseSource for Checkerboard {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let ix = fast_floor(pos.x) & 1;
        let iy = fast_floor(pos.y) & 1;
        let iz = fast_floor(pos.z) & 1;
        if (ix ^ iy ^ iz) != 0 {
            -1.0
        } else {
            1.0
        }
    }
}

/// Outputs a unit-cell checkerboard pattern of -1.0 and +1.0.
pub fn checkerboard() -> Module {
    Module::new(Checkerboard)
}

struct Cylinders {
    frequency: f64,
}

impl NoiseSource for Cylinders {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let x = pos.x * self.frequency;
        let z = pos.z * self.frequency;

        let dist_from_center = (x * x + z * z).sqrt();
        let dist_from_smaller_sphere = dist_from_center - dist_from_center.floor();
        let dist_from_larger_sphere = 1.0 - dist_from_smaller_sphere;
        let nearest_dist = dist_from_smaller_sphere.min(dist_from_larger_sphere);

        // Map to [-1, 1]: 1.0 on a shell, -1.0 halfway between shells.
        1.0 - (nearest_dist * 4.0)
    }
}

/// Outputs concentric cylinders around the y axis.
pub fn cylinders(frequency: f64) -> Module {
    Module::new(Cylinders { frequency })
}

struct Spheres {
    frequency: f64,
}

impl NoiseSource for Spheres {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let x = pos.x * self.frequency;
        let y = pos.y * self.frequency;
        let z = pos.z * self.frequency;

        let dist_from_center = (x * x + y * y + z * z).sqrt();
        let dist_from_smaller_sphere = dist_from_center - dist_from_center.floor();
        let dist_from_larger_sphere = 1.0 - dist_from_smaller_sphere;
        let nearest_dist = dist_from_smaller_sphere.min(dist_from_larger_sphere);

        1.0 - (nearest_dist * 4.0)
    }
}

/// Outputs concentric spheres around the origin.
pub fn spheres(frequency: f64) -> Module {
    Module::new(Spheres { frequency })
}

struct White {
    scale: f64,
    seed: i32,
}

impl NoiseSource for White {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let ipos = Point3::new(
            fast_floor(pos.x * self.scale),
            fast_floor(pos.y * self.scale),
            fast_floor(pos.z * self.scale),
        );
        value_noise_3d(ipos, self.seed)
    }
}

/// Outputs white noise: an uncorrelated value per lattice cell, with the
/// lattice refined by `scale` cells per world unit.
pub fn white(scale: u32, seed: i32) -> Module {
    assert!(scale > 0, "white noise scale must be non-zero");
    Module::new(White {
        scale: f64::from(scale),
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_ignores_position() {
        let default_constant = constant(CONSTANT_DEFAULT_VALUE);
        let one = constant(1.0);

        assert_eq!(default_constant.sample(Point3::new(0.0, 0.0, 0.0)), 0.0);
        assert_eq!(default_constant.sample(Point3::new(1.0, 10.0, 100.0)), 0.0);
        assert_eq!(one.sample(Point3::new(0.0, 0.0, 0.0)), 1.0);
        assert_eq!(one.sample(Point3::new(1.0, 10.0, 100.0)), 1.0);
    }

    #[test]
    fn checkerboard_alternates() {
        let board = checkerboard();
        assert_eq!(board.sample(Point3::new(0.5, 0.5, 0.5)), 1.0);
        assert_eq!(board.sample(Point3::new(1.5, 0.5, 0.5)), -1.0);
        assert_eq!(board.sample(Point3::new(1.5, 1.5, 0.5)), 1.0);
        assert_eq!(board.sample(Point3::new(1.5, 1.5, 1.5)), -1.0);
    }

    #[test]
    fn spheres_peak_on_shells() {
        let m = spheres(1.0);
        // On the unit shell the distance to the nearest shell is zero.
        assert!((m.sample(Point3::new(1.0, 0.0, 0.0)) - 1.0).abs() < 1e-12);
        // Halfway between shells is the trough.
        assert!((m.sample(Point3::new(1.5, 0.0, 0.0)) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn white_is_deterministic_but_rough() {
        let m = white(WHITE_DEFAULT_SCALE, 0);
        let p = Point3::new(0.123, 0.456, 0.789);
        assert_eq!(m.sample(p), m.sample(p));

        let q = Point3::new(0.127, 0.456, 0.789);
        assert_ne!(m.sample(p), m.sample(q));
    }
}
