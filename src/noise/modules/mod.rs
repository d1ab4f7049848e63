//! # Noise Modules
//!
//! The combinator library. A [`Module`] wraps a deterministic scalar field
//! `(x, y, z) → f64`, closed over its construction-time parameters. Factory
//! functions build modules from primitives and from other modules:
//!
//! ```
//! use voxelstream::noise::modules::{self, FractalParams};
//! use cgmath::Point3;
//!
//! let base = modules::perlin(FractalParams::default());
//! let detail = modules::billow(FractalParams { seed: 7, ..Default::default() });
//! let terrain = modules::add(base, modules::scale_bias(detail, 0.25, 0.0));
//!
//! let density = terrain.sample(Point3::new(1.5, -3.0, 0.25));
//! ```
//!
//! Composition is by value: a factory takes its child [`Module`]s by move,
//! and cloning a `Module` clones a cheap shared handle. Several combinators
//! may therefore share one child (the graph is a DAG, never a cycle).
//!
//! Parameter validation is strict. Octave counts outside `1..=MAX_OCTAVE_COUNT`,
//! malformed control-point tables, and inverted clamp bounds are caller bugs
//! and panic at construction rather than producing silently wrong terrain.

pub mod cell;
pub mod combine;
pub mod curve;
pub mod fractal;
pub mod pattern;
pub mod transform;

use std::sync::Arc;

use cgmath::Point3;

pub use cell::{cell, CellDistance, CellParams};
pub use combine::{
    abs, add, blend, cache, clamp, exponent, invert, max, min, multiply, power, scale_bias,
    select, SelectBounds,
};
pub use curve::{curve, terrace, ControlPoint};
pub use fractal::{billow, perlin, ridged_multi, simplex, FractalParams, RidgedParams};
pub use pattern::{checkerboard, constant, cylinders, spheres, white};
pub use transform::{
    displace, rotate, scale_point, translate_point, turbulence, TurbulenceParams,
};

/// Hard cap on fractal octave counts.
///
/// Keeps the ridged-multifractal spectral weight table finite and bounds the
/// cost of a single sample. Exceeding it is a construction-time panic.
pub const MAX_OCTAVE_COUNT: u32 = 30;

/// A deterministic scalar field over 3D space.
///
/// Implementors must be pure: the same `pos` always yields the same value,
/// with no per-call mutable state observable across calls. This is what
/// makes a composed module safe to sample from many worker threads at once.
pub trait NoiseSource: Send + Sync {
    /// Evaluates the field at `pos`.
    fn sample(&self, pos: Point3<f64>) -> f64;
}

/// An opaque, cheaply cloneable handle to a composed noise field.
///
/// Built by the factory functions in this module. Cloning shares the
/// underlying combinator graph rather than copying it.
#[derive(Clone)]
pub struct Module {
    source: Arc<dyn NoiseSource>,
}

impl Module {
    /// Wraps a [`NoiseSource`] implementation into a module handle.
    pub fn new(source: impl NoiseSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Evaluates the field at `pos`.
    pub fn sample(&self, pos: Point3<f64>) -> f64 {
        self.source.sample(pos)
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Module")
    }
}
