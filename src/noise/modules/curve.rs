//! Curve combinators: remap a child module's output through a sorted
//! control-point table.

use cgmath::Point3;

use crate::noise::generator::linear_interp;

use super::{Module, NoiseSource};

/// One mapping entry of a [`curve`] control table.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControlPoint {
    /// Input value at which this point anchors the curve.
    pub input: f64,
    /// Output value the curve passes through at `input`.
    pub output: f64,
}

/// Cubic interpolation through `n1` and `n2` with outer neighbors `n0`, `n3`.
#[inline]
fn cubic_interp(n0: f64, n1: f64, n2: f64, n3: f64, a: f64) -> f64 {
    let p = (n3 - n2) - (n0 - n1);
    let q = (n0 - n1) - p;
    let r = n2 - n0;
    let s = n1;
    p * a * a * a + q * a * a + r * a + s
}

fn assert_strictly_increasing(inputs: impl Iterator<Item = f64>) {
    let mut prev: Option<f64> = None;
    for input in inputs {
        if let Some(prev) = prev {
            assert!(
                input > prev,
                "control points must be strictly increasing: {input} follows {prev}"
            );
        }
        prev = Some(input);
    }
}

struct Curve {
    source: Module,
    control_points: Vec<ControlPoint>,
}

impl NoiseSource for Curve {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let value = self.source.sample(pos);
        let count = self.control_points.len();

        // First control point whose input exceeds the source value.
        let index_pos = self
            .control_points
            .iter()
            .position(|cp| value < cp.input)
            .unwrap_or(count);

        let clamp_index = |i: isize| i.clamp(0, count as isize - 1) as usize;
        let index0 = clamp_index(index_pos as isize - 2);
        let index1 = clamp_index(index_pos as isize - 1);
        let index2 = clamp_index(index_pos as isize);
        let index3 = clamp_index(index_pos as isize + 1);

        // Outside the table's domain, hold the nearest endpoint's output.
        if index1 == index2 {
            return self.control_points[index1].output;
        }

        let input0 = self.control_points[index1].input;
        let input1 = self.control_points[index2].input;
        let alpha = (value - input0) / (input1 - input0);

        cubic_interp(
            self.control_points[index0].output,
            self.control_points[index1].output,
            self.control_points[index2].output,
            self.control_points[index3].output,
            alpha,
        )
    }
}

/// Maps the source value onto an arbitrary curve described by control points,
/// cubically interpolated between the four nearest points.
///
/// Values outside the table's input domain clamp to the nearest endpoint's
/// output.
///
/// # Panics
/// Panics if fewer than four control points are supplied or if their inputs
/// are not strictly increasing.
pub fn curve(source: Module, control_points: &[ControlPoint]) -> Module {
    assert!(
        control_points.len() >= 4,
        "curve needs at least four control points, got {}",
        control_points.len()
    );
    assert_strictly_increasing(control_points.iter().map(|cp| cp.input));
    Module::new(Curve {
        source,
        control_points: control_points.to_vec(),
    })
}

struct Terrace {
    source: Module,
    control_points: Vec<f64>,
    invert_terraces: bool,
}

impl NoiseSource for Terrace {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let value = self.source.sample(pos);
        let count = self.control_points.len();

        let index_pos = self
            .control_points
            .iter()
            .position(|&cp| value < cp)
            .unwrap_or(count);

        let clamp_index = |i: isize| i.clamp(0, count as isize - 1) as usize;
        let index0 = clamp_index(index_pos as isize - 1);
        let index1 = clamp_index(index_pos as isize);

        if index0 == index1 {
            return self.control_points[index1];
        }

        let mut value0 = self.control_points[index0];
        let mut value1 = self.control_points[index1];
        let mut alpha = (value - value0) / (value1 - value0);

        if self.invert_terraces {
            alpha = 1.0 - alpha;
            std::mem::swap(&mut value0, &mut value1);
        }

        // The squared ramp flattens toward one side of each step.
        alpha *= alpha;
        linear_interp(value0, value1, alpha)
    }
}

/// Maps the source value onto a terrace-forming curve: flat steps at each
/// control point with a quadratic ramp between them.
///
/// # Panics
/// Panics if fewer than two control points are supplied or if they are not
/// strictly increasing.
pub fn terrace(source: Module, control_points: &[f64], invert_terraces: bool) -> Module {
    assert!(
        control_points.len() >= 2,
        "terrace needs at least two control points, got {}",
        control_points.len()
    );
    assert_strictly_increasing(control_points.iter().copied());
    Module::new(Terrace {
        source,
        control_points: control_points.to_vec(),
        invert_terraces,
    })
}
