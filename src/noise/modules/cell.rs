//! Cellular (Voronoi-family) noise.

use cgmath::{InnerSpace, MetricSpace, Point3, Vector3};

use crate::noise::generator::{fast_floor, value_noise_3d};

use super::{Module, NoiseSource};

/// Default displacement applied at each cell's seed point.
pub const CELL_DEFAULT_DISPLACEMENT: f64 = 1.0;
/// Default frequency for [`cell`].
pub const CELL_DEFAULT_FREQUENCY: f64 = 1.0;
/// Default Minkowsky exponent.
pub const CELL_DEFAULT_MINKOWSKY_COEFFICIENT: f64 = 4.0;

/// Distance metric used to pick the winning seed point.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum CellDistance {
    /// True Euclidean distance.
    Euclidean,
    /// Squared Euclidean distance — the classic Voronoi metric, and the
    /// default. Picks the same winner as `Euclidean` at lower cost.
    #[default]
    EuclideanSquared,
    /// Sum of per-axis absolute differences; diamond-shaped cells.
    Manhattan,
    /// Largest per-axis absolute difference; cube-shaped cells.
    Chebychev,
    /// Minkowsky distance with the configured exponent.
    Minkowsky,
}

/// Parameters for [`cell`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CellParams {
    /// Distance metric selecting the nearest seed point.
    pub distance: CellDistance,
    /// Scale of the per-cell random displacement added to the output.
    pub displacement: f64,
    /// Frequency applied to the input point.
    pub frequency: f64,
    /// When set, output the distance to the nearest seed point instead of a
    /// flat per-cell value.
    pub enable_distance: bool,
    /// Exponent for the Minkowsky metric.
    pub minkowsky_coefficient: f64,
    /// Seed for the per-cell pseudo-random seed points.
    pub seed: i32,
}

impl Default for CellParams {
    fn default() -> Self {
        Self {
            distance: CellDistance::default(),
            displacement: CELL_DEFAULT_DISPLACEMENT,
            frequency: CELL_DEFAULT_FREQUENCY,
            enable_distance: false,
            minkowsky_coefficient: CELL_DEFAULT_MINKOWSKY_COEFFICIENT,
            seed: 0,
        }
    }
}

struct Cell {
    params: CellParams,
}

impl Cell {
    fn metric(&self, dist_vec: Vector3<f64>) -> f64 {
        match self.params.distance {
            CellDistance::Euclidean => dist_vec.magnitude(),
            CellDistance::EuclideanSquared => dist_vec.dot(dist_vec),
            CellDistance::Manhattan => {
                dist_vec.x.abs() + dist_vec.y.abs() + dist_vec.z.abs()
            }
            CellDistance::Chebychev => dist_vec
                .x
                .abs()
                .max(dist_vec.y.abs())
                .max(dist_vec.z.abs()),
            CellDistance::Minkowsky => {
                let p = self.params.minkowsky_coefficient;
                let sum = dist_vec.x.abs().powf(p)
                    + dist_vec.y.abs().powf(p)
                    + dist_vec.z.abs().powf(p);
                sum.powf(1.0 / p)
            }
        }
    }
}

impl NoiseSource for Cell {
    fn sample(&self, pos: Point3<f64>) -> f64 {
        let pos = pos * self.params.frequency;
        let ipos = Point3::new(fast_floor(pos.x), fast_floor(pos.y), fast_floor(pos.z));
        let seed = self.params.seed;

        // Inside each unit cube there is a seed point at a pseudo-random
        // position. Search the nearby cubes for the one closest to the
        // sample position.
        let mut min_distance = f64::MAX;
        let mut candidate = Point3::new(0.0, 0.0, 0.0);

        for zcur in (ipos.z - 2)..=(ipos.z + 2) {
            for ycur in (ipos.y - 2)..=(ipos.y + 2) {
                for xcur in (ipos.x - 2)..=(ipos.x + 2) {
                    let cube_ipos = Point3::new(xcur, ycur, zcur);
                    let cube_pos = Point3::new(
                        xcur as f64 + value_noise_3d(cube_ipos, seed),
                        ycur as f64 + value_noise_3d(cube_ipos, seed.wrapping_add(1)),
                        zcur as f64 + value_noise_3d(cube_ipos, seed.wrapping_add(2)),
                    );
                    let dist = self.metric(cube_pos - pos);

                    if dist < min_distance {
                        min_distance = dist;
                        candidate = cube_pos;
                    }
                }
            }
        }

        let value = if self.params.enable_distance {
            // Scale so the maximum in-cell distance maps near +1.
            candidate.distance(pos) * 3.0_f64.sqrt() - 1.0
        } else {
            0.0
        };

        let displacement_pos = Point3::new(
            fast_floor(candidate.x),
            fast_floor(candidate.y),
            fast_floor(candidate.z),
        );
        value + self.params.displacement * value_noise_3d(displacement_pos, seed)
    }
}

/// Outputs cellular noise: each unit cell owns a pseudo-random seed point,
/// and the output is derived from the nearest seed point under the chosen
/// distance metric.
pub fn cell(params: CellParams) -> Module {
    Module::new(Cell { params })
}
