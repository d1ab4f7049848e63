//! # World Generator
//!
//! Turns a noise module into chunk voxel data: sample the module at every
//! voxel's world position, classify the density, write the block.
//!
//! The generator is shared by all workers. It holds no mutable state — the
//! module graph is immutable and the classifier is a pair of numbers — so a
//! single instance can fill any number of chunks concurrently.

use cgmath::Point3;

use crate::noise::generator::NoiseQuality;
use crate::noise::modules::{self, FractalParams, Module, RidgedParams};

use super::block::BlockClassifier;
use super::chunk::grid::VoxelGrid;
use super::chunk::ChunkExtents;

/// Samples a noise module over chunk extents and classifies the result.
pub struct WorldGenerator {
    source: Module,
    classifier: BlockClassifier,
}

impl WorldGenerator {
    /// Creates a generator from a density module and a classifier.
    pub fn new(source: Module, classifier: BlockClassifier) -> Self {
        Self { source, classifier }
    }

    /// The stock terrain: best-quality ridged mountains, domain-warped by
    /// three billow channels so the ridge lines meander instead of running
    /// straight.
    pub fn default_terrain() -> Self {
        let displacement = |seed: i32| {
            modules::billow(FractalParams {
                frequency: 1.0 / 15.0,
                lacunarity: 3.0,
                octave_count: 8,
                persistence: 0.5,
                quality: NoiseQuality::Standard,
                seed,
            })
        };

        let source = modules::displace(
            modules::ridged_multi(RidgedParams {
                frequency: 1.0 / 72.0,
                lacunarity: 2.3,
                octave_count: 14,
                quality: NoiseQuality::Best,
                seed: 0,
            }),
            displacement(0),
            displacement(1),
            displacement(2),
        );

        Self::new(source, BlockClassifier::default())
    }

    /// Samples the density field at a world position.
    pub fn sample(&self, position: Point3<f64>) -> f64 {
        self.source.sample(position)
    }

    /// Generates the full voxel grid for one chunk.
    pub fn generate(&self, extents: ChunkExtents) -> VoxelGrid {
        let layout = extents.layout();
        let mut grid = VoxelGrid::new(layout);

        for z in 0..layout.width() {
            for y in 0..layout.width() {
                for x in 0..layout.width() {
                    let index = Point3::new(x, y, z);
                    let sample_position = extents.world_position_at(index);
                    let value = self.source.sample(sample_position);
                    grid.set_kind(index, self.classifier.classify(value));
                }
            }
        }

        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::chunk::{ChunkLayout, DEFAULT_CHUNK_WIDTH};

    fn extents_at_origin() -> ChunkExtents {
        ChunkExtents::new(Point3::new(0.0, 0.0, 0.0), ChunkLayout::default())
    }

    #[test]
    fn generation_is_deterministic() {
        let generator = WorldGenerator::default_terrain();
        let a = generator.generate(extents_at_origin());
        let b = generator.generate(extents_at_origin());

        let w = DEFAULT_CHUNK_WIDTH;
        for z in 0..w {
            for y in 0..w {
                for x in 0..w {
                    let pos = Point3::new(x, y, z);
                    assert_eq!(a.kind_at(pos), b.kind_at(pos));
                }
            }
        }
        assert_eq!(a.solid_count(), b.solid_count());
    }

    #[test]
    fn grid_matches_pointwise_classification() {
        let generator = WorldGenerator::new(
            modules::perlin(FractalParams {
                frequency: 0.05,
                ..Default::default()
            }),
            BlockClassifier::new(0.0),
        );

        let extents = extents_at_origin();
        let grid = generator.generate(extents);

        for &pos in &[
            Point3::new(0, 0, 0),
            Point3::new(7, 3, 11),
            Point3::new(15, 15, 15),
        ] {
            let density = generator.sample(extents.world_position_at(pos));
            assert_eq!(grid.is_solid(pos), density > 0.0);
        }
    }

    #[test]
    fn constant_density_fills_or_empties_the_grid() {
        let layout = ChunkLayout::default();
        let solid = WorldGenerator::new(modules::constant(1.0), BlockClassifier::default());
        let grid = solid.generate(ChunkExtents::new(Point3::new(0.0, 0.0, 0.0), layout));
        assert_eq!(grid.solid_count(), layout.voxel_count());

        let empty = WorldGenerator::new(modules::constant(-1.0), BlockClassifier::default());
        let grid = empty.generate(ChunkExtents::new(Point3::new(0.0, 0.0, 0.0), layout));
        assert_eq!(grid.solid_count(), 0);
    }
}
