//! # Block Module
//!
//! Block kinds and the density classifier that assigns them.
//!
//! Voxel grids store blocks in their compact integer form
//! ([`BlockKindId`], one byte per voxel) and convert back to the rich
//! [`BlockKind`] enum on access.

use num_derive::FromPrimitive;

/// Compact storage form of a block kind, one byte per voxel.
pub type BlockKindId = u8;

/// The kinds of block a voxel can hold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockKind {
    /// Empty space. Non-solid; never meshed.
    Air,

    /// Solid terrain.
    Rock,
}

impl BlockKind {
    /// Converts a compact block id back to a `BlockKind`.
    ///
    /// # Panics
    /// Panics if the id does not name a block kind; ids only come from
    /// [`BlockKind::id`], so an unknown id is a caller bug.
    pub fn from_id(id: BlockKindId) -> Self {
        num::FromPrimitive::from_u8(id).expect("invalid block kind id")
    }

    /// The compact storage id of this block kind.
    pub fn id(self) -> BlockKindId {
        self as BlockKindId
    }

    /// Whether this block occludes its neighbors and produces geometry.
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockKind::Air)
    }
}

/// Default density cutoff between air and solid terrain.
pub const DEFAULT_AIR_THRESHOLD: f64 = 0.1;

/// Maps a scalar density to a discrete block kind via a threshold.
#[derive(Copy, Clone, Debug)]
pub struct BlockClassifier {
    air_threshold: f64,
}

impl BlockClassifier {
    /// Creates a classifier with the given density cutoff.
    pub fn new(air_threshold: f64) -> Self {
        Self { air_threshold }
    }

    /// Classifies a density sample: densities above the threshold are solid.
    pub fn classify(&self, density: f64) -> BlockKind {
        if density > self.air_threshold {
            BlockKind::Rock
        } else {
            BlockKind::Air
        }
    }
}

impl Default for BlockClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_AIR_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip() {
        for kind in [BlockKind::Air, BlockKind::Rock] {
            assert_eq!(BlockKind::from_id(kind.id()), kind);
        }
    }

    #[test]
    fn solidity() {
        assert!(!BlockKind::Air.is_solid());
        assert!(BlockKind::Rock.is_solid());
    }

    #[test]
    fn classifier_threshold_is_exclusive() {
        let classifier = BlockClassifier::new(0.1);
        assert_eq!(classifier.classify(0.2), BlockKind::Rock);
        assert_eq!(classifier.classify(0.1), BlockKind::Air);
        assert_eq!(classifier.classify(-0.5), BlockKind::Air);
    }
}
