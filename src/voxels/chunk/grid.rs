//! Dense voxel storage for one chunk.

use bitvec::prelude::BitVec;
use cgmath::Point3;

use crate::voxels::block::{BlockKind, BlockKindId};

use super::ChunkLayout;

/// A dense `width³` grid of block kinds.
///
/// Blocks are stored in their compact one-byte form, with a parallel bit
/// vector marking which voxels are solid. The mask costs one bit per voxel
/// and gives the mesher O(1) solidity checks without touching the block
/// array.
pub struct VoxelGrid {
    layout: ChunkLayout,
    kinds: Vec<BlockKindId>,
    solid: BitVec,
}

impl VoxelGrid {
    /// Creates a grid filled with air.
    pub fn new(layout: ChunkLayout) -> Self {
        let count = layout.voxel_count();
        let mut solid = BitVec::with_capacity(count);
        solid.resize(count, false);
        Self {
            layout,
            kinds: vec![BlockKind::Air.id(); count],
            solid,
        }
    }

    /// The layout this grid was allocated against.
    pub fn layout(&self) -> ChunkLayout {
        self.layout
    }

    /// The block kind at a voxel position.
    ///
    /// # Panics
    /// Panics if the position is outside the grid.
    pub fn kind_at(&self, pos: Point3<usize>) -> BlockKind {
        BlockKind::from_id(self.kinds[self.layout.linear_index(pos)])
    }

    /// Sets the block kind at a voxel position, keeping the solid mask in
    /// sync.
    ///
    /// # Panics
    /// Panics if the position is outside the grid.
    pub fn set_kind(&mut self, pos: Point3<usize>, kind: BlockKind) {
        let index = self.layout.linear_index(pos);
        self.kinds[index] = kind.id();
        self.solid.set(index, kind.is_solid());
    }

    /// Whether the voxel at a position is solid.
    ///
    /// # Panics
    /// Panics if the position is outside the grid.
    pub fn is_solid(&self, pos: Point3<usize>) -> bool {
        self.solid[self.layout.linear_index(pos)]
    }

    /// Number of solid voxels in the grid.
    pub fn solid_count(&self) -> usize {
        self.solid.count_ones()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let grid = VoxelGrid::new(ChunkLayout::default());
        assert_eq!(grid.solid_count(), 0);
        assert_eq!(grid.kind_at(Point3::new(3, 4, 5)), BlockKind::Air);
    }

    #[test]
    fn set_kind_updates_mask_and_storage() {
        let mut grid = VoxelGrid::new(ChunkLayout::default());
        let pos = Point3::new(1, 2, 3);

        grid.set_kind(pos, BlockKind::Rock);
        assert_eq!(grid.kind_at(pos), BlockKind::Rock);
        assert!(grid.is_solid(pos));
        assert_eq!(grid.solid_count(), 1);

        grid.set_kind(pos, BlockKind::Air);
        assert!(!grid.is_solid(pos));
        assert_eq!(grid.solid_count(), 0);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_access_panics() {
        let grid = VoxelGrid::new(ChunkLayout::default());
        let _ = grid.kind_at(Point3::new(0, 16, 0));
    }
}
