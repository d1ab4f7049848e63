//! # Chunk Module
//!
//! The chunk is the unit of generation, meshing, and streaming: a fixed-size
//! cube of voxels identified by an integer grid coordinate, carrying a
//! lifecycle state and, once a worker has processed it, a voxel grid and a
//! renderable mesh.
//!
//! ## Lifecycle
//!
//! ```text
//! Created  --(queued for load)-->    Loading
//! Loading  --(generated + meshed)--> Ready
//! Ready    --(too far away)-->       Unloading
//! Unloading --(payload cleared)-->   Created
//! ```
//!
//! The state tag is the mutual-exclusion device of the pipeline: a chunk sits
//! in at most one transfer queue at a time, and every state change happens
//! inside the transfer coordinator's critical section.

pub mod grid;
pub mod mesh;

use std::sync::atomic::{AtomicI64, Ordering};

use cgmath::Point3;

use grid::VoxelGrid;
use mesh::ChunkMesh;

/// Integer grid coordinate identifying a chunk's cell among all chunks.
pub type ChunkIndex = Point3<i64>;

/// Default chunk edge width, in voxels.
pub const DEFAULT_CHUNK_WIDTH: usize = 16;
/// Default edge length of a single voxel, in world units.
pub const DEFAULT_BLOCK_SIZE: f64 = 1.0;

/// Geometry of the chunk grid: voxels per edge and world size per voxel.
///
/// Supplied once at construction (it is configuration, not a file); every
/// index ↔ world-space conversion in the crate goes through this type, which
/// keeps the mapping exact and inverse-consistent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChunkLayout {
    width: usize,
    block_size: f64,
}

impl ChunkLayout {
    /// Creates a layout.
    ///
    /// # Panics
    /// Panics if `width` is zero or `block_size` is not strictly positive —
    /// malformed configuration fails loudly instead of producing silently
    /// wrong geometry.
    pub fn new(width: usize, block_size: f64) -> Self {
        assert!(width > 0, "chunk width can't be 0");
        assert!(
            block_size > 0.0,
            "chunk block size can't be 0 or less"
        );
        Self { width, block_size }
    }

    /// Voxels per chunk edge.
    pub fn width(&self) -> usize {
        self.width
    }

    /// World-space edge length of a single voxel.
    pub fn block_size(&self) -> f64 {
        self.block_size
    }

    /// World-space edge length of a whole chunk.
    pub fn chunk_extent(&self) -> f64 {
        self.width as f64 * self.block_size
    }

    /// Number of voxels in a chunk (`width³`).
    pub fn voxel_count(&self) -> usize {
        self.width * self.width * self.width
    }

    /// Flattens a voxel position into its index in the dense data array.
    ///
    /// # Panics
    /// Panics if any coordinate is outside the chunk.
    pub fn linear_index(&self, pos: Point3<usize>) -> usize {
        assert!(pos.x < self.width, "voxel x {} out of bounds", pos.x);
        assert!(pos.y < self.width, "voxel y {} out of bounds", pos.y);
        assert!(pos.z < self.width, "voxel z {} out of bounds", pos.z);

        (self.width * self.width * pos.z) + (self.width * pos.y) + pos.x
    }

    /// The index of the chunk containing a world-space position.
    pub fn index_of(&self, world_position: Point3<f64>) -> ChunkIndex {
        let extent = self.chunk_extent();
        Point3::new(
            (world_position.x / extent).floor() as i64,
            (world_position.y / extent).floor() as i64,
            (world_position.z / extent).floor() as i64,
        )
    }

    /// The world-space origin (bottom front left corner) of a chunk index.
    pub fn origin_of(&self, index: ChunkIndex) -> Point3<f64> {
        let extent = self.chunk_extent();
        Point3::new(
            index.x as f64 * extent,
            index.y as f64 * extent,
            index.z as f64 * extent,
        )
    }

    /// The world-space center of a chunk index.
    pub fn center_of(&self, index: ChunkIndex) -> Point3<f64> {
        let half = self.chunk_extent() * 0.5;
        let origin = self.origin_of(index);
        Point3::new(origin.x + half, origin.y + half, origin.z + half)
    }
}

impl Default for ChunkLayout {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_WIDTH, DEFAULT_BLOCK_SIZE)
    }
}

/// World-space footprint of one chunk.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChunkExtents {
    origin: Point3<f64>,
    layout: ChunkLayout,
}

impl ChunkExtents {
    /// Creates extents for the chunk at `origin`.
    pub fn new(origin: Point3<f64>, layout: ChunkLayout) -> Self {
        Self { origin, layout }
    }

    /// The chunk's origin: the corner where voxel `(0, 0, 0)` sits.
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// The chunk's world-space center.
    pub fn center(&self) -> Point3<f64> {
        let half = self.layout.chunk_extent() * 0.5;
        Point3::new(
            self.origin.x + half,
            self.origin.y + half,
            self.origin.z + half,
        )
    }

    /// The layout this chunk was built against.
    pub fn layout(&self) -> ChunkLayout {
        self.layout
    }

    /// World-space position of a voxel within the chunk.
    pub fn world_position_at(&self, index: Point3<usize>) -> Point3<f64> {
        let block_size = self.layout.block_size();
        Point3::new(
            self.origin.x + index.x as f64 * block_size,
            self.origin.y + index.y as f64 * block_size,
            self.origin.z + index.z as f64 * block_size,
        )
    }
}

/// Lifecycle state of a chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Exists in the cache but holds no data. The only state from which a
    /// chunk may be queued for loading.
    Created,
    /// Owned by exactly one worker, which is generating and meshing it.
    Loading,
    /// Fully generated and meshed; visible to the renderer.
    Ready,
    /// Queued for unload; the payload is released when the consumer drains it.
    Unloading,
}

static NEXT_CHUNK_ID: AtomicI64 = AtomicI64::new(0);

/// A fixed-size cube of voxels plus its lifecycle state and, when `Ready`,
/// its generated mesh.
///
/// Chunks are created empty by the [cache](crate::voxels::ChunkCache), which
/// owns them for their entire lifetime; everything else holds
/// [`MtResource`](crate::core::MtResource) handles.
pub struct Chunk {
    id: i64,
    index: ChunkIndex,
    extents: ChunkExtents,
    state: ChunkState,
    voxels: Option<VoxelGrid>,
    mesh: Option<ChunkMesh>,
}

impl Chunk {
    /// Creates an empty chunk in the `Created` state.
    pub(crate) fn new(index: ChunkIndex, layout: ChunkLayout) -> Self {
        Self {
            id: NEXT_CHUNK_ID.fetch_add(1, Ordering::Relaxed),
            index,
            extents: ChunkExtents::new(layout.origin_of(index), layout),
            state: ChunkState::Created,
            voxels: None,
            mesh: None,
        }
    }

    /// Process-unique id, monotonically assigned at creation.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The chunk's grid coordinate.
    pub fn index(&self) -> ChunkIndex {
        self.index
    }

    /// The chunk's world-space footprint.
    pub fn extents(&self) -> ChunkExtents {
        self.extents
    }

    /// The chunk's world-space center.
    pub fn center(&self) -> Point3<f64> {
        self.extents.center()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// Sets the lifecycle state.
    ///
    /// Only the transfer coordinator calls this, inside its queue critical
    /// section, which is what keeps state and queue membership consistent.
    pub(crate) fn set_state(&mut self, state: ChunkState) {
        self.state = state;
    }

    /// Whether the chunk currently holds generated voxel data.
    pub fn has_data(&self) -> bool {
        self.voxels.is_some()
    }

    /// The generated voxel grid, if any.
    pub fn voxels(&self) -> Option<&VoxelGrid> {
        self.voxels.as_ref()
    }

    /// The generated mesh, if any.
    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// Installs a worker's finished payload.
    pub(crate) fn install(&mut self, voxels: VoxelGrid, mesh: ChunkMesh) {
        self.voxels = Some(voxels);
        self.mesh = Some(mesh);
    }

    /// Releases the voxel and mesh payload and returns the chunk to
    /// `Created`, ready to be regenerated on demand.
    pub(crate) fn clear(&mut self) {
        self.voxels = None;
        self.mesh = None;
        self.state = ChunkState::Created;
    }
}
