//! # Voxels Module
//!
//! Chunk storage: block kinds and the density classifier, the chunk entity
//! with its lifecycle state, the spatial chunk cache that owns all chunks,
//! and the world generator that fills them from a noise module.
//!
//! ## Ownership
//!
//! The [`ChunkCache`] owns every [`Chunk`] for its entire lifetime. The
//! transfer queues and worker threads only ever hold [`ChunkHandle`]s —
//! reference-counted, lock-guarded aliases — so no component can outlive or
//! dangle into chunk storage.

pub mod block;
pub mod chunk;
pub mod chunk_cache;
pub mod world;

pub use block::{BlockClassifier, BlockKind, BlockKindId};
pub use chunk::grid::VoxelGrid;
pub use chunk::mesh::ChunkMesh;
pub use chunk::{Chunk, ChunkExtents, ChunkIndex, ChunkLayout, ChunkState};
pub use chunk_cache::{ChunkCache, ChunkHandle};
pub use world::WorldGenerator;
