#![warn(missing_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxelstream
//!
//! A procedural voxel terrain core: a composable noise engine that turns 3D
//! coordinates into deterministic densities, and a concurrent chunk pipeline
//! that streams finished, renderable geometry to a consumer.
//!
//! This crate is deliberately headless. It knows nothing about windows,
//! cameras, or GPUs — the embedding application feeds it an observer
//! position each frame and drains ready/unloaded chunks from the other end.
//!
//! ## Key Modules
//!
//! * `noise` - Deterministic scalar fields over 3D space and the combinator
//!   library that composes them into terrain pipelines
//! * `voxels` - Chunk storage: block classification, the chunk grid, and the
//!   spatial chunk cache
//! * `pipeline` - The streaming machinery: transfer queues, the worker pool,
//!   and the face-culling mesher
//! * `core` - Shared concurrency primitives
//!
//! ## Data Flow
//!
//! 1. The main thread hands the observer position to [`pipeline::ChunkTransfer::update`]
//! 2. Nearby unloaded chunks are queued for generation, nearest first
//! 3. Worker threads sample the noise module over each chunk's voxel grid,
//!    classify densities into blocks, and mesh the result
//! 4. Finished chunks arrive on the render queue; far-away chunks arrive on
//!    the unload queue; the consumer drains both without blocking
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use cgmath::Point3;
//! use voxelstream::pipeline::{ChunkTransfer, ChunkUpdater, TransferConfig};
//! use voxelstream::voxels::{ChunkCache, ChunkLayout, WorldGenerator};
//!
//! let cache = Arc::new(ChunkCache::new(ChunkLayout::default()));
//! let transfer = Arc::new(ChunkTransfer::new(TransferConfig::default(), cache));
//! let generator = Arc::new(WorldGenerator::default_terrain());
//! let _updater = ChunkUpdater::spawn(4, transfer.clone(), generator);
//!
//! // Each frame:
//! transfer.update(Point3::new(0.0, 0.0, 0.0));
//! while let Some(chunk) = transfer.dequeue_to_render() {
//!     // upload chunk.get().mesh() to the GPU
//! }
//! while let Some(chunk) = transfer.dequeue_to_unload() {
//!     // release the chunk's GPU resources
//! }
//! ```

pub mod core;
pub mod noise;
pub mod pipeline;
pub mod voxels;
