//! # Chunk Updater
//!
//! The worker pool that drains the load queue: generate voxel data from the
//! world generator, mesh it, install the payload, and hand the chunk to the
//! finished queue.
//!
//! Only one worker ever holds a given chunk, because a chunk is popped from
//! the load queue exactly once per lifecycle and the coordinator never
//! re-offers a `Loading` chunk. There is no cancellation: once generation
//! starts it runs to `Ready`, even if the observer has since moved away —
//! the cost is bounded by the chunk size and the next unload pass cleans up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::voxels::WorldGenerator;

use super::mesher::{self, BoundaryPolicy};
use super::transfer::ChunkTransfer;

/// How long an idle worker sleeps before re-polling the load queue.
const IDLE_BACKOFF: Duration = Duration::from_millis(100);

/// Processes one queued chunk, if any: generate, classify, mesh, publish.
///
/// Generation and meshing run on local buffers; the chunk's own lock is only
/// taken briefly to install the finished payload. Returns `false` when the
/// load queue was empty.
///
/// This is the body of every pool worker, and is also directly callable for
/// single-threaded, deterministic draining of the queue.
pub fn step(transfer: &ChunkTransfer, generator: &WorldGenerator) -> bool {
    let Some(chunk) = transfer.dequeue_to_load() else {
        return false;
    };

    let extents = chunk.get().extents();
    let voxels = generator.generate(extents);
    let mesh = mesher::generate_mesh(&voxels, extents.origin(), BoundaryPolicy::Exposed);

    log::trace!(
        "generated chunk {:?}: {} solid voxels, {} quads",
        chunk.get().index(),
        voxels.solid_count(),
        mesh.quad_count()
    );

    chunk.get_mut().install(voxels, mesh);
    transfer.enqueue_to_render(chunk);
    true
}

/// A fixed pool of background threads running [`step`] in a loop.
///
/// Dropping the updater signals the workers to finish their current chunk
/// and joins them.
pub struct ChunkUpdater {
    shutdown: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl ChunkUpdater {
    /// Spawns `worker_count` worker threads over the given coordinator and
    /// generator.
    ///
    /// # Panics
    /// Panics if `worker_count` is zero, or if the OS refuses to spawn a
    /// thread.
    pub fn spawn(
        worker_count: usize,
        transfer: Arc<ChunkTransfer>,
        generator: Arc<WorldGenerator>,
    ) -> Self {
        assert!(worker_count > 0, "worker pool can't be empty");

        let shutdown = Arc::new(AtomicBool::new(false));
        let workers = (0..worker_count)
            .map(|worker_index| {
                let shutdown = shutdown.clone();
                let transfer = transfer.clone();
                let generator = generator.clone();
                thread::Builder::new()
                    .name(format!("chunk-worker-{worker_index}"))
                    .spawn(move || Self::worker_loop(&shutdown, &transfer, &generator))
                    .expect("failed to spawn chunk worker")
            })
            .collect();

        log::info!("spawned {worker_count} chunk workers");
        Self { shutdown, workers }
    }

    /// Number of worker threads in the pool.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    fn worker_loop(
        shutdown: &AtomicBool,
        transfer: &ChunkTransfer,
        generator: &WorldGenerator,
    ) {
        log::info!("chunk worker started");
        while !shutdown.load(Ordering::Relaxed) {
            if step(transfer, generator) {
                thread::yield_now();
            } else {
                thread::sleep(IDLE_BACKOFF);
            }
        }
        log::info!("chunk worker stopped");
    }
}

impl Drop for ChunkUpdater {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::transfer::TransferConfig;
    use crate::voxels::{ChunkCache, ChunkLayout, ChunkState};
    use cgmath::Point3;
    use std::time::Instant;

    fn pipeline() -> (Arc<ChunkTransfer>, Arc<WorldGenerator>) {
        let cache = Arc::new(ChunkCache::new(ChunkLayout::default()));
        let transfer = Arc::new(ChunkTransfer::new(
            TransferConfig {
                load_distance: 20.0,
                unload_threshold: 30.0,
            },
            cache,
        ));
        let generator = Arc::new(WorldGenerator::default_terrain());
        (transfer, generator)
    }

    #[test]
    fn step_returns_false_on_an_empty_queue() {
        let (transfer, generator) = pipeline();
        assert!(!step(&transfer, &generator));
    }

    #[test]
    fn step_drives_a_chunk_to_ready() {
        let (transfer, generator) = pipeline();
        transfer.update(Point3::new(0.0, 0.0, 0.0));
        assert!(transfer.load_queue_len() > 0);

        assert!(step(&transfer, &generator));
        let chunk = transfer.dequeue_to_render().unwrap();
        let guard = chunk.get();
        assert_eq!(guard.state(), ChunkState::Ready);
        assert!(guard.has_data());
        assert!(guard.mesh().is_some());
    }

    #[test]
    fn pool_drains_the_load_queue() {
        let (transfer, generator) = pipeline();
        transfer.update(Point3::new(0.0, 0.0, 0.0));
        let queued = transfer.load_queue_len();
        assert!(queued > 0);

        let _updater = ChunkUpdater::spawn(2, transfer.clone(), generator);

        let deadline = Instant::now() + Duration::from_secs(30);
        let mut finished = 0;
        while finished < queued {
            if transfer.dequeue_to_render().is_some() {
                finished += 1;
            } else {
                assert!(Instant::now() < deadline, "workers stalled");
                thread::sleep(Duration::from_millis(10));
            }
        }
        assert_eq!(transfer.load_queue_len(), 0);
        assert_eq!(transfer.visible_count(), queued);
    }

    #[test]
    #[should_panic]
    fn empty_pool_is_a_contract_violation() {
        let (transfer, generator) = pipeline();
        let _ = ChunkUpdater::spawn(0, transfer, generator);
    }
}
