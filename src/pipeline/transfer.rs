//! # Chunk Transfer Coordinator
//!
//! The synchronization point between the main thread and the worker pool:
//! three queues (prioritized load, finished, unload) plus the visible-chunk
//! set, all behind one mutex.
//!
//! Every enqueue and dequeue mutates the affected chunk's state inside that
//! critical section, so state and queue membership are never observed out of
//! step: a chunk is in at most one queue, and its state tag says which.
//!
//! ## Lock order
//!
//! Queue mutex first, then a chunk's own lock, always briefly. Workers do
//! the reverse-order-free thing: they generate into local buffers and only
//! take a chunk lock (without the queue mutex) to install the result.
//!
//! ## Queue staleness
//!
//! Load priority is the distance from chunk center to the observer *at
//! enqueue time*. The heap is never re-sorted as the observer moves; instead
//! [`ChunkTransfer::update`] re-derives the candidate set from scratch every
//! frame, so a fast-moving observer's next frame corrects the priorities of
//! everything still unqueued. Accepting brief staleness for chunks already
//! queued keeps the critical sections trivial.

use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use cgmath::{MetricSpace, Point3};

use crate::voxels::{ChunkCache, ChunkHandle, ChunkIndex, ChunkState};

/// Default distance within which chunks are queued for loading.
pub const DEFAULT_LOAD_DISTANCE: f64 = 48.0;
/// Default distance beyond which visible chunks are queued for unloading.
pub const DEFAULT_UNLOAD_THRESHOLD: f64 = 64.0;

/// Distance configuration for the coordinator.
///
/// The unload threshold must exceed the load distance: the gap is the
/// hysteresis band that keeps chunks on the boundary from thrashing between
/// loaded and unloaded as the observer jitters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransferConfig {
    /// Chunks whose centers are within this distance of the observer are
    /// loaded.
    pub load_distance: f64,
    /// Visible chunks whose centers are beyond this distance are unloaded.
    pub unload_threshold: f64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            load_distance: DEFAULT_LOAD_DISTANCE,
            unload_threshold: DEFAULT_UNLOAD_THRESHOLD,
        }
    }
}

/// Load-queue entry: a chunk plus its priority, the distance to the observer
/// captured at enqueue time.
struct LoadEntry {
    distance: f64,
    chunk: ChunkHandle,
}

impl PartialEq for LoadEntry {
    fn eq(&self, other: &Self) -> bool {
        self.distance.total_cmp(&other.distance).is_eq()
    }
}

impl Eq for LoadEntry {}

impl PartialOrd for LoadEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LoadEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed: BinaryHeap is a max-heap, the nearest chunk must pop first.
        other.distance.total_cmp(&self.distance)
    }
}

struct TransferQueues {
    load: BinaryHeap<LoadEntry>,
    finished: VecDeque<ChunkHandle>,
    unload: VecDeque<ChunkHandle>,
    visible: HashMap<ChunkIndex, ChunkHandle>,
}

/// Coordinates chunk hand-off between the main thread, the worker pool, and
/// the rendering consumer.
pub struct ChunkTransfer {
    config: TransferConfig,
    cache: Arc<ChunkCache>,
    queues: Mutex<TransferQueues>,
}

impl ChunkTransfer {
    /// Creates a coordinator over a chunk cache.
    ///
    /// # Panics
    /// Panics if either distance is not strictly positive, or if the unload
    /// threshold does not exceed the load distance (no hysteresis).
    pub fn new(config: TransferConfig, cache: Arc<ChunkCache>) -> Self {
        assert!(
            config.load_distance > 0.0,
            "load distance must be positive"
        );
        assert!(
            config.unload_threshold > config.load_distance,
            "unload threshold {} must exceed load distance {}",
            config.unload_threshold,
            config.load_distance
        );
        Self {
            config,
            cache,
            queues: Mutex::new(TransferQueues {
                load: BinaryHeap::new(),
                finished: VecDeque::new(),
                unload: VecDeque::new(),
                visible: HashMap::new(),
            }),
        }
    }

    /// The distance configuration in effect.
    pub fn config(&self) -> TransferConfig {
        self.config
    }

    /// The cache this coordinator streams chunks through.
    pub fn cache(&self) -> &Arc<ChunkCache> {
        &self.cache
    }

    /// Per-frame admission pass, driven by the current observer position.
    ///
    /// Queues every `Created` chunk within the load distance for loading
    /// (nearest first, via the cache's ordered radius query) and every
    /// visible `Ready` chunk beyond the unload threshold for unloading.
    pub fn update(&self, observer: Point3<f64>) {
        let indices = self
            .cache
            .indices_around(observer, self.config.load_distance);
        for index in indices {
            let chunk = self.cache.get_or_create(index);
            self.enqueue_to_load(chunk, observer);
        }

        let mut queues = self.queues.lock().unwrap();
        let far_chunks: Vec<ChunkHandle> = queues
            .visible
            .values()
            .filter(|handle| {
                let chunk = handle.get();
                chunk.state() == ChunkState::Ready
                    && chunk.center().distance(observer) > self.config.unload_threshold
            })
            .cloned()
            .collect();

        for chunk in far_chunks {
            log::debug!("unloading chunk {:?}", chunk.get().index());
            chunk.get_mut().set_state(ChunkState::Unloading);
            queues.unload.push_back(chunk);
        }
    }

    /// Queues a chunk for loading if it is still `Created`, with priority
    /// taken from its distance to `observer` now.
    fn enqueue_to_load(&self, chunk: ChunkHandle, observer: Point3<f64>) {
        let mut queues = self.queues.lock().unwrap();
        let mut guard = chunk.get_mut();
        if guard.state() != ChunkState::Created {
            return;
        }
        guard.set_state(ChunkState::Loading);
        let distance = guard.center().distance(observer);
        drop(guard);

        queues.load.push(LoadEntry { distance, chunk });
    }

    /// Takes the nearest queued chunk for generation. Called by workers; the
    /// chunk stays `Loading` and is owned by the caller until it is handed
    /// back via [`ChunkTransfer::enqueue_to_render`].
    ///
    /// Returns `None` when the queue is empty — a normal idle condition, not
    /// an error.
    pub fn dequeue_to_load(&self) -> Option<ChunkHandle> {
        let mut queues = self.queues.lock().unwrap();
        queues.load.pop().map(|entry| entry.chunk)
    }

    /// Hands a generated and meshed chunk back for display. Called by the
    /// worker that owns the chunk; marks it `Ready`.
    pub fn enqueue_to_render(&self, chunk: ChunkHandle) {
        let mut queues = self.queues.lock().unwrap();
        chunk.get_mut().set_state(ChunkState::Ready);
        queues.finished.push_back(chunk);
    }

    /// Takes the next finished chunk, adding it to the visible set. This is
    /// the render hand-off: the caller uploads the chunk's mesh.
    ///
    /// Non-blocking; `None` means nothing has finished since the last call.
    pub fn dequeue_to_render(&self) -> Option<ChunkHandle> {
        let mut queues = self.queues.lock().unwrap();
        let chunk = queues.finished.pop_front()?;
        let index = chunk.get().index();
        queues.visible.insert(index, chunk.clone());
        Some(chunk)
    }

    /// Takes the next chunk to unload. The chunk leaves the visible set and
    /// its voxel and mesh payload is released, returning it to `Created`;
    /// the handle is returned so the caller can release GPU resources.
    ///
    /// Non-blocking; `None` means nothing is waiting to unload.
    pub fn dequeue_to_unload(&self) -> Option<ChunkHandle> {
        let mut queues = self.queues.lock().unwrap();
        let chunk = queues.unload.pop_front()?;
        let mut guard = chunk.get_mut();
        let index = guard.index();
        guard.clear();
        drop(guard);
        queues.visible.remove(&index);
        Some(chunk)
    }

    /// Number of chunks waiting to be generated.
    pub fn load_queue_len(&self) -> usize {
        self.queues.lock().unwrap().load.len()
    }

    /// Number of finished chunks not yet taken by the consumer.
    pub fn finished_queue_len(&self) -> usize {
        self.queues.lock().unwrap().finished.len()
    }

    /// Number of chunks waiting to be unloaded.
    pub fn unload_queue_len(&self) -> usize {
        self.queues.lock().unwrap().unload.len()
    }

    /// Number of chunks currently in the visible set.
    pub fn visible_count(&self) -> usize {
        self.queues.lock().unwrap().visible.len()
    }
}
