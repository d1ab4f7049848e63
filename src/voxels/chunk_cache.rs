//! # Chunk Cache
//!
//! The spatial index that owns every chunk. Lookups are by chunk index via a
//! cheap integer hash into buckets; bucket entries resolve collisions by
//! comparing true indices, never the hash alone.
//!
//! The cache is the authoritative owner of chunk storage: everything else in
//! the pipeline (queues, workers, the consumer) holds reference-counted
//! handles. The bucket map carries its own lock, independent of the transfer
//! coordinator's queue guard, so a worker finishing a chunk and the per-frame
//! scan can touch the cache concurrently.

use std::collections::HashMap;
use std::sync::Mutex;

use cgmath::{MetricSpace, Point3, Vector3};

use crate::core::MtResource;

use super::chunk::{Chunk, ChunkIndex, ChunkLayout};

/// Shared handle to a cached chunk.
pub type ChunkHandle = MtResource<Chunk>;

/// Multipliers of the chunk index hash.
const P0: u64 = 1_050_112_070_355_889;
const P1: u64 = 2_456_099_197;

/// Owns all chunks, keyed by chunk index.
pub struct ChunkCache {
    layout: ChunkLayout,
    chunks: Mutex<HashMap<i64, Vec<ChunkHandle>>>,
}

impl ChunkCache {
    /// Creates an empty cache over the given grid layout.
    pub fn new(layout: ChunkLayout) -> Self {
        Self {
            layout,
            chunks: Mutex::new(HashMap::new()),
        }
    }

    /// The grid layout the cache indexes against.
    pub fn layout(&self) -> ChunkLayout {
        self.layout
    }

    /// A cheap hash of a chunk index, used only to pick a bucket.
    fn index_hash(index: ChunkIndex) -> i64 {
        (index.x as u64)
            .wrapping_mul(P0)
            .wrapping_add(index.y as u64)
            .wrapping_mul(P1)
            .wrapping_add(index.z as u64) as i64
    }

    /// Returns the chunk at `index`, creating it empty if it does not exist.
    ///
    /// Idempotent: a second call with the same index returns a handle to the
    /// same chunk. Creation never generates data — new chunks start in the
    /// `Created` state and are filled later by a worker.
    pub fn get_or_create(&self, index: ChunkIndex) -> ChunkHandle {
        let hash = Self::index_hash(index);
        let mut chunks = self.chunks.lock().unwrap();
        let bucket = chunks.entry(hash).or_default();

        for candidate in bucket.iter() {
            if candidate.get().index() == index {
                return candidate.clone();
            }
        }

        log::trace!("creating chunk at {index:?}");
        let chunk = MtResource::new(Chunk::new(index, self.layout));
        bucket.push(chunk.clone());
        chunk
    }

    /// Returns the chunk containing a world-space position, creating it if
    /// needed.
    pub fn get_at(&self, world_position: Point3<f64>) -> ChunkHandle {
        self.get_or_create(self.layout.index_of(world_position))
    }

    /// All chunk indices whose centers lie within `max_distance` of
    /// `world_position`, ordered nearest first.
    ///
    /// The candidate set is the cube of index offsets covering the radius,
    /// filtered by true Euclidean distance from each candidate's center. The
    /// nearest-first ordering is a contract: the transfer coordinator feeds
    /// it straight into the load priority queue.
    ///
    /// # Panics
    /// Panics if `max_distance` is not strictly positive.
    pub fn indices_around(
        &self,
        world_position: Point3<f64>,
        max_distance: f64,
    ) -> Vec<ChunkIndex> {
        assert!(max_distance > 0.0, "search radius must be positive");

        let center_index = self.layout.index_of(world_position);
        let max_index_dist =
            (max_distance / self.layout.chunk_extent()).ceil() as i64;

        let mut collected: Vec<(f64, ChunkIndex)> = Vec::new();
        for z in -max_index_dist..=max_index_dist {
            for y in -max_index_dist..=max_index_dist {
                for x in -max_index_dist..=max_index_dist {
                    let candidate = center_index + Vector3::new(x, y, z);
                    let distance =
                        self.layout.center_of(candidate).distance(world_position);
                    if distance < max_distance {
                        collected.push((distance, candidate));
                    }
                }
            }
        }

        collected.sort_by(|a, b| a.0.total_cmp(&b.0));
        collected.into_iter().map(|(_, index)| index).collect()
    }

    /// Number of chunks currently held by the cache.
    pub fn len(&self) -> usize {
        self.chunks.lock().unwrap().values().map(Vec::len).sum()
    }

    /// Whether the cache holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_is_idempotent() {
        let cache = ChunkCache::new(ChunkLayout::default());
        let index = Point3::new(3, -2, 7);

        let first = cache.get_or_create(index);
        let second = cache.get_or_create(index);

        assert!(first.same_resource(&second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_indices_create_distinct_chunks() {
        let cache = ChunkCache::new(ChunkLayout::default());
        let a = cache.get_or_create(Point3::new(0, 0, 0));
        let b = cache.get_or_create(Point3::new(0, 0, 1));

        assert!(!a.same_resource(&b));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn get_at_resolves_world_positions() {
        let cache = ChunkCache::new(ChunkLayout::new(16, 1.0));
        let chunk = cache.get_at(Point3::new(17.5, 0.5, -0.5));
        assert_eq!(chunk.get().index(), Point3::new(1, 0, -1));
    }

    #[test]
    fn indices_around_is_sorted_and_filtered() {
        let cache = ChunkCache::new(ChunkLayout::new(16, 1.0));
        let observer = Point3::new(0.0, 0.0, 0.0);
        let radius = 30.0;

        let indices = cache.indices_around(observer, radius);
        assert!(!indices.is_empty());

        let layout = cache.layout();
        let mut last_distance = 0.0;
        for index in &indices {
            let distance = layout.center_of(*index).distance(observer);
            assert!(distance < radius);
            assert!(distance >= last_distance);
            last_distance = distance;
        }
    }

    #[test]
    fn indices_around_includes_the_observer_chunk_first() {
        let cache = ChunkCache::new(ChunkLayout::new(16, 1.0));
        let observer = Point3::new(8.0, 8.0, 8.0);
        let indices = cache.indices_around(observer, 20.0);
        assert_eq!(indices[0], Point3::new(0, 0, 0));
    }

    #[test]
    #[should_panic]
    fn zero_radius_is_a_contract_violation() {
        let cache = ChunkCache::new(ChunkLayout::default());
        let _ = cache.indices_around(Point3::new(0.0, 0.0, 0.0), 0.0);
    }
}
