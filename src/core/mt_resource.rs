use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` provides synchronized access to a value of type `T` that can be
/// shared across threads. It wraps an `Arc<RwLock<T>>`: cloning the container
/// clones the handle, not the value, so the chunk cache can keep authoritative
/// ownership of every chunk while the transfer queues and workers hold cheap
/// aliases.
///
/// # Examples
///
/// ```
/// use voxelstream::core::MtResource;
///
/// let counter = MtResource::new(0);
///
/// *counter.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
/// ```
///
/// # Locking
///
/// - `get()` takes the read lock; reads may proceed concurrently
/// - `get_mut()` takes the write lock and is exclusive
///
/// Callers must keep the guarded sections short. The pipeline's workers build
/// chunk payloads into local buffers and only lock to install the result.
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard for the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Returns a mutable guard for the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }

    /// Whether two handles alias the same underlying resource.
    ///
    /// The chunk cache's idempotency contract is expressed in terms of this
    /// identity: looking up the same index twice yields handles for which
    /// `same_resource` is true.
    pub fn same_resource(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resource, &other.resource)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
