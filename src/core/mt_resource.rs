use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared, reference-counted value behind a read-write lock.
///
/// `MtResource` is how long-lived engine state (the [`World`], the mesh cache)
/// is handed to worker threads. Tasks clone the handle, take a read guard for
/// the bulk of their work and only escalate to a write guard for short
/// structural changes such as loading or unloading a chunk.
///
/// # Examples
///
/// ```
/// use voxel_world::core::MtResource;
///
/// let counter = MtResource::new(0);
/// let worker_copy = counter.clone();
///
/// std::thread::spawn(move || {
///     *worker_copy.get_mut() += 1;
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(*counter.get(), 1);
/// ```
///
/// # Locking Rules
/// - Any number of `get()` guards may be alive at once
/// - `get_mut()` waits for every reader to finish, so never hold a read guard
///   while asking for a write guard on the same resource
///
/// [`World`]: crate::engine_state::voxels::world::World
pub struct MtResource<T: Send + Sync> {
    pub resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Wraps `resource` in a new shared handle.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read guard for the contained value.
    ///
    /// # Panics
    /// Panics if a writer panicked while holding the lock.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Returns a write guard for the contained value.
    ///
    /// # Panics
    /// Panics if another holder panicked while holding the lock.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }

    /// Returns true if both handles point at the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_value() {
        let a = MtResource::new(vec![1, 2, 3]);
        let b = a.clone();
        b.get_mut().push(4);

        assert!(a.ptr_eq(&b));
        assert_eq!(a.get().len(), 4);
    }
}
