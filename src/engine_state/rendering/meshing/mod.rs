//! Mesh generation and management for voxel rendering.
//!
//! This module owns the built chunk meshes until the renderer picks them up.
//! The key goals are:
//! 1. Keep memory bounded: meshes live in an LRU cache
//! 2. Never build the same chunk on two workers at once
//! 3. Never lose an edit that lands while a chunk is being meshed
//!
//! # Architecture
//! - `MeshManager`: Mesh cache and mesh scheduling state
//! - `mesh/`: The mesh builder and buffer types
//!
//! # Mesh Lifecycle
//! 1. `request_mesh` marks a chunk as in flight; the caller publishes a task
//! 2. The task builds a `ChunkMesh` on a worker
//! 3. `finish_mesh` clears the in-flight mark and reports whether the chunk
//!    was requested again meanwhile
//! 4. `insert_mesh` caches the mesh and queues it for the renderer
//! 5. `take_ready_meshes` hands new meshes over

use std::collections::{HashSet, VecDeque};
use std::num::NonZeroUsize;

use cgmath::Point3;
use log::debug;
use lru::LruCache;

/// Core mesh generation algorithms and data structures.
mod mesh;

// Re-export the mesh module's public interface for external use
pub use mesh::*;

/// Cached chunk meshes and mesh scheduling state.
///
/// # Fields
/// - `least_recently_meshed_chunks`: Mesh cache; the oldest mesh is evicted when full
/// - `ready`: Chunks whose mesh changed since the renderer last asked
/// - `in_flight`: Chunks with a mesh task running or queued
/// - `requested_again`: In-flight chunks that must be meshed once more
pub struct MeshManager {
    least_recently_meshed_chunks: LruCache<Point3<i32>, ChunkMesh>,
    ready: VecDeque<Point3<i32>>,
    in_flight: HashSet<Point3<i32>>,
    requested_again: HashSet<Point3<i32>>,
}

impl MeshManager {
    /// Creates a mesh manager that keeps at most `capacity` meshes.
    ///
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        MeshManager {
            least_recently_meshed_chunks: LruCache::new(capacity),
            ready: VecDeque::new(),
            in_flight: HashSet::new(),
            requested_again: HashSet::new(),
        }
    }

    /// Marks `position` as needing a mesh.
    ///
    /// # Returns
    /// `true` if the caller should publish a mesh task now. `false` if one is
    /// already in flight; that task's `finish_mesh` will ask for another.
    pub fn request_mesh(&mut self, position: Point3<i32>) -> bool {
        if self.in_flight.insert(position) {
            true
        } else {
            self.requested_again.insert(position);
            false
        }
    }

    /// Clears the in-flight mark for `position`.
    ///
    /// # Returns
    /// `true` if the chunk was requested again while its task ran. The mark
    /// is kept in that case so the caller can publish the next task directly.
    pub fn finish_mesh(&mut self, position: Point3<i32>) -> bool {
        if self.requested_again.remove(&position) {
            true
        } else {
            self.in_flight.remove(&position);
            false
        }
    }

    pub fn is_mesh_in_flight(&self, position: Point3<i32>) -> bool {
        self.in_flight.contains(&position)
    }

    /// Caches a freshly built mesh and queues it for the renderer.
    ///
    /// # Returns
    /// The chunk whose mesh was evicted to make room, if any.
    pub fn insert_mesh(&mut self, mesh: ChunkMesh) -> Option<Point3<i32>> {
        let position = mesh.position;
        self.ready.push_back(position);
        match self.least_recently_meshed_chunks.push(position, mesh) {
            Some((evicted, _)) if evicted != position => {
                debug!("Mesh cache full, evicted {:?}", evicted);
                Some(evicted)
            }
            _ => None,
        }
    }

    /// Looks up a cached mesh and marks it as recently used.
    pub fn get_mesh(&mut self, position: Point3<i32>) -> Option<&ChunkMesh> {
        self.least_recently_meshed_chunks.get(&position)
    }

    pub fn is_chunk_meshed(&self, position: Point3<i32>) -> bool {
        self.least_recently_meshed_chunks.contains(&position)
    }

    /// Drops the cached mesh of an unloaded chunk.
    pub fn remove_mesh(&mut self, position: Point3<i32>) -> Option<ChunkMesh> {
        self.requested_again.remove(&position);
        self.least_recently_meshed_chunks.pop(&position)
    }

    /// Meshes built since the last call, oldest first, one per chunk.
    ///
    /// Chunks whose mesh was evicted or removed in the meantime are skipped.
    pub fn take_ready_meshes(&mut self) -> Vec<ChunkMesh> {
        let mut seen = HashSet::new();
        let mut meshes = Vec::new();
        while let Some(position) = self.ready.pop_front() {
            if !seen.insert(position) {
                continue;
            }
            if let Some(mesh) = self.least_recently_meshed_chunks.peek(&position) {
                meshes.push(mesh.clone());
            }
        }
        meshes
    }

    /// Number of cached meshes.
    pub fn len(&self) -> usize {
        self.least_recently_meshed_chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.least_recently_meshed_chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_while_in_flight_asks_for_a_rerun() {
        let mut manager = MeshManager::new(4);
        let position = Point3::new(1, 0, 1);

        assert!(manager.request_mesh(position));
        assert!(!manager.request_mesh(position));
        assert!(manager.finish_mesh(position));
        assert!(manager.is_mesh_in_flight(position));
        assert!(!manager.finish_mesh(position));
        assert!(!manager.is_mesh_in_flight(position));
        assert!(manager.request_mesh(position));
    }

    #[test]
    fn oldest_mesh_is_evicted() {
        let mut manager = MeshManager::new(2);
        assert_eq!(manager.insert_mesh(ChunkMesh::new(Point3::new(0, 0, 0))), None);
        assert_eq!(manager.insert_mesh(ChunkMesh::new(Point3::new(1, 0, 0))), None);
        manager.get_mesh(Point3::new(0, 0, 0));
        assert_eq!(
            manager.insert_mesh(ChunkMesh::new(Point3::new(2, 0, 0))),
            Some(Point3::new(1, 0, 0))
        );
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn ready_meshes_are_deduplicated() {
        let mut manager = MeshManager::new(4);
        manager.insert_mesh(ChunkMesh::new(Point3::new(0, 0, 0)));
        manager.insert_mesh(ChunkMesh::new(Point3::new(0, 0, 0)));
        manager.insert_mesh(ChunkMesh::new(Point3::new(0, 1, 0)));
        manager.remove_mesh(Point3::new(0, 1, 0));

        let ready = manager.take_ready_meshes();
        assert_eq!(ready.len(), 1);
        assert!(manager.take_ready_meshes().is_empty());
        assert!(manager.is_chunk_meshed(Point3::new(0, 0, 0)));
    }
}
