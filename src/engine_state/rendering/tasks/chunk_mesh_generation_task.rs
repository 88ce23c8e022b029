//! Task for generating mesh data for chunks in a background thread.
//!
//! This module contains the `ChunkMeshGenerationTask`, which brings a chunk's
//! skylight up to date and then builds its mesh. Both steps can be slow, so
//! they run on a worker and only the bookkeeping happens on the owner thread.

use cgmath::Point3;
use log::{debug, warn};

use crate::{
    core::{error::ChunkError, MtResource},
    engine_state::{
        rendering::meshing::{build_mesh, ChunkMesh},
        task_management::task::{Task, TaskContext, TaskResult},
        voxels::{block::block_side::BlockSide, world::World},
    },
};

/// A task that relights and meshes one chunk in a background thread.
///
/// This task is responsible for:
/// 1. Relighting the chunk and any face neighbour with stale light
/// 2. Copying the chunk and its surroundings into a padded buffer
/// 3. Building the opaque and water meshes
pub struct ChunkMeshGenerationTask {
    /// Thread-safe reference to the world
    world: MtResource<World>,
    /// The chunk that needs mesh generation
    position: Point3<i32>,
}

impl ChunkMeshGenerationTask {
    /// Creates a new chunk mesh generation task.
    ///
    /// # Arguments
    /// * `world` - Thread-safe reference to the world
    /// * `position` - Chunk coordinates of the chunk to mesh
    ///
    /// # Returns
    /// A new `ChunkMeshGenerationTask` instance
    pub fn new(world: MtResource<World>, position: Point3<i32>) -> Self {
        ChunkMeshGenerationTask { world, position }
    }

    /// Creates a mesh task for `position` unless one is already in flight.
    ///
    /// Must be called on the owner thread. Chunks that are not loaded are
    /// skipped; they are meshed when their generation finishes.
    pub fn schedule(context: &TaskContext, position: Point3<i32>) -> Option<Box<dyn Task + Send>> {
        if !context.world.get().is_loaded(position) {
            return None;
        }
        if !context.mesh_manager.get_mut().request_mesh(position) {
            return None;
        }
        Some(Box::new(ChunkMeshGenerationTask::new(
            context.world.clone(),
            position,
        )))
    }
}

/// Relights what the mesh depends on and builds it.
///
/// Every chunk whose light was invalidated by the relights is added to
/// `invalidated`, including when the build itself fails afterwards.
fn mesh_chunk(
    world: &World,
    position: Point3<i32>,
    invalidated: &mut Vec<Point3<i32>>,
) -> Result<ChunkMesh, ChunkError> {
    invalidated.extend(world.ensure_sky_light(position)?);

    // Halo light is read from the face neighbours, so it must be current too.
    for side in BlockSide::all() {
        let Some(neighbour) = world.neighbour_chunk(position, side) else {
            continue;
        };
        if neighbour.in_use() && !neighbour.is_sky_light_up_to_date() {
            invalidated.extend(world.ensure_sky_light(neighbour.position())?);
        }
    }

    let padded = world.mesh_input(position)?;
    Ok(build_mesh(&padded, position))
}

impl Task for ChunkMeshGenerationTask {
    /// Processes the mesh generation task.
    ///
    /// Holds the world read lock for the whole build, so the chunk and its
    /// neighbours cannot be unloaded underneath it.
    ///
    /// # Returns
    /// A boxed `TaskResult` with the mesh or the reason it was deferred
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let world = self.world.get();
        let mut invalidated = Vec::new();
        let outcome = mesh_chunk(&world, self.position, &mut invalidated);
        Box::new(ChunkMeshGenerationTaskResult {
            position: self.position,
            outcome,
            invalidated,
        })
    }
}

/// The result of a chunk mesh generation task.
pub struct ChunkMeshGenerationTaskResult {
    position: Point3<i32>,
    outcome: Result<ChunkMesh, ChunkError>,
    /// Chunks whose light was marked stale while relighting
    invalidated: Vec<Point3<i32>>,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    /// Stores the mesh and schedules whatever it affected.
    ///
    /// Chunks whose light was invalidated by this task are meshed again.
    /// A relight that timed out is retried right away; a missing neighbour
    /// is retried when that neighbour's generation finishes.
    ///
    /// # Arguments
    /// * `context` - World and mesh cache shared with the workers
    ///
    /// # Returns
    /// Follow-up mesh tasks
    fn handle_result(self: Box<Self>, context: &TaskContext) -> Vec<Box<dyn Task + Send>> {
        let position = self.position;
        let mut tasks: Vec<Box<dyn Task + Send>> = Vec::new();
        let requested_again = context.mesh_manager.get_mut().finish_mesh(position);
        if requested_again {
            tasks.push(Box::new(ChunkMeshGenerationTask::new(
                context.world.clone(),
                position,
            )));
        }

        match self.outcome {
            Ok(mesh) => {
                context.mesh_manager.get_mut().insert_mesh(mesh);
            }
            Err(error @ ChunkError::NeighbourRelightTimeout { .. }) => {
                warn!("Mesh of {:?} deferred: {}", position, error);
                if !requested_again {
                    tasks.extend(ChunkMeshGenerationTask::schedule(context, position));
                }
            }
            Err(error) if error.is_retryable() => {
                debug!("Mesh of {:?} deferred: {}", position, error);
            }
            Err(error) => {
                debug!("Mesh of {:?} dropped: {}", position, error);
            }
        }

        for neighbour in self.invalidated {
            tasks.extend(ChunkMeshGenerationTask::schedule(context, neighbour));
        }
        tasks
    }
}
