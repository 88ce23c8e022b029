//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask` which handles asynchronous
//! generation of chunk data. This task is scheduled when new chunks come into
//! range as the player moves through the world.

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::{
    core::MtResource,
    engine_state::{
        rendering::tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask,
        task_management::task::{Task, TaskContext, TaskResult},
        voxels::{block::block_side::BlockSide, chunk::GeneratedChunk, world::World},
    },
};

/// A task that generates chunk data asynchronously.
///
/// This task is responsible for:
/// 1. Generating the chunk's terrain without holding the world lock
/// 2. Adding the chunk to the world (on the owner thread)
/// 3. Scheduling mesh generation for the chunk and its neighbours
pub struct ChunkGenerationTask {
    /// A thread-safe reference to the world where the chunk will be added
    world: MtResource<World>,
    /// The position of the chunk to generate (in chunk coordinates)
    position: Point3<i32>,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `world` - A thread-safe reference to the world
    /// * `position` - The chunk coordinates where the chunk should be generated
    ///
    /// # Returns
    /// A new `ChunkGenerationTask` instance
    pub fn new(world: MtResource<World>, position: Point3<i32>) -> Self {
        ChunkGenerationTask { world, position }
    }
}

impl Task for ChunkGenerationTask {
    /// Executes the chunk generation task.
    ///
    /// Only a handle to the generator is taken under the world lock; the
    /// terrain itself is generated without it.
    ///
    /// # Returns
    /// A boxed `TaskResult` containing the generated chunk
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let generator = self.world.get().generator();
        let start = Instant::now();
        let generated = generator.generate_chunk(self.position);
        debug!(
            "Generated chunk {:?} in {:?}",
            self.position,
            start.elapsed()
        );

        Box::new(ChunkGenerationTaskResult { generated })
    }
}

/// The result of a chunk generation task.
///
/// This contains the generated chunk data and is responsible for storing it
/// and scheduling the meshes that depend on it.
pub struct ChunkGenerationTaskResult {
    generated: GeneratedChunk,
}

impl TaskResult for ChunkGenerationTaskResult {
    /// Stores the generated chunk and schedules meshing.
    ///
    /// A chunk that was loaded meanwhile is kept as is, since it may hold
    /// edits. The light of every loaded face neighbour is marked stale,
    /// because this chunk now shades or lights it, and those neighbours are
    /// meshed again along with the new chunk.
    ///
    /// # Arguments
    /// * `context` - World and mesh cache shared with the workers
    ///
    /// # Returns
    /// Mesh tasks for the chunk and its loaded face neighbours
    fn handle_result(self: Box<Self>, context: &TaskContext) -> Vec<Box<dyn Task + Send>> {
        let position = self.generated.chunk.position;
        let mut positions_to_mesh = vec![position];
        {
            let mut world = context.world.get_mut();
            if world.is_loaded(position) {
                debug!("Chunk {:?} was already loaded, discarding", position);
                return Vec::new();
            }
            world.insert_chunk(self.generated);

            for side in BlockSide::all() {
                if let Some(neighbour) = world.neighbour_chunk(position, side) {
                    neighbour.mark_sky_light_stale();
                    positions_to_mesh.push(neighbour.position());
                }
            }
        }

        positions_to_mesh
            .into_iter()
            .filter_map(|p| ChunkMeshGenerationTask::schedule(context, p))
            .collect()
    }
}
