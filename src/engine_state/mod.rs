//! # Engine State Module
//!
//! The core engine module that manages the state of the voxel world.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `rendering` - Mesh building and the mesh cache handed to the renderer
//! * `task_management` - Manages asynchronous tasks and worker threads
//! * `voxels` - Handles voxel data, chunks, lighting and world generation
//!
//! ## Architecture
//!
//! `EngineState` is driven from a single owner thread. It decides which
//! chunks should be loaded around the player, publishes generation and mesh
//! tasks, and applies their results. All heavy work happens on the task
//! workers; the owner thread only does bookkeeping.

use std::collections::HashSet;

use cgmath::Point3;
use log::{debug, info};
use web_time::{Duration, Instant};

use rendering::{
    meshing::{ChunkMesh, MeshManager},
    tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask,
};
use task_management::{task::TaskContext, TaskManager};
use voxels::{
    block::{block_type::BlockType, BlockTypeSize},
    chunk::world_to_chunk,
    tasks::chunk_generation_task::ChunkGenerationTask,
    world::World,
};

use crate::core::{config::WorldConfig, error::ChunkError, MtResource};

pub mod rendering;
pub mod task_management;
pub mod voxels;

/// The main state container for the voxel engine
///
/// This struct maintains references to all major subsystems and coordinates
/// their interactions.
///
/// # Examples
///
/// ```no_run
/// use cgmath::Point3;
/// use voxel_world::core::config::WorldConfig;
/// use voxel_world::engine_state::EngineState;
///
/// let mut engine_state = EngineState::new(&WorldConfig::default());
/// engine_state.update_player_position(Point3::new(0.0, 20.0, 0.0));
///
/// // Main loop
/// loop {
///     engine_state.process_tasks();
///     for mesh in engine_state.take_ready_meshes() {
///         // hand mesh.opaque and mesh.water to the renderer
///     }
/// }
/// ```
pub struct EngineState {
    /// Task manager for asynchronous operations
    pub task_manager: TaskManager,
    /// World and mesh cache, shared with the task workers
    context: TaskContext,
    /// Chunk the player is in, once known
    current_player_chunk_position: Option<Point3<i32>>,
    /// Chunks with a generation task queued or running
    requested_chunks: HashSet<Point3<i32>>,
}

impl EngineState {
    /// Creates a new engine state with all subsystems initialized
    ///
    /// # Arguments
    ///
    /// * `config` - World seed, render distance and worker settings
    ///
    /// # Returns
    ///
    /// An engine with an empty world; nothing loads until the player
    /// position is set.
    pub fn new(config: &WorldConfig) -> Self {
        let context = TaskContext {
            world: MtResource::new(World::new(config)),
            mesh_manager: MtResource::new(MeshManager::new(config.mesh_cache_capacity)),
        };
        let task_manager = TaskManager::new(config.resolved_worker_count(), context.clone());

        Self {
            task_manager,
            context,
            current_player_chunk_position: None,
            requested_chunks: HashSet::new(),
        }
    }

    pub fn world(&self) -> &MtResource<World> {
        &self.context.world
    }

    pub fn mesh_manager(&self) -> &MtResource<MeshManager> {
        &self.context.mesh_manager
    }

    /// Moves the player, loading and unloading chunks when the player
    /// crosses into another chunk.
    ///
    /// # Arguments
    ///
    /// * `position` - Player position in world block units
    pub fn update_player_position(&mut self, position: Point3<f32>) {
        let block = Point3::new(
            position.x.floor() as i32,
            position.y.floor() as i32,
            position.z.floor() as i32,
        );
        let (chunk_position, _) = world_to_chunk(block);
        if self.current_player_chunk_position == Some(chunk_position) {
            return;
        }
        debug!("Player entered chunk {:?}", chunk_position);
        self.current_player_chunk_position = Some(chunk_position);

        self.unload_out_of_range(chunk_position);
        self.load_around(chunk_position);
    }

    /// Publishes generation tasks for every missing chunk in range, nearest first.
    fn load_around(&mut self, centre: Point3<i32>) {
        let wanted = {
            let world = self.context.world.get();
            world
                .positions_around(centre)
                .into_iter()
                .filter(|p| !world.is_loaded(*p))
                .collect::<Vec<_>>()
        };

        let mut published = 0;
        for position in wanted {
            if self.requested_chunks.insert(position) {
                self.task_manager.publish_task(Box::new(ChunkGenerationTask::new(
                    self.context.world.clone(),
                    position,
                )));
                published += 1;
            }
        }
        if published > 0 {
            info!("Requested {} chunks around {:?}", published, centre);
        }
    }

    /// Unloads every chunk outside the horizontal render distance of `centre`.
    fn unload_out_of_range(&mut self, centre: Point3<i32>) {
        let mut world = self.context.world.get_mut();
        let r = world.render_distance() as i32;
        let far: Vec<_> = world
            .loaded_positions()
            .into_iter()
            .filter(|p| (p.x - centre.x).abs() > r || (p.z - centre.z).abs() > r)
            .collect();
        if far.is_empty() {
            return;
        }

        let mut mesh_manager = self.context.mesh_manager.get_mut();
        for position in &far {
            world.unload_chunk(*position);
            mesh_manager.remove_mesh(*position);
        }
        debug!("Unloaded {} chunks", far.len());
    }

    /// Processes completed and queued tasks
    ///
    /// This method should be called regularly from the owner thread.
    ///
    /// # Returns
    ///
    /// The number of task results handled.
    pub fn process_tasks(&mut self) -> usize {
        let handled = self.task_manager.process_completed_tasks();
        if handled > 0 && !self.requested_chunks.is_empty() {
            let world = self.context.world.get();
            self.requested_chunks.retain(|p| !world.is_loaded(*p));
        }
        if let Some(centre) = self.current_player_chunk_position {
            let stray = {
                let world = self.context.world.get();
                let r = world.render_distance() as i32;
                world
                    .loaded_positions()
                    .iter()
                    .any(|p| (p.x - centre.x).abs() > r || (p.z - centre.z).abs() > r)
            };
            if stray {
                self.unload_out_of_range(centre);
            }
        }
        self.task_manager.process_queued_tasks();
        handled
    }

    /// True when no task is queued or running.
    pub fn is_idle(&self) -> bool {
        self.task_manager.is_idle()
    }

    /// Processes tasks until the engine is idle or `timeout` passes.
    ///
    /// # Returns
    ///
    /// `true` if the engine went idle.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.process_tasks();
            if self.is_idle() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    /// Replaces one block and schedules the affected meshes.
    ///
    /// # Errors
    ///
    /// [`ChunkError::ChunkNotLoaded`] if the block's chunk is not loaded.
    pub fn set_block(&mut self, position: Point3<i32>, block: BlockType) -> Result<(), ChunkError> {
        let affected = self.context.world.get().set_block_at(position, block.id())?;
        for chunk in affected {
            if let Some(task) = ChunkMeshGenerationTask::schedule(&self.context, chunk) {
                self.task_manager.publish_task(task);
            }
        }
        Ok(())
    }

    /// The block at a world block coordinate.
    pub fn block_at(&self, position: Point3<i32>) -> BlockTypeSize {
        self.context.world.get().block_at(position)
    }

    /// Skylight at a world block coordinate.
    pub fn sky_light_at(&self, position: Point3<i32>) -> u8 {
        self.context.world.get().sky_light_at(position)
    }

    /// Meshes built since the last call, for upload by the renderer.
    pub fn take_ready_meshes(&mut self) -> Vec<ChunkMesh> {
        self.context.mesh_manager.get_mut().take_ready_meshes()
    }
}
