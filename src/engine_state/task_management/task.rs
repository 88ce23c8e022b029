//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system.
//!
//! ## Core Components
//! - `Task`: Represents a unit of work that can be executed asynchronously
//! - `TaskResult`: Represents the result of a completed task
//! - `TaskContext`: The shared state results are handled against
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the owner thread
//! 5. The result can spawn new tasks

use crate::{
    core::MtResource,
    engine_state::{rendering::meshing::MeshManager, voxels::world::World},
};

/// Shared engine state available to every task result.
#[derive(Clone)]
pub struct TaskContext {
    pub world: MtResource<World>,
    pub mesh_manager: MtResource<MeshManager>,
}

/// A trait representing a unit of work that can be executed asynchronously.
///
/// Tasks should own (or share through `MtResource`) everything they need.
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// This runs on a worker thread. Failures are reported through the
    /// returned result rather than by panicking.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// A trait representing the result of processing a `Task`.
pub trait TaskResult: Send {
    /// Handles the result of a completed task on the owner thread.
    ///
    /// # Arguments
    /// * `context`: World and mesh cache shared with the workers
    ///
    /// # Returns
    /// New tasks to schedule (can be empty).
    fn handle_result(self: Box<Self>, context: &TaskContext) -> Vec<Box<dyn Task + Send>>;
}
