//! # Task Management System
//!
//! This module provides the worker pool that runs chunk generation, relighting
//! and meshing off the owner thread.
//!
//! ## Architecture Overview
//!
//! The task management system consists of several key components:
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskResult`: The result of a completed task, which can spawn additional tasks
//! - `TaskChannel`: Communication channel between the owner thread and one worker
//!
//! Each worker is a `std::thread` with a dedicated channel. Tasks are handed
//! out round-robin, at most [`MAX_TASKS_IN_FLIGHT`] per worker; anything else
//! waits in a FIFO queue.
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send back results
//! 4. Results are handled on the owner thread in `process_completed_tasks()`
//! 5. Results can publish follow-up tasks (this is how relight cascades drain)
//!
//! ## Example Usage
//! ```rust,no_run
//! use voxel_world::core::MtResource;
//! use voxel_world::core::config::WorldConfig;
//! use voxel_world::engine_state::rendering::meshing::MeshManager;
//! use voxel_world::engine_state::task_management::{task::TaskContext, TaskManager};
//! use voxel_world::engine_state::voxels::world::World;
//!
//! let config = WorldConfig::default();
//! let context = TaskContext {
//!     world: MtResource::new(World::new(&config)),
//!     mesh_manager: MtResource::new(MeshManager::new(config.mesh_cache_capacity)),
//! };
//! let mut task_manager = TaskManager::new(4, context);
//!
//! // In the owner loop:
//! task_manager.process_completed_tasks();
//! task_manager.process_queued_tasks();
//! ```

pub mod task;

use log::{debug, info, warn};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use task::{Task, TaskContext, TaskResult};

/// A communication channel between the owner thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from the owner thread to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `_worker`: Handle to the worker thread
///
/// Dropping the channel closes `task_sender`, which ends the worker loop.
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// # Fields
/// - `channels`: Set of active worker channels
/// - `queued_tasks`: Tasks waiting for an available worker
/// - `current_channel`: Index for round-robin scheduling
/// - `context`: Shared world state handed to every task result
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
    context: TaskContext,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// This is set to 1 so a long relight on one worker never delays work queued
/// behind it; the next task goes to whichever worker frees up first.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create
    /// * `context` - World and mesh cache shared with task results
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize, context: TaskContext) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for worker_idx in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::Builder::new()
                .name(format!("voxel-worker-{}", worker_idx))
                .spawn(task_closure)
                .unwrap();

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        info!(
            "Started {} task workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
            context,
        }
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the send failed (e.g., worker disconnected)
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => {
                warn!("Worker {} disconnected", channel_idx);
                Err(task.0)
            }
        }
    }

    /// Finds an available worker channel that can accept a new task.
    ///
    /// Round-robin from the last used channel; channels at
    /// [`MAX_TASKS_IN_FLIGHT`] are skipped.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let start_channel = self.current_channel;
        let mut current = start_channel;

        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                return None;
            }
        }
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks to workers until the queue is empty or every worker is busy.
    ///
    /// Tasks leave the queue in FIFO order.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Handles every result that has arrived from the workers.
    ///
    /// Must be called on the owner thread. Follow-up tasks returned by the
    /// results are published after all results have been handled.
    ///
    /// # Returns
    /// The number of results handled.
    pub fn process_completed_tasks(&mut self) -> usize {
        let mut tasks_to_queue = Vec::new();
        let mut handled = 0;
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                handled += 1;
                tasks_to_queue.extend(result.handle_result(&self.context));
            }
        }

        if !tasks_to_queue.is_empty() {
            debug!("{} follow-up tasks published", tasks_to_queue.len());
        }
        for task in tasks_to_queue {
            self.publish_task(task);
        }
        handled
    }

    /// Tasks queued or running.
    pub fn pending_task_count(&self) -> usize {
        self.queued_tasks.len()
            + self
                .channels
                .iter()
                .map(|channel| channel.num_tasks_in_flight)
                .sum::<usize>()
    }

    /// True when nothing is queued and no worker is busy.
    pub fn is_idle(&self) -> bool {
        self.pending_task_count() == 0
    }
}
