#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! The chunk subsystem of a voxel engine: procedural terrain, compact block
//! and light storage, skylight propagation across chunk borders, and a
//! face-culling mesh builder with baked lighting and ambient occlusion.
//!
//! ## Key Modules
//!
//! * `core` - Shared-ownership primitives, configuration and error types
//! * `engine_state` - The world, its chunks, lighting, meshing and task management
//!
//! ## Architecture
//!
//! The engine follows a modular architecture with clear separation between:
//! * Voxel data management (chunks, pooled slots, the world index)
//! * Terrain generation from layered noise
//! * Skylight propagation, coordinated between neighbouring chunks
//! * Mesh building into renderer-ready vertex and index buffers
//! * Task scheduling and execution on worker threads
//!
//! Rendering itself is left to the caller: meshes come out as flat
//! `[x, y, z, u, v, light]` vertex buffers and `u32` triangle-list indices.
//!
//! ## Usage
//!
//! ```rust,no_run
//! fn main() {
//!     voxel_world::run().unwrap();
//! }
//! ```

use cgmath::Point3;
use log::{info, warn};
use web_time::{Duration, Instant};

use crate::core::{config::WorldConfig, error::ConfigError};
use crate::engine_state::EngineState;

pub mod core;
pub mod engine_state;

/// Longest `run` waits for the initial area to finish loading.
const STARTUP_TIMEOUT: Duration = Duration::from_secs(300);

/// Loads the world around the origin and reports what was built.
///
/// Logging goes to stdout and is filtered by `RUST_LOG`. The world config is
/// read from the file named by `VOXEL_WORLD_CONFIG`, if set.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or is invalid.
pub fn run() -> Result<(), ConfigError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let config = WorldConfig::from_env()?;
    let mut engine_state = EngineState::new(&config);

    let start = Instant::now();
    engine_state.update_player_position(Point3::new(0.0, 0.0, 0.0));
    if !engine_state.run_until_idle(STARTUP_TIMEOUT) {
        warn!(
            "World still loading after {:?} ({} tasks pending)",
            STARTUP_TIMEOUT,
            engine_state.task_manager.pending_task_count()
        );
    }

    let meshes = engine_state.take_ready_meshes();
    let opaque: usize = meshes.iter().map(|m| m.opaque.quad_count()).sum();
    let water: usize = meshes.iter().map(|m| m.water.quad_count()).sum();
    let bytes: usize = meshes
        .iter()
        .flat_map(|m| [&m.opaque, &m.water])
        .map(|buffers| buffers.vertex_bytes().len() + buffers.index_bytes().len())
        .sum();
    info!(
        "Loaded {} chunks and built {} meshes ({} opaque quads, {} water quads, {} bytes) in {:?}",
        engine_state.world().get().loaded_count(),
        meshes.len(),
        opaque,
        water,
        bytes,
        start.elapsed()
    );
    Ok(())
}
