//! World configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. The file is JSON, found through the `VOXEL_WORLD_CONFIG`
//! environment variable.

use std::{env, fs, path::Path};

use log::info;
use serde::Deserialize;
use web_time::Duration;

use super::error::ConfigError;

/// Environment variable holding the path of the config file.
pub const CONFIG_ENV_VAR: &str = "VOXEL_WORLD_CONFIG";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed. Terrain depends on nothing else.
    pub seed: u64,
    /// Horizontal radius, in chunks, of the loaded area around the player.
    pub render_distance: u32,
    /// Lowest chunk layer that is ever loaded.
    pub min_chunk_y: i32,
    /// Highest chunk layer that is ever loaded; everything above is open sky.
    pub max_chunk_y: i32,
    /// Worker threads for generation and meshing. 0 uses the available parallelism.
    pub worker_count: usize,
    /// Longest a relight waits for busy neighbours before giving up.
    pub relight_timeout_ms: u64,
    /// Number of chunk meshes kept in the mesh cache.
    pub mesh_cache_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: 42,
            render_distance: 4,
            min_chunk_y: -2,
            max_chunk_y: 3,
            worker_count: 0,
            relight_timeout_ms: 2_000,
            mesh_cache_capacity: 1_024,
        }
    }
}

impl WorldConfig {
    /// Loads the file named by [`CONFIG_ENV_VAR`], or the defaults if it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(path),
            None => {
                info!("{} not set, using default world config", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!("Loaded world config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_chunk_y > self.max_chunk_y {
            return Err(ConfigError::Invalid(format!(
                "min_chunk_y ({}) is above max_chunk_y ({})",
                self.min_chunk_y, self.max_chunk_y
            )));
        }
        if self.relight_timeout_ms == 0 {
            return Err(ConfigError::Invalid("relight_timeout_ms must be positive".to_string()));
        }
        if self.mesh_cache_capacity == 0 {
            return Err(ConfigError::Invalid("mesh_cache_capacity must be positive".to_string()));
        }
        Ok(())
    }

    pub fn relight_timeout(&self) -> Duration {
        Duration::from_millis(self.relight_timeout_ms)
    }

    /// Number of worker threads to start.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            n => n,
        }
    }

    /// Chunk layers a column spans.
    pub fn vertical_chunks(&self) -> usize {
        (self.max_chunk_y - self.min_chunk_y + 1).max(0) as usize
    }
}
