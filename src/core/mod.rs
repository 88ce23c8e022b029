//! # Core Module
//!
//! Shared-ownership primitives used across the engine.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//! - `config`: `WorldConfig`, loaded from JSON
//! - `error`: `ChunkError` and `ConfigError`
//!
//! ## Usage
//! ```rust
//! use voxel_world::core::MtResource;
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//! ```

pub mod config;
pub mod error;
pub mod mt_resource;

pub use mt_resource::MtResource;
