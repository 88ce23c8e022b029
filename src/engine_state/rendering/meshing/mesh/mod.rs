//! Mesh generation for voxel rendering.
//!
//! This module converts a chunk's blocks and light into renderer-ready
//! vertex and index buffers.
//!
//! # Architecture
//! - [`ChunkMesh`]: The opaque and water buffer sets of one chunk
//! - [`MeshBuffers`]: Vertices and triangle-list indices for one pass
//! - [`build_mesh`]: The face-culling builder
//! - `face`: Quad emission with light and ambient occlusion
//! - `atlas`: Atlas cell to UV mapping
//!
//! # Usage
//! ```no_run
//! use cgmath::Point3;
//! use voxel_world::engine_state::rendering::meshing::build_mesh;
//! use voxel_world::engine_state::voxels::chunk::PaddedChunk;
//!
//! let padded = PaddedChunk::new();
//! let mesh = build_mesh(&padded, Point3::new(0, 0, 0));
//! assert!(mesh.is_empty());
//! ```

pub mod atlas;
mod builder;
pub mod face;
mod mesh;

pub use builder::build_mesh;
pub use face::{MIN_LIGHT, WATER_SURFACE_OFFSET};
pub use mesh::*;
