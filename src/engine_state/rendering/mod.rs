//! Renderer-facing output of the voxel engine.
//!
//! This module turns chunks into meshes and keeps them until the renderer
//! collects them. Drawing is done by the caller; everything here is plain
//! CPU-side data in the layout the renderer uploads.

pub mod meshing;
pub mod tasks;
mod vertex;

// Re-export commonly used types
pub use meshing::MeshManager;
pub use vertex::{Vertex, FLOATS_PER_VERTEX};
