//! Background tasks for the rendering system.
//!
//! This module contains background tasks that handle potentially expensive
//! rendering-related operations. These tasks run on the worker pool to keep
//! the owner thread responsive.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: Relights a chunk if needed and builds its mesh

pub mod chunk_mesh_generation_task;
