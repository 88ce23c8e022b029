//! # Voxel Engine Core
//!
//! This module contains the core voxel engine functionality, providing the foundation
//! for representing, manipulating, and rendering a voxel-based world.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Defines individual voxel types, properties, and behaviors
//! * **Chunk**: Manages fixed-size 3D arrays of blocks for efficient memory use and processing
//! * **Terrain**: Produces chunks from the world seed with layered simplex noise
//! * **Lighting**: Flood-fills skylight per chunk and coordinates neighbouring relights
//! * **World**: Maps chunk positions to pooled storage slots and answers cross-chunk queries
//! * **Tasks**: Generates chunks on worker threads
//!
//! ## Performance Considerations
//!
//! * Chunks are loaded/unloaded dynamically based on player position
//! * Uniform chunks (open sky, deep rock) store a single block id
//! * Chunk slots are pooled and recycled instead of reallocated
//! * Light is computed lazily, only when a mesh is about to be built
//!
//! ## Data Flow
//!
//! 1. The world hands out a slot; terrain generation fills it
//! 2. A mesh request relights the chunk if its light is stale
//! 3. The mesh builder reads blocks and light through a padded copy
//! 4. Relights that would brighten a neighbour send that neighbour back through step 2
//!
//! ## Thread Safety
//!
//! * Each chunk's arrays sit behind their own `RwLock`s inside its slot
//! * Only relights hold more than one chunk lock at a time
//! * Neighbouring chunks never relight concurrently

pub mod block;
pub mod chunk;
pub mod lighting;
pub mod tasks;
pub mod terrain;
pub mod world;
