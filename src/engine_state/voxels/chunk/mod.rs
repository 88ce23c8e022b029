//! # Chunk Module
//!
//! This module provides the `Chunk` struct and related functionality for managing
//! 32x32x32 blocks of voxel data.
//!
//! ## Memory Optimization
//!
//! Block ids live in a [`ChunkBlocks`] value that is either:
//! - `Uniform(id)`: one id standing in for the whole chunk (sky, deep rock, open sea)
//! - `Dense(..)`: one byte per block, `CHUNK_SIZE` bytes in total
//!
//! Terrain generation compacts uniform results on the way out, and the first
//! write into a uniform chunk expands it again. Skylight is stored beside the
//! blocks as packed nibbles (see [`SkyLight`]).
//!
//! ## Indexing
//!
//! Blocks are laid out x-fastest, then z, then y, so one horizontal layer is a
//! contiguous `CHUNK_PLANE_SIZE` slice. The wrapped layout used by lighting and
//! meshing adds one layer of neighbour blocks on every side.

use cgmath::Point3;

use super::block::{block_type::BlockType, BlockTypeSize};

mod chunk_blocks;
pub mod chunk_creation;
mod chunk_slot;
pub mod offsets;
mod padded_chunk;
mod sky_light;

pub use chunk_blocks::ChunkBlocks;
pub use chunk_creation::{ChunkCreationIterator, GeneratedChunk};
pub use chunk_slot::ChunkSlot;
pub use padded_chunk::{is_interior, wrapped_position, Halo, PaddedChunk};
pub use sky_light::{SkyLight, MAX_SKY_LIGHT};

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 32;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;
/// The dimension of a chunk including an extra layer of blocks on each side for neighbor lookups.
pub const CHUNK_DIMENSION_WRAPPED: usize = (CHUNK_DIMENSION + 2) as usize;
/// The number of blocks in a wrapped 2D chunk plane.
pub const CHUNK_PLANE_SIZE_WRAPPED: usize = CHUNK_DIMENSION_WRAPPED * CHUNK_DIMENSION_WRAPPED;
/// The total number of blocks in a wrapped chunk.
pub const CHUNK_SIZE_WRAPPED: usize = CHUNK_PLANE_SIZE_WRAPPED * CHUNK_DIMENSION_WRAPPED;

/// Linear index of a chunk-local block position.
#[inline]
pub const fn block_index(x: usize, y: usize, z: usize) -> usize {
    x + CHUNK_DIMENSION as usize * (z + CHUNK_DIMENSION as usize * y)
}

/// Inverse of [`block_index`], returned as `(x, y, z)`.
#[inline]
pub const fn block_position(index: usize) -> (usize, usize, usize) {
    let dimension = CHUNK_DIMENSION as usize;
    (index % dimension, index / (dimension * dimension), (index / dimension) % dimension)
}

/// Linear index into a wrapped array. Each coordinate ranges over `-1..=CHUNK_DIMENSION`.
#[inline]
pub const fn wrapped_index(x: i32, y: i32, z: i32) -> usize {
    (x + 1) as usize
        + CHUNK_DIMENSION_WRAPPED * ((z + 1) as usize + CHUNK_DIMENSION_WRAPPED * (y + 1) as usize)
}

/// Splits a world block coordinate into its chunk position and chunk-local offset.
pub fn world_to_chunk(world: Point3<i32>) -> (Point3<i32>, Point3<usize>) {
    let chunk = Point3::new(
        world.x.div_euclid(CHUNK_DIMENSION),
        world.y.div_euclid(CHUNK_DIMENSION),
        world.z.div_euclid(CHUNK_DIMENSION),
    );
    let local = Point3::new(
        world.x.rem_euclid(CHUNK_DIMENSION) as usize,
        world.y.rem_euclid(CHUNK_DIMENSION) as usize,
        world.z.rem_euclid(CHUNK_DIMENSION) as usize,
    );
    (chunk, local)
}

/// Represents a 32x32x32 collection of voxel blocks in the world.
///
/// A `Chunk` is the block half of a chunk slot; skylight and relight
/// coordination live next to it in [`ChunkSlot`].
#[derive(Clone, Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,
    /// Block ids, uniform or dense.
    pub blocks: ChunkBlocks,
    /// Whether this chunk holds live data, as opposed to a pooled slot.
    pub in_use: bool,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    pub fn empty(position: &Point3<i32>) -> Self {
        Self::solid(position, BlockType::AIR)
    }

    /// Creates a new chunk filled with a single block type.
    pub fn solid(position: &Point3<i32>, block_type: BlockType) -> Self {
        Chunk {
            position: *position,
            blocks: ChunkBlocks::Uniform(block_type.id()),
            in_use: true,
        }
    }

    /// A pooled slot with no data.
    pub fn unloaded() -> Self {
        Chunk {
            position: Point3::new(0, 0, 0),
            blocks: ChunkBlocks::Cleared,
            in_use: false,
        }
    }

    /// Gets the block id at the specified chunk-relative coordinates.
    ///
    /// # Panics
    /// Panics in debug builds if the coordinates are out of bounds.
    #[inline]
    pub fn get_block_at(&self, cx: usize, cy: usize, cz: usize) -> BlockTypeSize {
        debug_assert!(Self::in_bounds(cx, cy, cz));
        self.blocks.get(block_index(cx, cy, cz))
    }

    /// Sets the block id at the specified chunk-relative coordinates.
    ///
    /// A uniform chunk is expanded to dense storage first.
    pub fn set_block_at(&mut self, cx: usize, cy: usize, cz: usize, block: BlockTypeSize) {
        debug_assert!(Self::in_bounds(cx, cy, cz));
        self.blocks.set(block_index(cx, cy, cz), block);
    }

    #[inline]
    pub fn in_bounds(cx: usize, cy: usize, cz: usize) -> bool {
        let dimension = CHUNK_DIMENSION as usize;
        cx < dimension && cy < dimension && cz < dimension
    }

    /// Clears both arrays and marks the chunk as pooled.
    pub fn unload(&mut self) {
        self.blocks = ChunkBlocks::Cleared;
        self.in_use = false;
    }
}
