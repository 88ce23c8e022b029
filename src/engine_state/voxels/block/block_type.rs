//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification and conversion.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminant is the id stored in chunk data. `AIR` must stay 0: freshly
/// cleared storage and out-of-range queries both read as air.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Transparent, never casts shadows, never dims light.
    AIR = 0,

    /// Solid rock, the bulk of the terrain below the surface.
    STONE = 1,

    /// The layer directly under a grass surface.
    DIRT = 2,

    /// Top block of land columns.
    GRASS = 3,

    /// Sea water. Transparent, dims light, meshed in its own pass.
    WATER = 4,

    /// Foliage drawn as two crossed planes.
    TALL_GRASS = 5,

    /// Tree canopy. Transparent but dims light like water.
    LEAVES = 6,

    /// Tree trunk.
    WOOD = 7,
}

/// Number of block types, and the length of every per-type table.
pub const BLOCK_TYPE_COUNT: usize = 8;

impl BlockType {
    /// Converts a stored id back into a `BlockType`.
    ///
    /// Unknown ids read as `AIR`, the same sentinel used for unloaded space.
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Self {
        FromPrimitive::from_u8(btype).unwrap_or(BlockType::AIR)
    }

    /// The id stored in chunk data for this type.
    pub const fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }
}
