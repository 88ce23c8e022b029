//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and the static
//! property table consulted by lighting and meshing.

use block_type::{BlockType, BLOCK_TYPE_COUNT};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// How a block type is turned into geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockMesh {
    /// Nothing is drawn.
    None,
    /// A unit cube with per-face culling.
    Cube,
    /// A cube merged with adjacent water and drawn in the water pass.
    Water,
    /// Two crossed, double-sided planes with no culling.
    Cross,
}

/// Static properties of a block type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockProperties {
    /// Neighbouring faces stay visible through this block.
    pub transparent: bool,
    /// Skylight cannot enter this block, and it darkens adjacent vertices.
    pub casts_shadow: bool,
    /// Direct sunlight loses one level when passing down into this block.
    pub dims_light: bool,
    pub collidable: bool,
    pub mesh: BlockMesh,
    /// Amount subtracted from a vertex light scalar per occluding block.
    pub ambient_occlusion: f32,
}

/// Property rows, indexed by block id.
pub static BLOCK_PROPERTIES: [BlockProperties; BLOCK_TYPE_COUNT] = [
    // AIR
    BlockProperties {
        transparent: true,
        casts_shadow: false,
        dims_light: false,
        collidable: false,
        mesh: BlockMesh::None,
        ambient_occlusion: 0.0,
    },
    // STONE
    BlockProperties {
        transparent: false,
        casts_shadow: true,
        dims_light: false,
        collidable: true,
        mesh: BlockMesh::Cube,
        ambient_occlusion: 0.2,
    },
    // DIRT
    BlockProperties {
        transparent: false,
        casts_shadow: true,
        dims_light: false,
        collidable: true,
        mesh: BlockMesh::Cube,
        ambient_occlusion: 0.2,
    },
    // GRASS
    BlockProperties {
        transparent: false,
        casts_shadow: true,
        dims_light: false,
        collidable: true,
        mesh: BlockMesh::Cube,
        ambient_occlusion: 0.2,
    },
    // WATER
    BlockProperties {
        transparent: true,
        casts_shadow: false,
        dims_light: true,
        collidable: false,
        mesh: BlockMesh::Water,
        ambient_occlusion: 0.1,
    },
    // TALL_GRASS
    BlockProperties {
        transparent: true,
        casts_shadow: false,
        dims_light: false,
        collidable: false,
        mesh: BlockMesh::Cross,
        ambient_occlusion: 0.0,
    },
    // LEAVES
    BlockProperties {
        transparent: true,
        casts_shadow: false,
        dims_light: true,
        collidable: true,
        mesh: BlockMesh::Cube,
        ambient_occlusion: 0.15,
    },
    // WOOD
    BlockProperties {
        transparent: false,
        casts_shadow: true,
        dims_light: false,
        collidable: true,
        mesh: BlockMesh::Cube,
        ambient_occlusion: 0.2,
    },
];

/// Maps each block type to its texture atlas cell for each face.
///
/// The outer array is indexed by block id. The inner array follows
/// `BlockSide` order: [Bottom, Back, Left, Right, Front, Top]
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [[usize; 6]; BLOCK_TYPE_COUNT] = [
    [0, 0, 0, 0, 0, 0],       // AIR (never drawn)
    [1, 1, 1, 1, 1, 1],       // STONE
    [2, 2, 2, 2, 2, 2],       // DIRT
    [2, 3, 3, 3, 3, 4],       // GRASS (bottom: dirt, sides: 3, top: 4)
    [5, 5, 5, 5, 5, 5],       // WATER
    [6, 6, 6, 6, 6, 6],       // TALL_GRASS
    [7, 7, 7, 7, 7, 7],       // LEAVES
    [9, 8, 8, 8, 8, 9],       // WOOD (rings on top and bottom)
];

/// Looks up the property row for a stored block id.
///
/// Unknown ids get the air row.
pub fn properties(block: BlockTypeSize) -> &'static BlockProperties {
    BLOCK_PROPERTIES
        .get(block as usize)
        .unwrap_or(&BLOCK_PROPERTIES[BlockType::AIR as usize])
}

/// Gets the texture indices for all faces of a block given its type as an integer.
pub fn get_texture_indices_from_int(btype_int: BlockTypeSize) -> [usize; 6] {
    let block_type = BlockType::get_block_type_from_int(btype_int);
    BLOCK_TYPE_TO_TEXTURE_INDICES[block_type as usize]
}

#[inline]
pub fn is_transparent(block: BlockTypeSize) -> bool {
    properties(block).transparent
}

#[inline]
pub fn casts_shadow(block: BlockTypeSize) -> bool {
    properties(block).casts_shadow
}

#[inline]
pub fn dims_light(block: BlockTypeSize) -> bool {
    properties(block).dims_light
}
