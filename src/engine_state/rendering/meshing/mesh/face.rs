//! Quad emission for single block faces.
//!
//! Every function here reads from a [`PaddedChunk`], so a face on the chunk
//! border samples its neighbour's blocks and light through the halo exactly
//! like an interior face.

use cgmath::Point3;

use crate::engine_state::{
    rendering::Vertex,
    voxels::{
        block::{
            block_side::BlockSide, casts_shadow, get_texture_indices_from_int, properties,
            BlockTypeSize,
        },
        chunk::{
            offsets::{
                FACE_CORNER_OCCLUDERS, FACE_CORNER_POSITIONS, FACE_CORNER_UVS,
                WRAPPED_SIDE_OFFSETS,
            },
            PaddedChunk, MAX_SKY_LIGHT,
        },
    },
};

use super::atlas::corner_uv;

/// Lowest light scalar a lit face is given, so unlit caves are not pure black.
pub const MIN_LIGHT: f32 = 0.08;

/// How far an exposed water surface sits below the top of its block.
pub const WATER_SURFACE_OFFSET: f32 = 0.125;

/// The two crossed planes of a cross mesh, wound counter-clockwise.
const CROSS_PLANES: [[[f32; 3]; 4]; 2] = [
    [[0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
];

const CROSS_CORNER_UVS: [[i32; 2]; 4] = [[0, 0], [1, 0], [1, 1], [0, 1]];

/// Converts a skylight level into a vertex light scalar.
#[inline]
pub fn light_scalar(level: u8) -> f32 {
    (level as f32 / MAX_SKY_LIGHT as f32).max(MIN_LIGHT)
}

/// Wrapped index of the block across `side`.
#[inline]
pub fn neighbour_index(index: usize, side: BlockSide) -> usize {
    (index as isize + WRAPPED_SIDE_OFFSETS[side as usize]) as usize
}

/// Builds the quad for one face of a cube-shaped block.
///
/// # Arguments
/// * `padded` - Blocks and light around the chunk being meshed
/// * `origin` - World position of the block's minimum corner
/// * `index` - Wrapped index of the block
/// * `side` - Which face to build
/// * `top_offset` - How far corners on the block's upper plane are lowered
///
/// # Returns
/// Four vertices, counter-clockwise seen from outside. The light comes from
/// the cell the face looks into; each corner loses the block's ambient
/// occlusion factor once for every shadow-casting block touching it.
pub fn cube_face(
    padded: &PaddedChunk,
    origin: Point3<f32>,
    index: usize,
    side: BlockSide,
    top_offset: f32,
) -> [Vertex; 4] {
    let block = padded.blocks[index];
    let facing = neighbour_index(index, side);
    let light = light_scalar(padded.light[facing]);
    let occlusion = properties(block).ambient_occlusion;
    let texture = get_texture_indices_from_int(block)[side as usize];

    let s = side as usize;
    std::array::from_fn(|c| {
        let occluders = FACE_CORNER_OCCLUDERS[s][c]
            .iter()
            .filter(|&&step| casts_shadow(padded.blocks[(facing as isize + step) as usize]))
            .count();
        let [x, y, z] = FACE_CORNER_POSITIONS[s][c];
        let lowered = if y == 1 { top_offset } else { 0.0 };
        Vertex::new(
            Point3::new(
                origin.x + x as f32,
                origin.y + y as f32 - lowered,
                origin.z + z as f32,
            ),
            corner_uv(texture, FACE_CORNER_UVS[s][c]),
            (light - occlusion * occluders as f32).max(0.0),
        )
    })
}

/// Builds the four quads of a cross mesh: two diagonal planes, each drawn
/// from both sides. Lit by the block's own cell, with no occlusion.
pub fn cross_quads(padded: &PaddedChunk, origin: Point3<f32>, index: usize) -> [[Vertex; 4]; 4] {
    let block: BlockTypeSize = padded.blocks[index];
    let light = light_scalar(padded.light[index]);
    let texture = get_texture_indices_from_int(block)[BlockSide::FRONT as usize];

    let plane = |p: usize| -> [Vertex; 4] {
        std::array::from_fn(|c| {
            let [x, y, z] = CROSS_PLANES[p][c];
            Vertex::new(
                Point3::new(origin.x + x, origin.y + y, origin.z + z),
                corner_uv(texture, CROSS_CORNER_UVS[c]),
                light,
            )
        })
    };
    let reversed = |mut quad: [Vertex; 4]| {
        quad.reverse();
        quad
    };

    [plane(0), reversed(plane(0)), plane(1), reversed(plane(1))]
}
