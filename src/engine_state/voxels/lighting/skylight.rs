//! Breadth-first skylight propagation for one chunk.
//!
//! The pass works on a [`PaddedChunk`] whose halo holds the neighbours'
//! boundary blocks and light. Light flows from the halo into the chunk and
//! then spreads through every block that does not cast a shadow, losing one
//! level per step. Light entering through the top face keeps its level unless
//! a block on either side of the face dims light. Inside the chunk only full
//! sunlight travelling straight down keeps its level, which is what lets open
//! columns stay at 15.
//!
//! Halo cells are never written. When light inside the chunk would raise a
//! neighbour's boundary block, the matching entry of
//! [`RelightOutcome::neighbours_needing_relight`] is set instead and the
//! caller reschedules that neighbour.

use std::collections::VecDeque;

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, casts_shadow, dims_light, BlockTypeSize},
    chunk::{
        block_index, is_interior, offsets::WRAPPED_SIDE_OFFSETS, wrapped_index, wrapped_position,
        PaddedChunk, SkyLight, CHUNK_DIMENSION, MAX_SKY_LIGHT,
    },
};

/// Result of one relight pass.
#[derive(Debug)]
pub struct RelightOutcome {
    pub sky_light: SkyLight,
    /// Indexed by `BlockSide`: the neighbour on that side would receive more light.
    pub neighbours_needing_relight: [bool; 6],
}

/// Level a block receives from a neighbour at `level` during propagation.
///
/// `downward` is true when the source sits directly above the target.
#[inline]
fn transferred_level(
    level: u8,
    source: BlockTypeSize,
    target: BlockTypeSize,
    downward: bool,
) -> u8 {
    if downward && level == MAX_SKY_LIGHT && !dims_light(source) && !dims_light(target) {
        MAX_SKY_LIGHT
    } else {
        level.saturating_sub(1)
    }
}

/// Level a boundary block takes from the halo block across `side`.
#[inline]
fn seeded_level(side: BlockSide, level: u8, source: BlockTypeSize, target: BlockTypeSize) -> u8 {
    if side == BlockSide::TOP && !dims_light(source) && !dims_light(target) {
        level
    } else {
        level.saturating_sub(1)
    }
}

/// Recomputes the centre chunk's light from scratch.
///
/// Only `padded.blocks` and the halo part of `padded.light` are read.
pub fn propagate_sky_light(padded: &PaddedChunk) -> RelightOutcome {
    let mut light = padded.light.clone();
    let mut queue = VecDeque::new();
    let mut neighbours_needing_relight = [false; 6];

    for y in 0..CHUNK_DIMENSION {
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                light[wrapped_index(x, y, z)] = 0;
            }
        }
    }

    // Seed from the six boundary layers.
    let last = CHUNK_DIMENSION - 1;
    for side in BlockSide::all() {
        let [dx, dy, dz] = side.offset();
        for a in 0..CHUNK_DIMENSION {
            for b in 0..CHUNK_DIMENSION {
                let (x, y, z) = match side {
                    BlockSide::BOTTOM => (a, 0, b),
                    BlockSide::TOP => (a, last, b),
                    BlockSide::BACK => (a, b, 0),
                    BlockSide::FRONT => (a, b, last),
                    BlockSide::LEFT => (0, b, a),
                    BlockSide::RIGHT => (last, b, a),
                };
                let target = wrapped_index(x, y, z);
                let target_block = padded.blocks[target];
                if casts_shadow(target_block) {
                    continue;
                }
                let source = wrapped_index(x + dx, y + dy, z + dz);
                let level = seeded_level(side, light[source], padded.blocks[source], target_block);
                if level > light[target] {
                    light[target] = level;
                    queue.push_back(target);
                }
            }
        }
    }

    while let Some(index) = queue.pop_front() {
        let level = light[index];
        if level <= 1 {
            continue;
        }
        let block = padded.blocks[index];
        let (x, y, z) = wrapped_position(index);

        for side in BlockSide::all() {
            let [dx, dy, dz] = side.offset();
            let neighbour = (index as isize + WRAPPED_SIDE_OFFSETS[side as usize]) as usize;
            let neighbour_block = padded.blocks[neighbour];
            if casts_shadow(neighbour_block) {
                continue;
            }
            let next = transferred_level(level, block, neighbour_block, side == BlockSide::BOTTOM);
            if next <= light[neighbour] {
                continue;
            }
            if is_interior(x + dx, y + dy, z + dz) {
                light[neighbour] = next;
                queue.push_back(neighbour);
            } else {
                neighbours_needing_relight[side as usize] = true;
            }
        }
    }

    let mut sky_light = SkyLight::dark();
    for y in 0..CHUNK_DIMENSION {
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let level = light[wrapped_index(x, y, z)];
                if level > 0 {
                    sky_light.set(block_index(x as usize, y as usize, z as usize), level);
                }
            }
        }
    }

    RelightOutcome {
        sky_light,
        neighbours_needing_relight,
    }
}
