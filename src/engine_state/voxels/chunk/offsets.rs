//! Neighbour and face-corner tables for the wrapped chunk layout.
//!
//! Everything here is computed at compile time from [`CHUNK_DIMENSION_WRAPPED`]
//! and the [`BlockSide`] unit offsets, so the tables follow the chunk size.

use crate::engine_state::voxels::block::block_side::BlockSide;

use super::{CHUNK_DIMENSION_WRAPPED, CHUNK_PLANE_SIZE_WRAPPED};

/// Flat wrapped-index step for a 3D offset.
pub const fn wrapped_step(offset: [i32; 3]) -> isize {
    offset[0] as isize
        + offset[2] as isize * CHUNK_DIMENSION_WRAPPED as isize
        + offset[1] as isize * CHUNK_PLANE_SIZE_WRAPPED as isize
}

const fn add(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

const fn scale(a: [i32; 3], s: i32) -> [i32; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

const fn cross(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

const fn dot(a: [i32; 3], b: [i32; 3]) -> i32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// The two in-plane axes `(u, v)` of a face.
pub const fn face_axes(side: BlockSide) -> ([i32; 3], [i32; 3]) {
    match side {
        BlockSide::BOTTOM | BlockSide::TOP => ([1, 0, 0], [0, 0, 1]),
        BlockSide::BACK | BlockSide::FRONT => ([1, 0, 0], [0, 1, 0]),
        BlockSide::LEFT | BlockSide::RIGHT => ([0, 0, 1], [0, 1, 0]),
    }
}

/// Face corners as `(u, v)` in {0, 1}², wound counter-clockwise seen from outside.
const fn face_corners(side: BlockSide) -> [[i32; 2]; 4] {
    let (u, v) = face_axes(side);
    if dot(cross(u, v), side.offset()) > 0 {
        [[0, 0], [1, 0], [1, 1], [0, 1]]
    } else {
        [[0, 0], [0, 1], [1, 1], [1, 0]]
    }
}

const fn side_offsets() -> [isize; 6] {
    let sides = BlockSide::all();
    let mut out = [0; 6];
    let mut i = 0;
    while i < 6 {
        out[i] = wrapped_step(sides[i].offset());
        i += 1;
    }
    out
}

const fn corner_positions() -> [[[i32; 3]; 4]; 6] {
    let sides = BlockSide::all();
    let mut out = [[[0; 3]; 4]; 6];
    let mut s = 0;
    while s < 6 {
        let side = sides[s];
        let (u, v) = face_axes(side);
        let normal = side.offset();
        // Positive faces sit on the far side of the block.
        let plane = if dot(normal, [1, 1, 1]) > 0 { normal } else { [0, 0, 0] };
        let corners = face_corners(side);
        let mut c = 0;
        while c < 4 {
            out[s][c] = add(plane, add(scale(u, corners[c][0]), scale(v, corners[c][1])));
            c += 1;
        }
        s += 1;
    }
    out
}

const fn corner_occluders() -> [[[isize; 3]; 4]; 6] {
    let sides = BlockSide::all();
    let mut out = [[[0; 3]; 4]; 6];
    let mut s = 0;
    while s < 6 {
        let side = sides[s];
        let (u, v) = face_axes(side);
        let corners = face_corners(side);
        let mut c = 0;
        while c < 4 {
            let su = scale(u, corners[c][0] * 2 - 1);
            let sv = scale(v, corners[c][1] * 2 - 1);
            out[s][c] = [wrapped_step(su), wrapped_step(sv), wrapped_step(add(su, sv))];
            c += 1;
        }
        s += 1;
    }
    out
}

const fn neighbour_offsets() -> [[i32; 3]; 26] {
    let mut out = [[0; 3]; 26];
    let mut n = 0;
    let mut i = 0;
    while i < 27 {
        let offset = [i % 3 - 1, i / 9 - 1, (i / 3) % 3 - 1];
        if offset[0] != 0 || offset[1] != 0 || offset[2] != 0 {
            out[n] = offset;
            n += 1;
        }
        i += 1;
    }
    out
}

/// Wrapped-index step to the face neighbour, in `BlockSide` order.
pub const WRAPPED_SIDE_OFFSETS: [isize; 6] = side_offsets();

/// Chunk offsets of the six face neighbours, in `BlockSide` order.
pub const FACE_NEIGHBOUR_OFFSETS: [[i32; 3]; 6] = {
    let sides = BlockSide::all();
    let mut out = [[0; 3]; 6];
    let mut s = 0;
    while s < 6 {
        out[s] = sides[s].offset();
        s += 1;
    }
    out
};

/// Chunk offsets of all 26 surrounding chunks (faces, edges and corners).
pub const NEIGHBOUR_OFFSETS: [[i32; 3]; 26] = neighbour_offsets();

/// `(u, v)` of each emitted corner, in `BlockSide` order. Used for texture coordinates.
pub const FACE_CORNER_UVS: [[[i32; 2]; 4]; 6] = {
    let sides = BlockSide::all();
    let mut out = [[[0; 2]; 4]; 6];
    let mut s = 0;
    while s < 6 {
        out[s] = face_corners(sides[s]);
        s += 1;
    }
    out
};

/// Corner positions relative to the block origin, in `BlockSide` order.
pub const FACE_CORNER_POSITIONS: [[[i32; 3]; 4]; 6] = corner_positions();

/// For each face corner, the three blocks around the face neighbour that can
/// darken it: the two edge blocks and the diagonal one. Steps are relative to
/// the face neighbour's wrapped index. Together they cover its 8 in-plane
/// neighbours.
pub const FACE_CORNER_OCCLUDERS: [[[isize; 3]; 4]; 6] = corner_occluders();

#[cfg(test)]
mod tests {
    use super::super::wrapped_index;
    use super::*;

    #[test]
    fn side_offsets_match_wrapped_index() {
        let origin = wrapped_index(5, 6, 7) as isize;
        for side in BlockSide::all() {
            let [dx, dy, dz] = side.offset();
            let expected = wrapped_index(5 + dx, 6 + dy, 7 + dz) as isize;
            assert_eq!(origin + WRAPPED_SIDE_OFFSETS[side as usize], expected);
        }
    }

    #[test]
    fn top_face_corners_sit_on_the_upper_plane() {
        for corner in FACE_CORNER_POSITIONS[BlockSide::TOP as usize] {
            assert_eq!(corner[1], 1);
        }
        for corner in FACE_CORNER_POSITIONS[BlockSide::BOTTOM as usize] {
            assert_eq!(corner[1], 0);
        }
    }

    #[test]
    fn neighbour_offsets_are_unique_and_include_faces() {
        let mut offsets = NEIGHBOUR_OFFSETS.to_vec();
        offsets.sort_unstable();
        offsets.dedup();
        assert_eq!(offsets.len(), 26);
        for face in FACE_NEIGHBOUR_OFFSETS {
            assert!(offsets.contains(&face));
        }
    }

    #[test]
    fn corner_occluders_cover_the_ring() {
        for side in BlockSide::all() {
            let mut steps: Vec<isize> = FACE_CORNER_OCCLUDERS[side as usize]
                .iter()
                .flatten()
                .copied()
                .collect();
            steps.sort_unstable();
            steps.dedup();
            assert_eq!(steps.len(), 8);
            assert!(!steps.contains(&0));
        }
    }
}
