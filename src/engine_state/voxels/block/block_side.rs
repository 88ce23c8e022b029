//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the unit offsets
//! used to step from a block to its face neighbour.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminants follow the neighbour order used by the world index:
/// -Y, -Z, -X, +X, +Z, +Y. Opposite faces therefore sum to 5.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The bottom face (facing negative Y)
    BOTTOM = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The left face (facing negative X)
    LEFT = 2,

    /// The right face (facing positive X)
    RIGHT = 3,

    /// The front face (facing positive Z)
    FRONT = 4,

    /// The top face (facing positive Y)
    TOP = 5,
}

impl BlockSide {
    /// Returns all six faces in neighbour order.
    pub const fn all() -> [BlockSide; 6] {
        [
            BlockSide::BOTTOM,
            BlockSide::BACK,
            BlockSide::LEFT,
            BlockSide::RIGHT,
            BlockSide::FRONT,
            BlockSide::TOP,
        ]
    }

    /// Unit step from a block to the neighbour behind this face.
    pub const fn offset(self) -> [i32; 3] {
        match self {
            BlockSide::BOTTOM => [0, -1, 0],
            BlockSide::BACK => [0, 0, -1],
            BlockSide::LEFT => [-1, 0, 0],
            BlockSide::RIGHT => [1, 0, 0],
            BlockSide::FRONT => [0, 0, 1],
            BlockSide::TOP => [0, 1, 0],
        }
    }

    /// Same as [`BlockSide::offset`], as a `cgmath` vector.
    pub fn normal(self) -> Vector3<i32> {
        let [x, y, z] = self.offset();
        Vector3::new(x, y, z)
    }

    /// The face pointing the other way.
    pub const fn opposite(self) -> BlockSide {
        Self::all()[5 - self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_sides_cancel_out() {
        for side in BlockSide::all() {
            assert_eq!(side.opposite().opposite(), side);
            assert_eq!(side.normal() + side.opposite().normal(), Vector3::new(0, 0, 0));
        }
    }
}
