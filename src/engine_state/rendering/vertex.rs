//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex format handed to the renderer. Vertices are
//! plain `f32` records so that a whole buffer can be viewed as `[f32]` or as
//! bytes without copying.

use cgmath::Point3;

/// Number of `f32` values in one [`Vertex`].
pub const FLOATS_PER_VERTEX: usize = 6;

/// A vertex in the voxel rendering pipeline.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Light: f32 (4 bytes)
///
/// Total size: 24 bytes, read by the renderer as `[x, y, z, u, v, light]`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Atlas texture coordinates (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
    /// Light scalar in 0.0-1.0, with ambient occlusion already applied
    pub light: f32,
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `pos` - The 3D position of the vertex in world space
    /// * `tex_coords` - Atlas UV coordinates
    /// * `light` - Light scalar for this corner
    ///
    /// # Returns
    /// A new `Vertex` instance
    pub fn new(pos: Point3<f32>, tex_coords: [f32; 2], light: f32) -> Self {
        Vertex {
            position: [pos.x, pos.y, pos.z],
            tex_coords,
            light,
        }
    }
}
