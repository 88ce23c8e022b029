//! Mesh data structures for voxel rendering.
//!
//! A chunk produces two independent buffer sets: opaque geometry (including
//! alpha-tested foliage) and water, which the renderer draws in a later pass.

use cgmath::Point3;

use crate::engine_state::rendering::Vertex;

/// Index pattern for one quad: two triangles over the last four vertices.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Vertex and index data for one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// Interleaved vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle-list indices into `vertices`
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a quad from four corners wound counter-clockwise.
    ///
    /// # Arguments
    /// * `corners` - The four vertices of the quad
    ///
    /// # Note
    /// Indices are generated from [`QUAD_INDICES`], offset by the number of
    /// vertices already in the buffer.
    pub fn push_quad(&mut self, corners: [Vertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.indices
            .extend(QUAD_INDICES.iter().map(|index| base + index));
    }

    pub fn quad_count(&self) -> usize {
        self.indices.len() / QUAD_INDICES.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The vertices as `[x, y, z, u, v, light, x, ...]`.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw vertex bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Complete mesh of one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkMesh {
    /// Position of the chunk in chunk coordinates
    pub position: Point3<i32>,
    /// Cubes and cross meshes
    pub opaque: MeshBuffers,
    /// Water faces, drawn after the opaque pass
    pub water: MeshBuffers,
}

impl ChunkMesh {
    /// Creates an empty mesh for the chunk at `position`.
    pub fn new(position: Point3<i32>) -> Self {
        ChunkMesh {
            position,
            opaque: MeshBuffers::new(),
            water: MeshBuffers::new(),
        }
    }

    /// Quads over both passes.
    pub fn quad_count(&self) -> usize {
        self.opaque.quad_count() + self.water.quad_count()
    }

    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.water.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(x: f32) -> Vertex {
        Vertex::new(Point3::new(x, 0.0, 0.0), [0.0, 0.0], 1.0)
    }

    #[test]
    fn second_quad_indices_are_offset() {
        let mut buffers = MeshBuffers::new();
        buffers.push_quad([corner(0.0), corner(1.0), corner(2.0), corner(3.0)]);
        buffers.push_quad([corner(4.0), corner(5.0), corner(6.0), corner(7.0)]);

        assert_eq!(buffers.quad_count(), 2);
        assert_eq!(&buffers.indices[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(buffers.as_floats().len(), 8 * 6);
        assert_eq!(buffers.index_bytes().len(), 12 * 4);
        assert_eq!(buffers.vertex_bytes().len(), 8 * 6 * 4);
    }
}
