//! Face-culling mesh builder.
//!
//! Walks every block of a padded chunk and emits the faces that can be seen:
//! a face is kept when the block it looks into is transparent. Water is merged
//! with adjacent water, and foliage is drawn as crossed planes.

use bitvec::vec::BitVec;
use cgmath::Point3;
use log::trace;
use web_time::Instant;

use crate::engine_state::voxels::{
    block::{block_side::BlockSide, block_type::BlockType, is_transparent, properties, BlockMesh},
    chunk::{wrapped_index, PaddedChunk, CHUNK_DIMENSION},
};

use super::{
    face::{cross_quads, cube_face, neighbour_index, WATER_SURFACE_OFFSET},
    mesh::ChunkMesh,
};

/// Builds the opaque and water meshes of the chunk at `position`.
///
/// # Arguments
/// * `padded` - The chunk's blocks and up-to-date light, with one layer of
///   every surrounding chunk
/// * `position` - Chunk coordinates, used to place vertices in world space
///
/// # Returns
/// A `ChunkMesh`; both buffer sets may be empty.
pub fn build_mesh(padded: &PaddedChunk, position: Point3<i32>) -> ChunkMesh {
    let start = Instant::now();
    let water = BlockType::WATER.id();
    let transparent: BitVec = padded.blocks.iter().map(|&block| is_transparent(block)).collect();
    let chunk_origin = Point3::new(
        (position.x * CHUNK_DIMENSION) as f32,
        (position.y * CHUNK_DIMENSION) as f32,
        (position.z * CHUNK_DIMENSION) as f32,
    );

    let mut mesh = ChunkMesh::new(position);
    for y in 0..CHUNK_DIMENSION {
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let index = wrapped_index(x, y, z);
                let block = padded.blocks[index];
                let origin = Point3::new(
                    chunk_origin.x + x as f32,
                    chunk_origin.y + y as f32,
                    chunk_origin.z + z as f32,
                );

                match properties(block).mesh {
                    BlockMesh::None => {}
                    BlockMesh::Cube => {
                        for side in BlockSide::all() {
                            if transparent[neighbour_index(index, side)] {
                                mesh.opaque.push_quad(cube_face(padded, origin, index, side, 0.0));
                            }
                        }
                    }
                    BlockMesh::Water => {
                        for side in BlockSide::all() {
                            let facing = neighbour_index(index, side);
                            if !transparent[facing] || padded.blocks[facing] == water {
                                continue;
                            }
                            let top_offset = match side {
                                BlockSide::TOP => WATER_SURFACE_OFFSET,
                                _ => 0.0,
                            };
                            let face = cube_face(padded, origin, index, side, top_offset);
                            mesh.water.push_quad(face);
                        }
                    }
                    BlockMesh::Cross => {
                        for quad in cross_quads(padded, origin, index) {
                            mesh.opaque.push_quad(quad);
                        }
                    }
                }
            }
        }
    }

    trace!(
        "Meshed chunk {:?}: {} opaque and {} water quads in {:?}",
        position,
        mesh.opaque.quad_count(),
        mesh.water.quad_count(),
        start.elapsed()
    );
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{
        rendering::{meshing::mesh::face::MIN_LIGHT, Vertex},
        voxels::chunk::{CHUNK_SIZE_WRAPPED, MAX_SKY_LIGHT},
    };

    fn lit_air() -> PaddedChunk {
        let mut padded = PaddedChunk::new();
        padded.light = vec![MAX_SKY_LIGHT; CHUNK_SIZE_WRAPPED];
        padded
    }

    fn place(padded: &mut PaddedChunk, x: i32, y: i32, z: i32, block: BlockType) {
        padded.blocks[wrapped_index(x, y, z)] = block.id();
    }

    fn quads(vertices: &[Vertex]) -> Vec<&[Vertex]> {
        vertices.chunks(4).collect()
    }

    fn on_plane(quad: &[Vertex], axis: usize, value: f32) -> bool {
        quad.iter().all(|v| v.position[axis] == value)
    }

    #[test]
    fn single_cube_has_six_faces() {
        let mut padded = lit_air();
        place(&mut padded, 4, 4, 4, BlockType::STONE);
        let mesh = build_mesh(&padded, Point3::new(0, 0, 0));

        assert_eq!(mesh.opaque.quad_count(), 6);
        assert_eq!(mesh.opaque.vertices.len(), 24);
        assert_eq!(mesh.opaque.indices.len(), 36);
        assert!(mesh.water.is_empty());
        for vertex in &mesh.opaque.vertices {
            assert_eq!(vertex.light, 1.0);
        }
    }

    #[test]
    fn pillar_has_no_internal_faces() {
        let mut padded = lit_air();
        place(&mut padded, 5, 5, 5, BlockType::STONE);
        place(&mut padded, 5, 6, 5, BlockType::STONE);
        let mesh = build_mesh(&padded, Point3::new(0, 0, 0));

        assert_eq!(mesh.opaque.quad_count(), 10);
        let faces = quads(&mesh.opaque.vertices);
        assert!(!faces.iter().any(|quad| on_plane(quad, 1, 6.0)));
        assert!(faces.iter().any(|quad| on_plane(quad, 1, 5.0)));
        assert!(faces.iter().any(|quad| on_plane(quad, 1, 7.0)));
        for (axis, low) in [(0, 5.0), (2, 5.0)] {
            assert_eq!(faces.iter().filter(|quad| on_plane(quad, axis, low)).count(), 2);
            assert_eq!(
                faces.iter().filter(|quad| on_plane(quad, axis, low + 1.0)).count(),
                2
            );
        }
    }

    #[test]
    fn adjacent_water_is_merged() {
        let mut padded = lit_air();
        place(&mut padded, 5, 5, 5, BlockType::WATER);
        place(&mut padded, 6, 5, 5, BlockType::WATER);
        let mesh = build_mesh(&padded, Point3::new(0, 0, 0));

        assert!(mesh.opaque.is_empty());
        assert_eq!(mesh.water.quad_count(), 10);
        let faces = quads(&mesh.water.vertices);
        assert!(!faces.iter().any(|quad| on_plane(quad, 0, 6.0)));
    }

    #[test]
    fn water_pool_has_one_lowered_surface_quad() {
        let mut padded = PaddedChunk::new();
        padded.blocks = vec![BlockType::STONE.id(); CHUNK_SIZE_WRAPPED];
        for y in 3..=CHUNK_DIMENSION {
            for z in -1..=CHUNK_DIMENSION {
                for x in -1..=CHUNK_DIMENSION {
                    place(&mut padded, x, y, z, BlockType::AIR);
                }
            }
        }
        for y in 0..3 {
            place(&mut padded, 5, y, 5, BlockType::WATER);
        }
        let mesh = build_mesh(&padded, Point3::new(0, 0, 0));

        assert_eq!(mesh.water.quad_count(), 1);
        for vertex in &mesh.water.vertices {
            assert_eq!(vertex.position[1], 3.0 - WATER_SURFACE_OFFSET);
        }
        assert!(!mesh.opaque.is_empty());
    }

    #[test]
    fn cross_mesh_ignores_neighbours() {
        let mut padded = PaddedChunk::new();
        padded.blocks = vec![BlockType::STONE.id(); CHUNK_SIZE_WRAPPED];
        place(&mut padded, 7, 7, 7, BlockType::TALL_GRASS);
        let mesh = build_mesh(&padded, Point3::new(0, 0, 0));

        // The stone around the grass sees it as transparent.
        assert_eq!(mesh.opaque.quad_count(), 4 + 6);
        let diagonal = quads(&mesh.opaque.vertices)
            .into_iter()
            .filter(|quad| quad.iter().any(|v| v.position[0] != quad[0].position[0]))
            .filter(|quad| quad.iter().any(|v| v.position[2] != quad[0].position[2]))
            .filter(|quad| quad.iter().any(|v| v.position[1] != quad[0].position[1]))
            .count();
        assert_eq!(diagonal, 4);
    }

    #[test]
    fn corners_next_to_a_block_are_occluded() {
        let mut padded = lit_air();
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                place(&mut padded, x, 0, z, BlockType::STONE);
            }
        }
        place(&mut padded, 5, 1, 5, BlockType::STONE);
        let mesh = build_mesh(&padded, Point3::new(0, 0, 0));

        let top = quads(&mesh.opaque.vertices)
            .into_iter()
            .find(|quad| {
                on_plane(quad, 1, 1.0)
                    && quad.iter().all(|v| (6.0..=7.0).contains(&v.position[0]))
                    && quad.iter().all(|v| (5.0..=6.0).contains(&v.position[2]))
            })
            .expect("top face of the floor block beside the step");

        let occlusion = properties(BlockType::STONE.id()).ambient_occlusion;
        for vertex in top {
            let expected = if vertex.position[0] == 6.0 { 1.0 - occlusion } else { 1.0 };
            assert!((vertex.light - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn unlit_faces_keep_the_light_floor() {
        let mut padded = PaddedChunk::new();
        place(&mut padded, 4, 4, 4, BlockType::DIRT);
        let mesh = build_mesh(&padded, Point3::new(1, -1, 2));

        for vertex in &mesh.opaque.vertices {
            assert_eq!(vertex.light, MIN_LIGHT);
        }
        assert!(mesh
            .opaque
            .vertices
            .iter()
            .all(|v| v.position[0] >= 36.0 && v.position[1] >= -28.0 && v.position[2] >= 68.0));
    }
}
