//! # Terrain Module
//!
//! Procedural terrain: [`noise_field`] supplies seeded samplers,
//! [`heightmap`] turns them into a surface height per column and
//! [`terrain_filler`] turns heights into blocks.
//!
//! Generation is a pure function of the seed and the chunk position, so it
//! runs on worker threads without touching the world.

use cgmath::Point3;

use super::chunk::{GeneratedChunk, CHUNK_DIMENSION};

pub mod heightmap;
pub mod noise_field;
pub mod terrain_filler;

pub use heightmap::HeightmapGenerator;
pub use noise_field::NoiseField;

/// Everything needed to generate chunks for one world seed.
#[derive(Clone)]
pub struct TerrainGenerator {
    heightmap: HeightmapGenerator,
}

impl TerrainGenerator {
    pub fn new(seed: u64) -> Self {
        TerrainGenerator {
            heightmap: HeightmapGenerator::new(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.heightmap.seed()
    }

    pub fn heightmap(&self) -> &HeightmapGenerator {
        &self.heightmap
    }

    /// Generates the blocks and initial light of the chunk at `position`.
    pub fn generate_chunk(&self, position: Point3<i32>) -> GeneratedChunk {
        let heights = self.heightmap.generate(
            position.x * CHUNK_DIMENSION,
            position.z * CHUNK_DIMENSION,
            CHUNK_DIMENSION as usize,
        );
        terrain_filler::fill_with_foliage(position, &heights, self.heightmap.noise())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn chunks_are_reproducible() {
        let a = TerrainGenerator::new(42).generate_chunk(Point3::new(1, 0, -2));
        let b = TerrainGenerator::new(42).generate_chunk(Point3::new(1, 0, -2));
        assert_eq!(a.chunk.blocks, b.chunk.blocks);
        assert_eq!(a.sky_light, b.sky_light);
    }

    #[test]
    fn surface_matches_heightmap() {
        let generator = TerrainGenerator::new(42);
        let height = generator.heightmap().height_at(5, 7);
        let position = Point3::new(0, height.div_euclid(CHUNK_DIMENSION), 0);
        let generated = generator.generate_chunk(position);

        let local_y = height.rem_euclid(CHUNK_DIMENSION) as usize;
        let expected = if height < 0 { BlockType::STONE } else { BlockType::GRASS };
        assert_eq!(generated.chunk.get_block_at(5, local_y, 7), expected.id());
    }
}
