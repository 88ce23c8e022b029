//! Turns a column heightmap into a chunk of blocks.

use cgmath::Point3;

use crate::engine_state::voxels::{
    block::block_type::BlockType,
    chunk::{ChunkCreationIterator, GeneratedChunk, CHUNK_DIMENSION, MAX_SKY_LIGHT},
};

use super::noise_field::NoiseField;

/// World height of the water surface. Columns below it are flooded up to here.
pub const SEA_LEVEL: i32 = 0;
/// Number of dirt blocks between a grass surface and the stone below it.
pub const DIRT_DEPTH: i32 = 3;
/// Probability that a grass column carries tall grass.
pub const TALL_GRASS_CHANCE: f64 = 0.08;
const TALL_GRASS_SALT: u64 = 0x7A11_6A55;

/// Chooses the block at world height `y` of a column whose surface is at `height`.
///
/// # Returns
/// The block and its initial skylight estimate.
pub fn block_for_column(y: i32, height: i32, tall_grass: bool) -> (BlockType, u8) {
    if y > height {
        if y <= SEA_LEVEL {
            // Each block of water above dims the light by one.
            let depth_light =
                (MAX_SKY_LIGHT as i32 - 1 + y - SEA_LEVEL).clamp(0, MAX_SKY_LIGHT as i32);
            (BlockType::WATER, depth_light as u8)
        } else if tall_grass && y == height + 1 && height >= SEA_LEVEL {
            (BlockType::TALL_GRASS, 0)
        } else {
            (BlockType::AIR, 0)
        }
    } else if y == height {
        if height < SEA_LEVEL {
            (BlockType::STONE, 0)
        } else {
            (BlockType::GRASS, 0)
        }
    } else if height >= SEA_LEVEL && y >= height - DIRT_DEPTH {
        (BlockType::DIRT, 0)
    } else {
        (BlockType::STONE, 0)
    }
}

/// Fills the chunk at `position` from a `CHUNK_DIMENSION`² heightmap indexed `x + z * N`.
///
/// Pure: the result depends only on the position and the heights.
pub fn fill(position: Point3<i32>, heightmap: &[i32]) -> GeneratedChunk {
    fill_columns(position, heightmap, |_, _| false)
}

/// Like [`fill`], also scattering tall grass over grass columns using `noise`.
pub fn fill_with_foliage(
    position: Point3<i32>,
    heightmap: &[i32],
    noise: &NoiseField,
) -> GeneratedChunk {
    fill_columns(position, heightmap, |x, z| {
        noise.chance(x, z, TALL_GRASS_SALT, TALL_GRASS_CHANCE)
    })
}

fn fill_columns(
    position: Point3<i32>,
    heightmap: &[i32],
    tall_grass: impl Fn(i32, i32) -> bool,
) -> GeneratedChunk {
    let dimension = CHUNK_DIMENSION as usize;
    debug_assert_eq!(heightmap.len(), dimension * dimension);

    let origin = position * CHUNK_DIMENSION;
    let column_grass: Vec<bool> = (0..dimension * dimension)
        .map(|i| {
            let (x, z) = ((i % dimension) as i32, (i / dimension) as i32);
            heightmap[i] >= SEA_LEVEL && tall_grass(origin.x + x, origin.z + z)
        })
        .collect();

    let mut cci = ChunkCreationIterator::new(position);
    for _ in 0..dimension * dimension * dimension {
        let (x, y, z) = cci.next_position();
        let column = x + z * dimension;
        let (block, light) =
            block_for_column(origin.y + y as i32, heightmap[column], column_grass[column]);
        cci.push_block(block.id(), light);
    }
    cci.return_chunk()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::{ChunkBlocks, CHUNK_PLANE_SIZE};

    fn flat(height: i32) -> Vec<i32> {
        vec![height; CHUNK_PLANE_SIZE as usize]
    }

    #[test]
    fn height_ten_column() {
        let generated = fill(Point3::new(0, 0, 0), &flat(10));
        let chunk = &generated.chunk;

        assert_eq!(chunk.get_block_at(0, 10, 0), BlockType::GRASS.id());
        assert_eq!(chunk.get_block_at(0, 5, 0), BlockType::STONE.id());
        assert_eq!(chunk.get_block_at(0, 15, 0), BlockType::AIR.id());
        assert_eq!(chunk.get_block_at(0, 8, 0), BlockType::DIRT.id());
    }

    #[test]
    fn sky_and_bedrock_chunks_are_compacted() {
        let sky = fill(Point3::new(0, 2, 0), &flat(10));
        assert_eq!(sky.chunk.blocks, ChunkBlocks::Uniform(BlockType::AIR.id()));

        let rock = fill(Point3::new(0, -3, 0), &flat(10));
        assert_eq!(rock.chunk.blocks, ChunkBlocks::Uniform(BlockType::STONE.id()));
        assert_eq!(rock.chunk.blocks.backing_len(), 1);
    }

    #[test]
    fn flooded_columns_have_stone_floor_and_seeded_light() {
        let generated = fill(Point3::new(0, -1, 0), &flat(-6));
        let chunk = &generated.chunk;

        // Local y 26 is world y -6.
        assert_eq!(chunk.get_block_at(4, 26, 4), BlockType::STONE.id());
        assert_eq!(chunk.get_block_at(4, 27, 4), BlockType::WATER.id());
        assert_eq!(chunk.get_block_at(4, 31, 4), BlockType::WATER.id());

        let light = |y| {
            generated
                .sky_light
                .get(crate::engine_state::voxels::chunk::block_index(4, y, 4))
        };
        assert_eq!(light(31), MAX_SKY_LIGHT - 2);
        assert_eq!(light(27), MAX_SKY_LIGHT - 6);
    }

    #[test]
    fn tall_grass_sits_on_grass() {
        let noise = NoiseField::new(42);
        let generated = fill_with_foliage(Point3::new(0, 0, 0), &flat(3), &noise);
        let chunk = &generated.chunk;

        let mut found = 0;
        for z in 0..CHUNK_DIMENSION as usize {
            for x in 0..CHUNK_DIMENSION as usize {
                if chunk.get_block_at(x, 4, z) == BlockType::TALL_GRASS.id() {
                    assert_eq!(chunk.get_block_at(x, 3, z), BlockType::GRASS.id());
                    found += 1;
                }
            }
        }
        assert!(found > 0);
        assert_eq!(found, {
            let again = fill_with_foliage(Point3::new(0, 0, 0), &flat(3), &noise);
            (0..CHUNK_PLANE_SIZE as usize)
                .filter(|i| {
                    let (x, z) = (i % 32, i / 32);
                    again.chunk.get_block_at(x, 4, z) == BlockType::TALL_GRASS.id()
                })
                .count()
        });
    }
}
