//! # Chunk Creation Module
//!
//! This module provides a builder that streams blocks into a new chunk in
//! index order and decides at the end whether the result can be stored as a
//! single uniform id.
//!
//! ## Memory Optimization
//!
//! The `ChunkCreationIterator` does not allocate the dense array until it sees
//! the first block that differs from the ones before it. A chunk of pure sky
//! or pure rock therefore never touches the heap for its blocks.

use cgmath::Point3;

use crate::engine_state::voxels::block::{block_type::BlockType, BlockTypeSize};

use super::{block_position, Chunk, ChunkBlocks, SkyLight, CHUNK_SIZE};

/// Output of terrain generation: the blocks plus any pre-seeded light.
#[derive(Clone, Debug)]
pub struct GeneratedChunk {
    pub chunk: Chunk,
    /// Initial light estimate. Replaced by the first relight.
    pub sky_light: SkyLight,
}

/// A builder for efficiently creating and populating chunks.
///
/// Blocks must be pushed in [`block_index`](super::block_index) order:
/// x fastest, then z, then y.
pub struct ChunkCreationIterator {
    /// The position of the chunk being created
    position: Point3<i32>,
    /// First block pushed, and how many pushes matched it so far
    first_block: Option<BlockTypeSize>,
    uniform_run: usize,
    /// Dense ids, allocated once the run of identical blocks breaks
    dense: Option<Vec<BlockTypeSize>>,
    /// Pre-seeded light, allocated on the first non-zero level
    sky_light: Option<SkyLight>,
    /// Number of blocks pushed so far
    block_offset: usize,
}

impl ChunkCreationIterator {
    /// Creates a new `ChunkCreationIterator` for building a chunk at the given position.
    pub fn new(position: Point3<i32>) -> Self {
        ChunkCreationIterator {
            position,
            first_block: None,
            uniform_run: 0,
            dense: None,
            sky_light: None,
            block_offset: 0,
        }
    }

    /// Chunk-local position of the next block to be pushed, as `(x, y, z)`.
    pub fn next_position(&self) -> (usize, usize, usize) {
        block_position(self.block_offset)
    }

    /// Adds a block at the current position and advances the position.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        self.push_block(block_type.id(), 0);
    }

    /// Adds a block with an initial skylight level.
    pub fn push_block(&mut self, block: BlockTypeSize, sky_light: u8) {
        debug_assert!(self.block_offset < CHUNK_SIZE as usize, "chunk is already full");

        match (self.first_block, self.dense.as_mut()) {
            (None, _) => {
                self.first_block = Some(block);
                self.uniform_run = 1;
            }
            (Some(_), Some(dense)) => dense.push(block),
            (Some(first), None) if first == block => self.uniform_run += 1,
            (Some(first), None) => {
                let mut dense = Vec::with_capacity(CHUNK_SIZE as usize);
                dense.resize(self.uniform_run, first);
                dense.push(block);
                self.dense = Some(dense);
            }
        }

        if sky_light > 0 {
            self.sky_light
                .get_or_insert_with(SkyLight::dark)
                .set(self.block_offset, sky_light);
        }

        self.block_offset += 1;
    }

    /// Finalizes the chunk creation and returns the constructed chunk.
    ///
    /// Positions that were never pushed read as air.
    pub fn return_chunk(self) -> GeneratedChunk {
        let blocks = match (self.first_block, self.dense) {
            (None, _) => ChunkBlocks::Uniform(BlockType::AIR.id()),
            (Some(first), None) if self.block_offset == CHUNK_SIZE as usize => {
                ChunkBlocks::Uniform(first)
            }
            (Some(first), None) => {
                let mut dense = vec![first; self.block_offset];
                dense.resize(CHUNK_SIZE as usize, BlockType::AIR.id());
                ChunkBlocks::Dense(dense.into_boxed_slice())
            }
            (Some(_), Some(mut dense)) => {
                dense.resize(CHUNK_SIZE as usize, BlockType::AIR.id());
                let mut blocks = ChunkBlocks::Dense(dense.into_boxed_slice());
                blocks.compact();
                blocks
            }
        };

        GeneratedChunk {
            chunk: Chunk {
                position: self.position,
                blocks,
                in_use: true,
            },
            sky_light: self.sky_light.unwrap_or_else(SkyLight::dark),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_blocks_never_allocate() {
        let mut cci = ChunkCreationIterator::new(Point3::new(0, -1, 0));
        for _ in 0..CHUNK_SIZE {
            cci.push_block_type(BlockType::STONE);
        }
        let generated = cci.return_chunk();

        assert_eq!(generated.chunk.blocks, ChunkBlocks::Uniform(BlockType::STONE.id()));
        assert_eq!(generated.chunk.blocks.backing_len(), 1);
    }

    #[test]
    fn mixed_blocks_keep_their_positions() {
        let mut cci = ChunkCreationIterator::new(Point3::new(0, 0, 0));
        for i in 0..CHUNK_SIZE {
            let (_, y, _) = cci.next_position();
            if y < 4 {
                cci.push_block(BlockType::STONE.id(), 0);
            } else {
                cci.push_block(BlockType::AIR.id(), 15);
            }
            assert_eq!(cci.block_offset, i as usize + 1);
        }
        let generated = cci.return_chunk();

        assert_eq!(generated.chunk.get_block_at(7, 3, 9), BlockType::STONE.id());
        assert_eq!(generated.chunk.get_block_at(7, 4, 9), BlockType::AIR.id());
        assert_eq!(generated.sky_light.get(super::super::block_index(7, 4, 9)), 15);
        assert_eq!(generated.sky_light.get(super::super::block_index(7, 3, 9)), 0);
    }
}
