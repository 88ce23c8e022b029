use crate::engine_state::voxels::block::{block_type::BlockType, BlockTypeSize};

use super::CHUNK_SIZE;

/// Block storage for one chunk.
///
/// Reads never care which variant is active. Writes expand `Uniform` (and
/// `Cleared`) into `Dense`; [`ChunkBlocks::compact`] folds a dense array back
/// when it turns out to hold a single id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChunkBlocks {
    /// Storage released by an unload. Reads return air.
    Cleared,
    /// Every block in the chunk has this id.
    Uniform(BlockTypeSize),
    /// One id per block, `CHUNK_SIZE` entries.
    Dense(Box<[BlockTypeSize]>),
}

impl ChunkBlocks {
    #[inline]
    pub fn get(&self, index: usize) -> BlockTypeSize {
        match self {
            ChunkBlocks::Cleared => BlockType::AIR.id(),
            ChunkBlocks::Uniform(block) => *block,
            ChunkBlocks::Dense(blocks) => blocks[index],
        }
    }

    pub fn set(&mut self, index: usize, block: BlockTypeSize) {
        if let ChunkBlocks::Uniform(current) = self {
            if *current == block {
                return;
            }
        }
        let blocks = self.make_dense();
        blocks[index] = block;
    }

    /// Expands to dense storage if necessary and returns the array.
    pub fn make_dense(&mut self) -> &mut [BlockTypeSize] {
        let fill = match self {
            ChunkBlocks::Dense(_) => None,
            ChunkBlocks::Uniform(block) => Some(*block),
            ChunkBlocks::Cleared => Some(BlockType::AIR.id()),
        };
        if let Some(block) = fill {
            *self = ChunkBlocks::Dense(vec![block; CHUNK_SIZE as usize].into_boxed_slice());
        }
        match self {
            ChunkBlocks::Dense(blocks) => blocks,
            _ => unreachable!("storage was expanded above"),
        }
    }

    /// Folds a dense array holding one id into `Uniform`. Returns true if it did.
    pub fn compact(&mut self) -> bool {
        let uniform = match self {
            ChunkBlocks::Dense(blocks) => {
                let first = blocks[0];
                blocks.iter().all(|&b| b == first).then_some(first)
            }
            _ => None,
        };
        match uniform {
            Some(block) => {
                *self = ChunkBlocks::Uniform(block);
                true
            }
            None => false,
        }
    }

    pub fn uniform_block(&self) -> Option<BlockTypeSize> {
        match self {
            ChunkBlocks::Uniform(block) => Some(*block),
            _ => None,
        }
    }

    #[inline]
    pub fn is_uniform(&self) -> bool {
        matches!(self, ChunkBlocks::Uniform(_))
    }

    /// Number of ids actually stored.
    pub fn backing_len(&self) -> usize {
        match self {
            ChunkBlocks::Cleared => 0,
            ChunkBlocks::Uniform(_) => 1,
            ChunkBlocks::Dense(blocks) => blocks.len(),
        }
    }
}
