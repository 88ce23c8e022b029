use std::ops::Range;
use std::sync::Arc;

use crate::engine_state::voxels::block::{block_type::BlockType, BlockTypeSize};

use super::{
    block_index, wrapped_index, Chunk, ChunkSlot, SkyLight, CHUNK_DIMENSION,
    CHUNK_DIMENSION_WRAPPED, CHUNK_PLANE_SIZE_WRAPPED, CHUNK_SIZE_WRAPPED, MAX_SKY_LIGHT,
};

/// What fills one halo region of a [`PaddedChunk`].
pub enum Halo {
    /// A loaded neighbour; its boundary blocks and light are copied.
    Chunk(Arc<ChunkSlot>),
    /// Open sky above the world: air at full light.
    Sky,
    /// Anything else: air without light.
    Void,
}

/// A chunk's blocks and light with one extra layer copied in from every
/// surrounding chunk.
///
/// Both arrays use [`wrapped_index`]. Lighting and meshing read through this
/// copy so that uniform chunks, dense chunks and cross-chunk neighbours all
/// share one indexing scheme, and no chunk is touched after the copy is taken.
#[derive(Clone)]
pub struct PaddedChunk {
    pub blocks: Vec<BlockTypeSize>,
    pub light: Vec<u8>,
}

/// Padded coordinates covered by the halo along one axis for a neighbour
/// offset of -1, 0 or 1 on that axis.
fn halo_range(offset: i32) -> Range<i32> {
    match offset {
        -1 => -1..0,
        0 => 0..CHUNK_DIMENSION,
        _ => CHUNK_DIMENSION..CHUNK_DIMENSION + 1,
    }
}

/// Position within the neighbour that a padded coordinate maps to.
#[inline]
fn source_coordinate(coordinate: i32) -> usize {
    coordinate.rem_euclid(CHUNK_DIMENSION) as usize
}

/// Inverse of [`wrapped_index`].
#[inline]
pub const fn wrapped_position(index: usize) -> (i32, i32, i32) {
    let x = (index % CHUNK_DIMENSION_WRAPPED) as i32 - 1;
    let z = ((index / CHUNK_DIMENSION_WRAPPED) % CHUNK_DIMENSION_WRAPPED) as i32 - 1;
    let y = (index / CHUNK_PLANE_SIZE_WRAPPED) as i32 - 1;
    (x, y, z)
}

/// True if the padded coordinates lie inside the centre chunk.
#[inline]
pub const fn is_interior(x: i32, y: i32, z: i32) -> bool {
    x >= 0 && x < CHUNK_DIMENSION && y >= 0 && y < CHUNK_DIMENSION && z >= 0 && z < CHUNK_DIMENSION
}

impl PaddedChunk {
    /// Everything air and dark.
    pub fn new() -> Self {
        PaddedChunk {
            blocks: vec![BlockType::AIR.id(); CHUNK_SIZE_WRAPPED],
            light: vec![0; CHUNK_SIZE_WRAPPED],
        }
    }

    /// Copies `centre` (and its light, if given) into the interior and fills
    /// the halo regions named by `offsets` through `halo`.
    pub fn gather(
        centre: &Chunk,
        centre_light: Option<&SkyLight>,
        offsets: &[[i32; 3]],
        halo: impl FnMut([i32; 3]) -> Halo,
    ) -> Self {
        let mut padded = Self::from_centre(centre, centre_light);
        padded.fill_halos(offsets, halo);
        padded
    }

    /// Interior copied from `centre`, halo air and dark.
    pub fn from_centre(centre: &Chunk, centre_light: Option<&SkyLight>) -> Self {
        let mut padded = Self::new();
        padded.copy_interior(centre, centre_light);
        padded
    }

    /// Fills the halo regions named by `offsets`.
    ///
    /// Neighbour guards are taken one at a time and released before the next.
    pub fn fill_halos(&mut self, offsets: &[[i32; 3]], mut halo: impl FnMut([i32; 3]) -> Halo) {
        for &offset in offsets {
            match halo(offset) {
                Halo::Chunk(slot) => {
                    let blocks = slot.chunk();
                    self.copy_halo_blocks(offset, &blocks);
                    drop(blocks);
                    let light = slot.sky_light();
                    self.copy_halo_light(offset, &light);
                }
                Halo::Sky => self.fill_halo(offset, BlockType::AIR.id(), MAX_SKY_LIGHT),
                Halo::Void => self.fill_halo(offset, BlockType::AIR.id(), 0),
            }
        }
    }

    #[inline]
    pub fn block(&self, x: i32, y: i32, z: i32) -> BlockTypeSize {
        self.blocks[wrapped_index(x, y, z)]
    }

    #[inline]
    pub fn light_at(&self, x: i32, y: i32, z: i32) -> u8 {
        self.light[wrapped_index(x, y, z)]
    }

    fn copy_interior(&mut self, chunk: &Chunk, light: Option<&SkyLight>) {
        let uniform = chunk.blocks.uniform_block();
        for y in 0..CHUNK_DIMENSION as usize {
            for z in 0..CHUNK_DIMENSION as usize {
                for x in 0..CHUNK_DIMENSION as usize {
                    let to = wrapped_index(x as i32, y as i32, z as i32);
                    let from = block_index(x, y, z);
                    self.blocks[to] = match uniform {
                        Some(block) => block,
                        None => chunk.blocks.get(from),
                    };
                    if let Some(light) = light {
                        self.light[to] = light.get(from);
                    }
                }
            }
        }
    }

    fn for_each_halo_cell(offset: [i32; 3], mut f: impl FnMut(usize, usize)) {
        for y in halo_range(offset[1]) {
            for z in halo_range(offset[2]) {
                for x in halo_range(offset[0]) {
                    let source = block_index(
                        source_coordinate(x),
                        source_coordinate(y),
                        source_coordinate(z),
                    );
                    f(wrapped_index(x, y, z), source);
                }
            }
        }
    }

    fn copy_halo_blocks(&mut self, offset: [i32; 3], chunk: &Chunk) {
        if !chunk.in_use {
            self.fill_halo(offset, BlockType::AIR.id(), 0);
            return;
        }
        let blocks = &mut self.blocks;
        Self::for_each_halo_cell(offset, |to, from| blocks[to] = chunk.blocks.get(from));
    }

    fn copy_halo_light(&mut self, offset: [i32; 3], light: &SkyLight) {
        let out = &mut self.light;
        Self::for_each_halo_cell(offset, |to, from| out[to] = light.get(from));
    }

    fn fill_halo(&mut self, offset: [i32; 3], block: BlockTypeSize, level: u8) {
        let (blocks, light) = (&mut self.blocks, &mut self.light);
        Self::for_each_halo_cell(offset, |to, _| {
            blocks[to] = block;
            light[to] = level;
        });
    }
}

impl Default for PaddedChunk {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::engine_state::voxels::chunk::{offsets::NEIGHBOUR_OFFSETS, GeneratedChunk};

    #[test]
    fn wrapped_position_inverts_wrapped_index() {
        for &(x, y, z) in &[(-1, -1, -1), (0, 0, 0), (32, 5, -1), (7, 32, 31)] {
            assert_eq!(wrapped_position(wrapped_index(x, y, z)), (x, y, z));
        }
    }

    #[test]
    fn halo_comes_from_the_facing_layer() {
        let mut east = Chunk::empty(&Point3::new(1, 0, 0));
        east.set_block_at(0, 4, 9, BlockType::STONE.id());
        east.set_block_at(1, 4, 9, BlockType::DIRT.id());
        let east = Arc::new(ChunkSlot::with_chunk(GeneratedChunk {
            chunk: east,
            sky_light: SkyLight::dark(),
        }));

        let centre = Chunk::empty(&Point3::new(0, 0, 0));
        let padded = PaddedChunk::gather(&centre, None, &NEIGHBOUR_OFFSETS, |offset| {
            match offset {
                [1, 0, 0] => Halo::Chunk(east.clone()),
                [_, 1, _] => Halo::Sky,
                _ => Halo::Void,
            }
        });

        assert_eq!(padded.block(32, 4, 9), BlockType::STONE.id());
        assert_eq!(padded.block(32, 4, 10), BlockType::AIR.id());
        assert_eq!(padded.light_at(5, 32, 5), MAX_SKY_LIGHT);
        assert_eq!(padded.light_at(-1, 32, -1), MAX_SKY_LIGHT);
        assert_eq!(padded.light_at(5, -1, 5), 0);
    }
}
