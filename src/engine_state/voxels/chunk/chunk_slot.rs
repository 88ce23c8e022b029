use std::sync::{
    atomic::{AtomicU64, Ordering},
    RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use cgmath::Point3;

use crate::engine_state::voxels::{block::BlockTypeSize, lighting::RelightBarrier};

use super::{block_index, Chunk, GeneratedChunk, SkyLight};

/// One pooled storage slot of the world: a chunk's blocks, its skylight and
/// the state other chunks need to coordinate relights with it.
///
/// Slots are allocated once and recycled; [`ChunkSlot::load`] and
/// [`ChunkSlot::unload`] swap contents in place. Other threads only read a
/// slot's arrays, through the guards returned here.
///
/// Lock order: a thread may hold this slot's chunk guard while taking other
/// guards (a relight does), but must never take a chunk guard while holding a
/// sky light guard.
pub struct ChunkSlot {
    chunk: RwLock<Chunk>,
    sky_light: RwLock<SkyLight>,
    /// Bumped to the next even value whenever the light goes stale; odd while
    /// the published light matches the blocks.
    sky_light_state: AtomicU64,
    pub(crate) barrier: RelightBarrier,
}

impl ChunkSlot {
    /// An empty slot, ready to be handed a chunk.
    pub fn unloaded() -> Self {
        ChunkSlot {
            chunk: RwLock::new(Chunk::unloaded()),
            sky_light: RwLock::new(SkyLight::cleared()),
            sky_light_state: AtomicU64::new(0),
            barrier: RelightBarrier::new(),
        }
    }

    /// A slot that already holds `generated`.
    pub fn with_chunk(generated: GeneratedChunk) -> Self {
        let slot = Self::unloaded();
        slot.load(generated);
        slot
    }

    pub fn chunk(&self) -> RwLockReadGuard<'_, Chunk> {
        self.chunk.read().unwrap()
    }

    pub fn chunk_mut(&self) -> RwLockWriteGuard<'_, Chunk> {
        self.chunk.write().unwrap()
    }

    pub fn sky_light(&self) -> RwLockReadGuard<'_, SkyLight> {
        self.sky_light.read().unwrap()
    }

    pub(crate) fn sky_light_mut(&self) -> RwLockWriteGuard<'_, SkyLight> {
        self.sky_light.write().unwrap()
    }

    pub fn position(&self) -> Point3<i32> {
        self.chunk().position
    }

    pub fn in_use(&self) -> bool {
        self.chunk().in_use
    }

    /// Installs freshly generated data. Light is marked stale.
    pub fn load(&self, generated: GeneratedChunk) {
        *self.chunk_mut() = generated.chunk;
        *self.sky_light_mut() = generated.sky_light;
        self.mark_sky_light_stale();
    }

    /// Releases both arrays and returns the slot to the pool.
    pub fn unload(&self) {
        self.chunk_mut().unload();
        *self.sky_light_mut() = SkyLight::cleared();
        self.mark_sky_light_stale();
    }

    pub fn get_block_at(&self, cx: usize, cy: usize, cz: usize) -> BlockTypeSize {
        self.chunk().get_block_at(cx, cy, cz)
    }

    /// Writes one block and marks the light stale.
    ///
    /// Waits for any relight of this chunk in progress, which holds the
    /// chunk for reading for its whole pass.
    pub fn set_block_at(&self, cx: usize, cy: usize, cz: usize, block: BlockTypeSize) {
        let mut chunk = self.chunk_mut();
        chunk.set_block_at(cx, cy, cz, block);
        self.mark_sky_light_stale();
    }

    pub fn get_sky_light_at(&self, cx: usize, cy: usize, cz: usize) -> u8 {
        self.sky_light().get(block_index(cx, cy, cz))
    }

    pub fn is_sky_light_up_to_date(&self) -> bool {
        self.sky_light_state.load(Ordering::Acquire) & 1 == 1
    }

    pub fn mark_sky_light_stale(&self) {
        let _ = self
            .sky_light_state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |state| {
                Some((state | 1).wrapping_add(1))
            });
    }

    /// Current light state, taken before a relight reads any blocks.
    pub(crate) fn sky_light_stamp(&self) -> u64 {
        self.sky_light_state.load(Ordering::Acquire)
    }

    /// Marks the light up to date unless it went stale after `stamp` was taken.
    ///
    /// # Returns
    /// `false` if an edit landed in the meantime; the light stays stale.
    pub(crate) fn publish_sky_light(&self, stamp: u64) -> bool {
        self.sky_light_state
            .compare_exchange(stamp, stamp | 1, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// True while a relight pass is writing this chunk's light.
    pub fn is_calculating_sky_light(&self) -> bool {
        self.barrier.is_relighting()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn edits_mark_light_stale() {
        let slot = ChunkSlot::with_chunk(GeneratedChunk {
            chunk: Chunk::empty(&Point3::new(0, 0, 0)),
            sky_light: SkyLight::dark(),
        });
        assert!(slot.publish_sky_light(slot.sky_light_stamp()));
        assert!(slot.is_sky_light_up_to_date());

        slot.set_block_at(1, 1, 1, BlockType::STONE.id());
        assert!(!slot.is_sky_light_up_to_date());
        assert_eq!(slot.get_block_at(1, 1, 1), BlockType::STONE.id());
    }

    #[test]
    fn stale_mark_after_stamp_blocks_publishing() {
        let slot = ChunkSlot::with_chunk(GeneratedChunk {
            chunk: Chunk::empty(&Point3::new(0, 0, 0)),
            sky_light: SkyLight::dark(),
        });
        let stamp = slot.sky_light_stamp();
        slot.mark_sky_light_stale();

        assert!(!slot.publish_sky_light(stamp));
        assert!(!slot.is_sky_light_up_to_date());
        assert!(slot.publish_sky_light(slot.sky_light_stamp()));
    }

    #[test]
    fn unload_clears_both_arrays() {
        let slot = ChunkSlot::with_chunk(GeneratedChunk {
            chunk: Chunk::solid(&Point3::new(0, 0, 0), BlockType::STONE),
            sky_light: SkyLight::dark(),
        });
        slot.unload();

        assert!(!slot.in_use());
        assert_eq!(slot.chunk().blocks.backing_len(), 0);
        assert!(slot.sky_light().is_cleared());
    }
}
