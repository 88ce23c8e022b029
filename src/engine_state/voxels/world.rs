//! # World Module
//!
//! This module provides the `World` struct which maps chunk coordinates to
//! storage slots. It serves as the central coordinator for chunk loading,
//! unloading, block queries and the cross-chunk parts of relighting and meshing.
//!
//! ## Architecture
//!
//! Chunk storage is a pool of [`ChunkSlot`]s allocated up front for the
//! configured render distance. Loading takes a free slot, unloading clears it
//! and returns it to the pool, so steady-state movement does not allocate
//! chunk slots at all. A hash map from chunk position to slot index provides
//! O(1) lookup.
//!
//! ## Locking
//!
//! The world itself is shared as `MtResource<World>`. Relights, mesh input
//! gathering and block queries only need `&World` (the read lock); loading and
//! unloading need `&mut World`. Because a relight runs entirely under the read
//! lock, none of the chunks it reads can be unloaded while it runs.

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::Point3;
use log::{debug, info, warn};
use web_time::Duration;

use crate::core::{config::WorldConfig, error::ChunkError};

use super::{
    block::{block_side::BlockSide, block_type::BlockType, BlockTypeSize},
    chunk::{
        offsets::{FACE_NEIGHBOUR_OFFSETS, NEIGHBOUR_OFFSETS},
        world_to_chunk, ChunkSlot, GeneratedChunk, Halo, PaddedChunk, CHUNK_DIMENSION,
        MAX_SKY_LIGHT,
    },
    lighting::{self, propagate_sky_light},
    terrain::TerrainGenerator,
};

/// Chunk position one step away along `offset`.
#[inline]
pub fn offset_position(position: Point3<i32>, offset: [i32; 3]) -> Point3<i32> {
    Point3::new(position.x + offset[0], position.y + offset[1], position.z + offset[2])
}

/// Represents a voxel world composed of pooled chunk slots.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_world::core::config::WorldConfig;
/// use voxel_world::engine_state::voxels::world::World;
///
/// let mut world = World::new(&WorldConfig::default());
/// world.load_chunk(Point3::new(0, 0, 0));
/// assert!(world.is_loaded(Point3::new(0, 0, 0)));
/// ```
pub struct World {
    /// Every slot ever allocated, loaded or not.
    slots: Vec<Arc<ChunkSlot>>,
    /// Slot index of each loaded chunk position.
    index: HashMap<Point3<i32>, usize>,
    /// Indices of slots holding no chunk.
    free_slots: Vec<usize>,
    generator: TerrainGenerator,
    render_distance: u32,
    min_chunk_y: i32,
    max_chunk_y: i32,
    relight_timeout: Duration,
}

impl World {
    /// Creates an empty world with slots pre-allocated for the configured
    /// render distance.
    pub fn new(config: &WorldConfig) -> Self {
        let width = 2 * config.render_distance as usize + 1;
        let capacity = width * width * config.vertical_chunks();
        info!(
            "Creating world (seed {}, render distance {}, {} chunk slots)",
            config.seed, config.render_distance, capacity
        );

        World {
            slots: (0..capacity).map(|_| Arc::new(ChunkSlot::unloaded())).collect(),
            index: HashMap::with_capacity(capacity),
            free_slots: (0..capacity).rev().collect(),
            generator: TerrainGenerator::new(config.seed),
            render_distance: config.render_distance,
            min_chunk_y: config.min_chunk_y,
            max_chunk_y: config.max_chunk_y,
            relight_timeout: config.relight_timeout(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    pub fn render_distance(&self) -> u32 {
        self.render_distance
    }

    pub fn min_chunk_y(&self) -> i32 {
        self.min_chunk_y
    }

    pub fn max_chunk_y(&self) -> i32 {
        self.max_chunk_y
    }

    /// A handle to the terrain generator, for generating off the world lock.
    pub fn generator(&self) -> TerrainGenerator {
        self.generator.clone()
    }

    /// Whether chunk layer `y` is ever loaded.
    pub fn contains_layer(&self, y: i32) -> bool {
        (self.min_chunk_y..=self.max_chunk_y).contains(&y)
    }

    pub fn is_loaded(&self, position: Point3<i32>) -> bool {
        self.index.contains_key(&position)
    }

    pub fn loaded_count(&self) -> usize {
        self.index.len()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn loaded_positions(&self) -> Vec<Point3<i32>> {
        self.index.keys().copied().collect()
    }

    /// The slot holding the chunk at `position`, if it is loaded.
    pub fn chunk_slot(&self, position: Point3<i32>) -> Option<Arc<ChunkSlot>> {
        self.index.get(&position).map(|&i| Arc::clone(&self.slots[i]))
    }

    /// The loaded chunk across `side` of the chunk at `position`.
    pub fn neighbour_chunk(
        &self,
        position: Point3<i32>,
        side: BlockSide,
    ) -> Option<Arc<ChunkSlot>> {
        self.chunk_slot(offset_position(position, side.offset()))
    }

    /// Chunk positions that should be loaded around `centre`, nearest first.
    pub fn positions_around(&self, centre: Point3<i32>) -> Vec<Point3<i32>> {
        let r = self.render_distance as i32;
        let mut positions = Vec::new();
        for y in self.min_chunk_y..=self.max_chunk_y {
            for z in centre.z - r..=centre.z + r {
                for x in centre.x - r..=centre.x + r {
                    positions.push(Point3::new(x, y, z));
                }
            }
        }
        positions.sort_by_key(|p| {
            let (dx, dy, dz) = (p.x - centre.x, p.y - centre.y, p.z - centre.z);
            dx * dx + dy * dy + dz * dz
        });
        positions
    }

    /// Stores a generated chunk, reusing a pooled slot when one is free.
    ///
    /// A chunk already loaded at the same position is replaced in place.
    pub fn insert_chunk(&mut self, generated: GeneratedChunk) -> Arc<ChunkSlot> {
        let position = generated.chunk.position;
        let slot_idx = match self.index.get(&position) {
            Some(&i) => i,
            None => {
                let i = match self.free_slots.pop() {
                    Some(i) => i,
                    None => {
                        warn!(
                            "Chunk slot pool exhausted at {} slots, growing",
                            self.slots.len()
                        );
                        self.slots.push(Arc::new(ChunkSlot::unloaded()));
                        self.slots.len() - 1
                    }
                };
                self.index.insert(position, i);
                i
            }
        };

        let slot = &self.slots[slot_idx];
        slot.load(generated);
        Arc::clone(slot)
    }

    /// Generates and stores the chunk at `position` on the calling thread.
    pub fn load_chunk(&mut self, position: Point3<i32>) -> Arc<ChunkSlot> {
        let generated = self.generator.generate_chunk(position);
        self.insert_chunk(generated)
    }

    /// Releases the chunk at `position` back to the pool.
    ///
    /// # Returns
    /// `false` if nothing was loaded there.
    pub fn unload_chunk(&mut self, position: Point3<i32>) -> bool {
        match self.index.remove(&position) {
            Some(i) => {
                self.slots[i].unload();
                self.free_slots.push(i);
                true
            }
            None => false,
        }
    }

    /// The block at a world block coordinate. Unloaded space reads as air.
    pub fn block_at(&self, world: Point3<i32>) -> BlockTypeSize {
        let (chunk, local) = world_to_chunk(world);
        match self.chunk_slot(chunk) {
            Some(slot) => slot.get_block_at(local.x, local.y, local.z),
            None => BlockType::AIR.id(),
        }
    }

    /// Skylight at a world block coordinate.
    ///
    /// Above the top chunk layer is open sky (15); other unloaded space is dark.
    pub fn sky_light_at(&self, world: Point3<i32>) -> u8 {
        let (chunk, local) = world_to_chunk(world);
        if chunk.y > self.max_chunk_y {
            return MAX_SKY_LIGHT;
        }
        match self.chunk_slot(chunk) {
            Some(slot) => slot.get_sky_light_at(local.x, local.y, local.z),
            None => 0,
        }
    }

    /// Writes one block and marks the affected light stale.
    ///
    /// # Returns
    /// The loaded chunks whose mesh may have changed: the edited chunk first,
    /// then any neighbour whose boundary touches the edited block.
    pub fn set_block_at(
        &self,
        world: Point3<i32>,
        block: BlockTypeSize,
    ) -> Result<Vec<Point3<i32>>, ChunkError> {
        let (chunk, local) = world_to_chunk(world);
        let slot = self.chunk_slot(chunk).ok_or(ChunkError::ChunkNotLoaded(chunk))?;
        slot.set_block_at(local.x, local.y, local.z, block);

        let last = CHUNK_DIMENSION as usize - 1;
        let mut affected = vec![chunk];
        for side in BlockSide::all() {
            let [dx, dy, dz] = side.offset();
            let on_boundary = |offset: i32, coordinate: usize| match offset {
                -1 => coordinate == 0,
                1 => coordinate == last,
                _ => true,
            };
            if on_boundary(dx, local.x) && on_boundary(dy, local.y) && on_boundary(dz, local.z) {
                if let Some(neighbour) = self.neighbour_chunk(chunk, side) {
                    neighbour.mark_sky_light_stale();
                    affected.push(offset_position(chunk, side.offset()));
                }
            }
        }
        Ok(affected)
    }

    /// Marks a loaded chunk's light stale. Unloaded positions are ignored.
    pub fn invalidate_sky_light(&self, position: Point3<i32>) {
        if let Some(slot) = self.chunk_slot(position) {
            slot.mark_sky_light_stale();
        }
    }

    /// Recomputes the skylight of the chunk at `position`.
    ///
    /// Blocks until no face neighbour is relighting, for at most the configured
    /// timeout. The chunk's blocks are read-locked for the whole pass, so edits
    /// wait for it to finish. Neighbours are only read while the halo is
    /// copied; if one of them is edited on the shared border after that, the
    /// new light is stored but the chunk stays stale.
    ///
    /// # Returns
    /// Which neighbours (in `BlockSide` order) would receive more light and
    /// need a relight of their own.
    pub fn relight_chunk(&self, position: Point3<i32>) -> Result<[bool; 6], ChunkError> {
        let slot = self.chunk_slot(position).ok_or(ChunkError::ChunkNotLoaded(position))?;
        let stamp = slot.sky_light_stamp();
        let neighbours: Vec<Arc<ChunkSlot>> = BlockSide::all()
            .into_iter()
            .filter_map(|side| self.neighbour_chunk(position, side))
            .collect();

        let _guard = lighting::relight_barrier::acquire(&slot, &neighbours, self.relight_timeout)
            .map_err(|timeout| {
                let neighbour = timeout.busy.position();
                warn!(
                    "Relight of {:?} gave up waiting for {:?}",
                    position, neighbour
                );
                ChunkError::NeighbourRelightTimeout { position, neighbour }
            })?;

        let chunk = slot.chunk();
        if !chunk.in_use {
            return Err(ChunkError::ChunkNotLoaded(position));
        }
        let mut padded = PaddedChunk::from_centre(&chunk, None);
        padded.fill_halos(&FACE_NEIGHBOUR_OFFSETS, |offset| self.halo(position, offset));

        let outcome = propagate_sky_light(&padded);
        *slot.sky_light_mut() = outcome.sky_light;
        if !slot.publish_sky_light(stamp) {
            debug!("Light of {:?} went stale during its relight", position);
        }
        drop(chunk);

        Ok(outcome.neighbours_needing_relight)
    }

    /// Relights the chunk at `position` if its light is stale.
    ///
    /// # Returns
    /// Loaded neighbours that were flagged by the relight. Their light has
    /// been marked stale; the caller schedules their meshes again.
    pub fn ensure_sky_light(&self, position: Point3<i32>) -> Result<Vec<Point3<i32>>, ChunkError> {
        let slot = self.chunk_slot(position).ok_or(ChunkError::ChunkNotLoaded(position))?;
        if slot.is_sky_light_up_to_date() {
            return Ok(Vec::new());
        }

        let flags = self.relight_chunk(position)?;
        let mut cascade = Vec::new();
        for side in BlockSide::all() {
            if !flags[side as usize] {
                continue;
            }
            if let Some(neighbour) = self.neighbour_chunk(position, side) {
                neighbour.mark_sky_light_stale();
                cascade.push(offset_position(position, side.offset()));
            }
        }
        if !cascade.is_empty() {
            debug!("Relight of {:?} flagged {} neighbours", position, cascade.len());
        }
        Ok(cascade)
    }

    /// Copies everything the mesh builder needs for the chunk at `position`.
    ///
    /// Every face neighbour inside the world's vertical range must be loaded.
    /// Missing edge and corner neighbours read as air.
    pub fn mesh_input(&self, position: Point3<i32>) -> Result<PaddedChunk, ChunkError> {
        let slot = self.chunk_slot(position).ok_or(ChunkError::ChunkNotLoaded(position))?;

        for offset in FACE_NEIGHBOUR_OFFSETS {
            let neighbour = offset_position(position, offset);
            if self.contains_layer(neighbour.y) && !self.is_loaded(neighbour) {
                return Err(ChunkError::NeighbourUnavailable { position, neighbour });
            }
        }

        let mut padded = {
            let chunk = slot.chunk();
            if !chunk.in_use {
                return Err(ChunkError::ChunkUnavailable(position));
            }
            let light = slot.sky_light();
            PaddedChunk::from_centre(&chunk, Some(&light))
        };
        padded.fill_halos(&NEIGHBOUR_OFFSETS, |offset| self.halo(position, offset));
        Ok(padded)
    }

    /// What lies at `offset` from the chunk at `position`, for halo filling.
    fn halo(&self, position: Point3<i32>, offset: [i32; 3]) -> Halo {
        let neighbour = offset_position(position, offset);
        if neighbour.y > self.max_chunk_y {
            return Halo::Sky;
        }
        match self.chunk_slot(neighbour) {
            Some(slot) => Halo::Chunk(slot),
            None => Halo::Void,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::engine_state::voxels::chunk::{Chunk, SkyLight};

    fn config() -> WorldConfig {
        WorldConfig {
            render_distance: 1,
            min_chunk_y: 0,
            max_chunk_y: 0,
            ..WorldConfig::default()
        }
    }

    fn insert(world: &mut World, chunk: Chunk) {
        world.insert_chunk(GeneratedChunk {
            chunk,
            sky_light: SkyLight::dark(),
        });
    }

    #[test]
    fn unloaded_slots_are_recycled() {
        let mut world = World::new(&config());
        assert_eq!(world.slot_count(), 9);

        for x in 0..9 {
            insert(&mut world, Chunk::empty(&Point3::new(x, 0, 0)));
        }
        assert!(world.unload_chunk(Point3::new(4, 0, 0)));
        assert!(!world.unload_chunk(Point3::new(4, 0, 0)));

        insert(&mut world, Chunk::empty(&Point3::new(20, 0, 0)));
        assert_eq!(world.slot_count(), 9);
        assert_eq!(world.loaded_count(), 9);

        insert(&mut world, Chunk::empty(&Point3::new(21, 0, 0)));
        assert_eq!(world.slot_count(), 10);
    }

    #[test]
    fn block_queries_cross_chunks() {
        let mut world = World::new(&config());
        insert(&mut world, Chunk::solid(&Point3::new(-1, 0, 0), BlockType::STONE));
        insert(&mut world, Chunk::empty(&Point3::new(0, 0, 0)));

        assert_eq!(world.block_at(Point3::new(-1, 5, 5)), BlockType::STONE.id());
        assert_eq!(world.block_at(Point3::new(0, 5, 5)), BlockType::AIR.id());
        assert_eq!(world.block_at(Point3::new(500, 5, 5)), BlockType::AIR.id());
        assert_eq!(world.sky_light_at(Point3::new(0, 40, 0)), MAX_SKY_LIGHT);
        assert_eq!(world.sky_light_at(Point3::new(0, -40, 0)), 0);
    }

    #[test]
    fn edits_on_a_boundary_touch_the_neighbour() {
        let mut world = World::new(&config());
        insert(&mut world, Chunk::empty(&Point3::new(0, 0, 0)));
        insert(&mut world, Chunk::empty(&Point3::new(1, 0, 0)));

        let affected = world
            .set_block_at(Point3::new(31, 3, 3), BlockType::STONE.id())
            .unwrap();
        assert_eq!(affected, vec![Point3::new(0, 0, 0), Point3::new(1, 0, 0)]);

        let affected = world
            .set_block_at(Point3::new(10, 3, 3), BlockType::STONE.id())
            .unwrap();
        assert_eq!(affected, vec![Point3::new(0, 0, 0)]);

        assert_eq!(
            world.set_block_at(Point3::new(0, 3, 200), BlockType::STONE.id()),
            Err(ChunkError::ChunkNotLoaded(Point3::new(0, 0, 6)))
        );
    }

    #[test]
    fn top_layer_is_lit_from_the_sky() {
        let mut world = World::new(&config());
        insert(&mut world, Chunk::empty(&Point3::new(0, 0, 0)));

        let cascade = world.ensure_sky_light(Point3::new(0, 0, 0)).unwrap();
        assert!(cascade.is_empty());
        for y in 0..CHUNK_DIMENSION {
            assert_eq!(world.sky_light_at(Point3::new(12, y, 12)), MAX_SKY_LIGHT);
        }
        assert!(world.chunk_slot(Point3::new(0, 0, 0)).unwrap().is_sky_light_up_to_date());
    }

    #[test]
    fn relight_flags_loaded_neighbours() {
        let mut world = World::new(&config());
        insert(&mut world, Chunk::empty(&Point3::new(0, 0, 0)));
        insert(&mut world, Chunk::solid(&Point3::new(1, 0, 0), BlockType::STONE));
        let mut tunnel = Chunk::solid(&Point3::new(-1, 0, 0), BlockType::STONE);
        tunnel.set_block_at(31, 10, 10, BlockType::AIR.id());
        insert(&mut world, tunnel);

        let cascade = world.ensure_sky_light(Point3::new(0, 0, 0)).unwrap();
        assert_eq!(cascade, vec![Point3::new(-1, 0, 0)]);
        assert!(!world.chunk_slot(Point3::new(-1, 0, 0)).unwrap().is_sky_light_up_to_date());
    }

    #[test]
    fn mesh_input_waits_for_face_neighbours() {
        let mut world = World::new(&config());
        insert(&mut world, Chunk::empty(&Point3::new(0, 0, 0)));

        let result = world.mesh_input(Point3::new(0, 0, 0));
        assert!(matches!(result, Err(ChunkError::NeighbourUnavailable { .. })));

        for side in [BlockSide::LEFT, BlockSide::RIGHT, BlockSide::BACK, BlockSide::FRONT] {
            insert(&mut world, Chunk::empty(&offset_position(Point3::new(0, 0, 0), side.offset())));
        }
        // The layers above and below are outside the world and not required.
        assert!(world.mesh_input(Point3::new(0, 0, 0)).is_ok());
    }

    #[test]
    fn border_edit_during_relight_keeps_light_stale() {
        let mut world = World::new(&config());
        insert(&mut world, Chunk::empty(&Point3::new(0, 0, 0)));
        insert(&mut world, Chunk::empty(&Point3::new(1, 0, 0)));
        let slot = world.chunk_slot(Point3::new(0, 0, 0)).unwrap();

        let world = &world;
        thread::scope(|scope| {
            // Holding the light lock parks the relight just before it publishes.
            let light = slot.sky_light_mut();
            let relight = scope.spawn(|| world.relight_chunk(Point3::new(0, 0, 0)));
            while !slot.is_calculating_sky_light() {
                thread::sleep(Duration::from_millis(1));
            }

            let affected = world
                .set_block_at(Point3::new(32, 5, 5), BlockType::STONE.id())
                .unwrap();
            assert_eq!(affected, vec![Point3::new(1, 0, 0), Point3::new(0, 0, 0)]);
            drop(light);

            relight.join().unwrap().unwrap();
        });
        assert!(!slot.is_sky_light_up_to_date());

        world.ensure_sky_light(Point3::new(0, 0, 0)).unwrap();
        assert!(slot.is_sky_light_up_to_date());
    }
}
