//! End-to-end tests of the chunk pipeline: generation -> relight -> meshing,
//! through the public world and engine APIs.

use std::collections::HashSet;
use std::thread;

use cgmath::Point3;
use voxel_world::core::config::WorldConfig;
use voxel_world::engine_state::voxels::block::block_type::BlockType;
use voxel_world::engine_state::voxels::chunk::{Chunk, GeneratedChunk, SkyLight, MAX_SKY_LIGHT};
use voxel_world::engine_state::voxels::world::World;
use voxel_world::engine_state::EngineState;
use web_time::Duration;

fn config(min_chunk_y: i32, max_chunk_y: i32) -> WorldConfig {
    WorldConfig {
        render_distance: 1,
        min_chunk_y,
        max_chunk_y,
        worker_count: 2,
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
fn seed_42_column_follows_the_filler_rules() {
    let mut world = World::new(&config(-8, 8));
    let height = world.generator().heightmap().height_at(0, 0);
    let layer = height.div_euclid(32);
    for y in layer - 1..=layer + 1 {
        world.load_chunk(Point3::new(0, y, 0));
    }

    let surface = if height < 0 { BlockType::STONE } else { BlockType::GRASS };
    assert_eq!(world.block_at(Point3::new(0, height, 0)), surface.id());
    assert_eq!(world.block_at(Point3::new(0, height - 5, 0)), BlockType::STONE.id());

    let above = world.block_at(Point3::new(0, height + 1, 0));
    assert!(
        [BlockType::AIR.id(), BlockType::WATER.id(), BlockType::TALL_GRASS.id()].contains(&above),
        "unexpected block {} above the surface",
        above
    );
    if height >= 0 {
        assert_eq!(world.block_at(Point3::new(0, height - 2, 0)), BlockType::DIRT.id());
    }

    let again = World::new(&config(-8, 8));
    assert_eq!(again.generator().heightmap().height_at(0, 0), height);
}

#[test]
fn light_passes_down_through_a_chunk_border() {
    let mut world = World::new(&config(-1, 0));
    insert(&mut world, Chunk::empty(&Point3::new(0, 0, 0)));
    insert(&mut world, Chunk::empty(&Point3::new(0, -1, 0)));

    let cascade = world.ensure_sky_light(Point3::new(0, 0, 0)).unwrap();
    assert_eq!(cascade, vec![Point3::new(0, -1, 0)]);

    world.ensure_sky_light(Point3::new(0, -1, 0)).unwrap();
    for y in [-32, -17, -1, 0, 31] {
        assert_eq!(world.sky_light_at(Point3::new(7, y, 9)), MAX_SKY_LIGHT);
    }
}

#[test]
fn enclosed_chunk_stays_dark() {
    let mut world = World::new(&config(-2, 0));
    let centre = Point3::new(0, -1, 0);
    insert(&mut world, Chunk::empty(&centre));
    for offset in [[0, 1, 0], [0, -1, 0], [1, 0, 0], [-1, 0, 0], [0, 0, 1], [0, 0, -1]] {
        let position = Point3::new(offset[0], centre.y + offset[1], offset[2]);
        insert(&mut world, Chunk::solid(&position, BlockType::STONE));
    }

    let cascade = world.ensure_sky_light(centre).unwrap();
    assert!(cascade.is_empty());
    for (x, y, z) in [(0, -32, 0), (16, -16, 16), (31, -1, 31)] {
        assert_eq!(world.sky_light_at(Point3::new(x, y, z)), 0);
    }
}

#[test]
fn neighbouring_relights_never_overlap() {
    let mut world = World::new(&config(0, 0));
    let mut left = Chunk::solid(&Point3::new(0, 0, 0), BlockType::STONE);
    for y in 0..32 {
        left.set_block_at(31, y, 16, BlockType::AIR.id());
    }
    insert(&mut world, left);
    insert(&mut world, Chunk::empty(&Point3::new(1, 0, 0)));

    let world = &world;
    thread::scope(|scope| {
        for x in [0, 1] {
            scope.spawn(move || {
                for _ in 0..20 {
                    world.relight_chunk(Point3::new(x, 0, 0)).unwrap();
                }
            });
        }
    });

    for x in [0, 1] {
        let slot = world.chunk_slot(Point3::new(x, 0, 0)).unwrap();
        assert!(!slot.is_calculating_sky_light());
        assert!(slot.is_sky_light_up_to_date());
    }
    assert_eq!(world.sky_light_at(Point3::new(31, 0, 16)), MAX_SKY_LIGHT);
    assert_eq!(world.sky_light_at(Point3::new(40, 3, 3)), MAX_SKY_LIGHT);
    assert_eq!(world.sky_light_at(Point3::new(3, 3, 3)), 0);
}

#[test]
fn engine_loads_and_meshes_the_area_around_the_player() {
    let mut engine = EngineState::new(&config(-1, 1));
    engine.update_player_position(Point3::new(5.0, 0.0, 5.0));
    assert!(engine.run_until_idle(Duration::from_secs(120)));

    assert_eq!(engine.world().get().loaded_count(), 27);

    // Only the centre column has every face neighbour loaded.
    let meshed: HashSet<_> = engine
        .take_ready_meshes()
        .into_iter()
        .map(|mesh| mesh.position)
        .collect();
    let expected: HashSet<_> = (-1..=1).map(|y| Point3::new(0, y, 0)).collect();
    assert_eq!(meshed, expected);

    for z in 0..32 {
        for x in 0..32 {
            let top = Point3::new(x, 63, z);
            if engine.block_at(top) == BlockType::AIR.id() {
                assert_eq!(engine.sky_light_at(top), MAX_SKY_LIGHT);
            }
        }
    }
}

#[test]
fn edits_are_remeshed() {
    let mut engine = EngineState::new(&config(-1, 1));
    engine.update_player_position(Point3::new(5.0, 0.0, 5.0));
    assert!(engine.run_until_idle(Duration::from_secs(120)));
    engine.take_ready_meshes();

    let roof = Point3::new(12, 63, 12);
    engine.set_block(roof, BlockType::STONE).unwrap();
    assert!(engine.run_until_idle(Duration::from_secs(60)));

    assert_eq!(engine.block_at(roof), BlockType::STONE.id());
    let meshed: Vec<_> = engine
        .take_ready_meshes()
        .into_iter()
        .map(|mesh| mesh.position)
        .collect();
    assert!(meshed.contains(&Point3::new(0, 1, 0)));

    let below = Point3::new(12, 62, 12);
    let open = [(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)]
        .iter()
        .all(|(dx, dz)| engine.block_at(Point3::new(12 + dx, 62, 12 + dz)) == BlockType::AIR.id());
    if open {
        assert_eq!(engine.sky_light_at(below), MAX_SKY_LIGHT - 1);
    }

    assert!(engine.set_block(Point3::new(500, 0, 0), BlockType::STONE).is_err());
}
