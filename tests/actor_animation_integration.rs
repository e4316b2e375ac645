//! Actor animation integration tests driving a bevy_ecs `World` the way a
//! host game loop does: update time, run the schedule, read the output.

use std::sync::{Arc, Mutex};

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

use spritelayers::components::actoranimation::{ActorAnimation, PlaybackSettings};
use spritelayers::components::direction::Direction;
use spritelayers::components::sprite::{LayeredSprite, PartSlot, SpriteHandle};
use spritelayers::events::animation::{AnimationFinishedEvent, DirectionChangedEvent};
use spritelayers::resources::animationtable::{
    AnimationCategory, AnimationDescriptor, AnimationTable,
};
use spritelayers::resources::partstore::PartStore;
use spritelayers::resources::worldtime::WorldTime;
use spritelayers::systems::actoranimation::{actor_animation_system, set_actor_direction};
use spritelayers::systems::partsync::refresh_part_libraries;
use spritelayers::systems::time::update_world_time;

const FRAME: f32 = 0.1;

fn table() -> Arc<AnimationTable> {
    Arc::new(
        AnimationTable::new([
            AnimationDescriptor::new(AnimationCategory::Idle, 6, true, true),
            AnimationDescriptor::new(AnimationCategory::Walking, 6, true, true),
            AnimationDescriptor::new(AnimationCategory::Hitting, 6, true, false),
        ])
        .unwrap(),
    )
}

fn make_world(table: &AnimationTable) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    let mut store = PartStore::new();
    let count = table.required_sprites() as u32;
    store
        .insert("body_01", PartSlot::Body, SpriteHandle::sheet("body_01", count), table)
        .unwrap();
    store
        .insert("eyes_01", PartSlot::Eyes, SpriteHandle::sheet("eyes_01", count), table)
        .unwrap();
    world.insert_resource(store);
    world
}

fn spawn_actor(world: &mut World, table: Arc<AnimationTable>, slots: &[(&str, PartSlot)]) -> Entity {
    let mut actor = ActorAnimation::new(table, PlaybackSettings::default());
    {
        let store = world.resource::<PartStore>();
        for (name, slot) in slots {
            let part = store.get(name).unwrap();
            assert!(actor.equip_part(*slot, part));
        }
    }
    world.spawn((actor, LayeredSprite::default())).id()
}

fn tick(world: &mut World, dt: f32) {
    update_world_time(world, dt);
    let mut schedule = Schedule::default();
    schedule.add_systems((refresh_part_libraries, actor_animation_system).chain());
    schedule.run(world);
}

fn slice(world: &World, entity: Entity, slot: PartSlot) -> Option<u32> {
    world
        .get::<LayeredSprite>(entity)
        .unwrap()
        .frame
        .get(slot)
        .map(|h| h.slice)
}

#[test]
fn layers_advance_in_lock_step() {
    let table = table();
    let mut world = make_world(&table);
    let entity = spawn_actor(
        &mut world,
        table,
        &[("body_01", PartSlot::Body), ("eyes_01", PartSlot::Eyes)],
    );

    for expected in 18..24 {
        tick(&mut world, FRAME);
        assert_eq!(slice(&world, entity, PartSlot::Body), Some(expected));
        assert_eq!(slice(&world, entity, PartSlot::Eyes), Some(expected));
    }
    assert_eq!(slice(&world, entity, PartSlot::Outfit), None);
}

#[test]
fn empty_actor_never_panics_and_draws_nothing() {
    let table = table();
    let mut world = make_world(&table);
    let entity = spawn_actor(&mut world, table, &[]);
    for _ in 0..20 {
        tick(&mut world, FRAME);
        assert!(world.get::<LayeredSprite>(entity).unwrap().frame.is_empty());
    }
}

#[test]
fn locked_hitting_rejects_walking() {
    let table = table();
    let mut world = make_world(&table);
    let entity = spawn_actor(&mut world, table, &[("body_01", PartSlot::Body)]);

    tick(&mut world, FRAME);
    {
        let mut actor = world.get_mut::<ActorAnimation>(entity).unwrap();
        assert_eq!(actor.play_one_shot_named("Hitting", true, None), Ok(true));
    }
    tick(&mut world, FRAME);
    {
        let mut actor = world.get_mut::<ActorAnimation>(entity).unwrap();
        assert_eq!(actor.set_looping_animation_named("Walking"), Ok(false));
        assert_eq!(actor.current_animation(), AnimationCategory::Hitting);
        assert!(!actor.play_one_shot_animation(AnimationCategory::Hitting, true, None));
    }
}

#[test]
fn one_shot_finishes_triggers_event_and_restores() {
    let table = table();
    let mut world = make_world(&table);
    let entity = spawn_actor(&mut world, table, &[("body_01", PartSlot::Body)]);

    let finished = Arc::new(Mutex::new(Vec::new()));
    let finished_clone = finished.clone();
    world.add_observer(move |trigger: On<AnimationFinishedEvent>| {
        finished_clone.lock().unwrap().push(*trigger.event());
    });
    world.flush();

    let callback_hits = Arc::new(Mutex::new(0));
    let hits = callback_hits.clone();
    {
        let mut actor = world.get_mut::<ActorAnimation>(entity).unwrap();
        actor.set_looping_animation(AnimationCategory::Walking);
        assert!(actor.play_one_shot_animation(
            AnimationCategory::Hitting,
            true,
            Some(Box::new(move || *hits.lock().unwrap() += 1)),
        ));
    }

    // six frames, completion after the fifth one is displayed
    for _ in 0..4 {
        tick(&mut world, FRAME);
        assert!(world.get::<ActorAnimation>(entity).unwrap().is_locked());
    }
    tick(&mut world, FRAME);

    let actor = world.get::<ActorAnimation>(entity).unwrap();
    assert!(!actor.is_locked());
    assert_eq!(actor.current_animation(), AnimationCategory::Walking);
    assert_eq!(*callback_hits.lock().unwrap(), 1);

    let events = finished.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0],
        AnimationFinishedEvent {
            entity,
            category: AnimationCategory::Hitting,
            one_shot: true,
        }
    );
}

#[test]
fn turning_updates_sprite_without_waiting_for_tick() {
    let table = table();
    let mut world = make_world(&table);
    let entity = spawn_actor(&mut world, table, &[("body_01", PartSlot::Body)]);

    let turns = Arc::new(Mutex::new(Vec::new()));
    let turns_clone = turns.clone();
    world.add_observer(move |trigger: On<DirectionChangedEvent>| {
        turns_clone.lock().unwrap().push(*trigger.event());
    });
    world.flush();

    tick(&mut world, FRAME);
    assert_eq!(slice(&world, entity, PartSlot::Body), Some(18));

    let turn = world.register_system(set_actor_direction);
    let changed = world
        .run_system_with(turn, (entity, Direction::East))
        .unwrap();
    assert!(changed);
    // idle east strip, frame 1
    assert_eq!(slice(&world, entity, PartSlot::Body), Some(1));

    let passes = world
        .get::<ActorAnimation>(entity)
        .unwrap()
        .resolution_passes();
    let changed_again = world
        .run_system_with(turn, (entity, Direction::East))
        .unwrap();
    assert!(!changed_again);
    assert_eq!(
        world
            .get::<ActorAnimation>(entity)
            .unwrap()
            .resolution_passes(),
        passes
    );

    let turns = turns.lock().unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].from, Direction::South);
    assert_eq!(turns[0].to, Direction::East);
}

#[test]
fn time_scale_slows_animation() {
    let table = table();
    let mut world = make_world(&table);
    world.resource_mut::<WorldTime>().time_scale = 0.5;
    let entity = spawn_actor(&mut world, table, &[("body_01", PartSlot::Body)]);

    tick(&mut world, FRAME);
    assert_eq!(world.get::<ActorAnimation>(entity).unwrap().frame_index(), 1);
    tick(&mut world, FRAME);
    assert_eq!(world.get::<ActorAnimation>(entity).unwrap().frame_index(), 1);
    tick(&mut world, FRAME);
    assert_eq!(world.get::<ActorAnimation>(entity).unwrap().frame_index(), 2);
}

#[test]
fn rebuilt_part_reaches_live_actor() {
    let table = table();
    let mut world = make_world(&table);
    let entity = spawn_actor(&mut world, table.clone(), &[("eyes_01", PartSlot::Eyes)]);

    tick(&mut world, FRAME);
    let before = world
        .get::<LayeredSprite>(entity)
        .unwrap()
        .frame
        .get(PartSlot::Eyes)
        .cloned()
        .unwrap();
    assert_eq!(&*before.tex_key, "eyes_01");

    let count = table.required_sprites() as u32;
    world
        .resource_mut::<PartStore>()
        .reassign_sprites("eyes_01", SpriteHandle::sheet("eyes_01_recolor", count), &table)
        .unwrap();
    tick(&mut world, FRAME);

    let after = world
        .get::<LayeredSprite>(entity)
        .unwrap()
        .frame
        .get(PartSlot::Eyes)
        .cloned()
        .unwrap();
    assert_eq!(&*after.tex_key, "eyes_01_recolor");
    assert_eq!(after.slice, before.slice + 1);
}

#[test]
fn failed_rebuild_keeps_actor_on_old_library() {
    let table = table();
    let mut world = make_world(&table);
    let entity = spawn_actor(&mut world, table.clone(), &[("body_01", PartSlot::Body)]);
    tick(&mut world, FRAME);

    let result = world.resource_mut::<PartStore>().reassign_sprites(
        "body_01",
        SpriteHandle::sheet("truncated", 5),
        &table,
    );
    assert!(result.is_err());
    tick(&mut world, FRAME);
    let sprite = world
        .get::<LayeredSprite>(entity)
        .unwrap()
        .frame
        .get(PartSlot::Body)
        .cloned()
        .unwrap();
    assert_eq!(&*sprite.tex_key, "body_01");
}

#[test]
fn removed_part_disappears_from_actor() {
    let table = table();
    let mut world = make_world(&table);
    let entity = spawn_actor(
        &mut world,
        table,
        &[("body_01", PartSlot::Body), ("eyes_01", PartSlot::Eyes)],
    );
    tick(&mut world, FRAME);
    assert!(world.resource_mut::<PartStore>().remove("eyes_01"));
    tick(&mut world, FRAME);
    assert_eq!(slice(&world, entity, PartSlot::Eyes), None);
    assert!(slice(&world, entity, PartSlot::Body).is_some());
}

#[test]
fn part_equipped_from_before_a_rebuild_catches_up() {
    let table = table();
    let mut world = make_world(&table);
    let entity = spawn_actor(&mut world, table.clone(), &[("body_01", PartSlot::Body)]);
    let stale = world.resource::<PartStore>().get("eyes_01").cloned().unwrap();

    // one long-lived schedule, so store change detection is not reset per run
    let mut schedule = Schedule::default();
    schedule.add_systems((refresh_part_libraries, actor_animation_system).chain());
    let mut step = |world: &mut World| {
        update_world_time(world, FRAME);
        schedule.run(world);
    };

    let count = table.required_sprites() as u32;
    world
        .resource_mut::<PartStore>()
        .reassign_sprites("eyes_01", SpriteHandle::sheet("eyes_01_recolor", count), &table)
        .unwrap();
    step(&mut world);
    step(&mut world);

    assert!(
        world
            .get_mut::<ActorAnimation>(entity)
            .unwrap()
            .equip_part(PartSlot::Eyes, &stale)
    );
    step(&mut world);

    let eyes = world
        .get::<LayeredSprite>(entity)
        .unwrap()
        .frame
        .get(PartSlot::Eyes)
        .cloned()
        .unwrap();
    assert_eq!(&*eyes.tex_key, "eyes_01_recolor");
    assert!(!world.get::<ActorAnimation>(entity).unwrap().needs_rebind());
}
