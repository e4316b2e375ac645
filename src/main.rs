//! Headless animation preview.
//!
//! Builds a layered actor from synthetic sprite sheets, runs the animation
//! systems for a number of frames with a fixed delta, and logs which sprite
//! every layer shows. Useful to check an animation table or a config file
//! without a renderer.
//!
//! # Main Loop
//!
//! 1. Load `animation.ini` (or the `--config` path) and the animation table
//! 2. Register parts in the [`PartStore`] and spawn one actor wearing them
//! 3. Each frame:
//!    - Update world time
//!    - Randomly turn the actor or play a one-shot (seeded)
//!    - Run part sync and actor animation systems
//!    - Log the visible layers
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --ticks 60 --seed 7
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};

use spritelayers::components::actoranimation::ActorAnimation;
use spritelayers::components::direction::Direction;
use spritelayers::components::sprite::{LayeredSprite, PartSlot, SpriteHandle};
use spritelayers::events::animation::{AnimationFinishedEvent, DirectionChangedEvent};
use spritelayers::resources::animationconfig::AnimationConfig;
use spritelayers::resources::animationtable::AnimationCategory;
use spritelayers::resources::partstore::PartStore;
use spritelayers::resources::worldtime::WorldTime;
use spritelayers::systems::actoranimation::{actor_animation_system, set_actor_direction};
use spritelayers::systems::partsync::refresh_part_libraries;
use spritelayers::systems::time::update_world_time;

/// Layered sprite animation preview
#[derive(Parser)]
#[command(version, about = "Runs a layered actor animation headless and logs every frame.")]
struct Cli {
    /// INI file with playback settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON animation table, overrides the one named in the config file.
    #[arg(long, value_name = "PATH")]
    table: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 30)]
    ticks: u32,

    /// Frame delta in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Seed for random turns and one-shots.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Print the animation table as JSON and exit.
    #[arg(long)]
    dump_table: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnimationConfig::with_path(path),
        None => AnimationConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("Config file not found or invalid, using defaults: {}", e);
    }
    if let Some(path) = &cli.table {
        config.table_path = Some(path.clone());
    }

    let table = match config.load_table() {
        Ok(table) => Arc::new(table),
        Err(e) => {
            error!("Could not load animation table: {}", e);
            std::process::exit(1);
        }
    };

    // Early-exit: dump the table and quit
    if cli.dump_table {
        match table.to_json_string() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(config.clone());

    let mut store = PartStore::new();
    let sprite_count = table.required_sprites() as u32;
    for (name, slot) in [
        ("body_01", PartSlot::Body),
        ("outfit_farmer", PartSlot::Outfit),
        ("eyes_blue", PartSlot::Eyes),
        ("hair_short", PartSlot::Hairstyle),
    ] {
        if let Err(e) = store.insert(name, slot, SpriteHandle::sheet(name, sprite_count), &table) {
            error!("Could not import part {}: {}", name, e);
            std::process::exit(1);
        }
    }

    let mut actor = ActorAnimation::new(table.clone(), config.playback());
    for slot in PartSlot::ALL {
        let Some(name) = store.parts_of_type(slot).into_iter().next() else {
            info!("No {} part imported, slot stays empty", slot);
            continue;
        };
        if let Some(part) = store.get(&name) {
            actor.equip_part(slot, part);
        }
    }
    world.insert_resource(store);
    let entity = world.spawn((actor, LayeredSprite::default())).id();

    world.add_observer(|trigger: On<AnimationFinishedEvent>| {
        let event = trigger.event();
        if event.one_shot {
            info!("{:?} finished one-shot {}", event.entity, event.category);
        }
    });
    world.add_observer(|trigger: On<DirectionChangedEvent>| {
        let event = trigger.event();
        info!("{:?} turned {} -> {}", event.entity, event.from, event.to);
    });
    world.flush();

    let turn = world.register_system(set_actor_direction);
    let mut schedule = Schedule::default();
    schedule.add_systems((refresh_part_libraries, actor_animation_system).chain());

    let mut rng = fastrand::Rng::with_seed(cli.seed);
    let one_shots: Vec<AnimationCategory> = table
        .descriptors()
        .iter()
        .filter(|d| !d.loops)
        .map(|d| d.category)
        .collect();

    info!(
        "Previewing {} frames at dt={} (frame duration {}s)",
        cli.ticks, cli.dt, config.frame_duration
    );

    for frame in 0..cli.ticks {
        update_world_time(&mut world, cli.dt);

        match rng.u8(0..20) {
            0 => {
                let direction = Direction::BUILD_ORDER[rng.usize(0..4)];
                if let Err(e) = world.run_system_with(turn, (entity, direction)) {
                    warn!("Could not turn actor: {}", e);
                }
            }
            1 if !one_shots.is_empty() => {
                let category = one_shots[rng.usize(0..one_shots.len())];
                if let Some(mut actor) = world.get_mut::<ActorAnimation>(entity) {
                    if !actor.play_one_shot_animation(category, true, None) {
                        info!("frame {}: {} rejected, actor is locked", frame, category);
                    }
                }
            }
            2 => {
                let category = if rng.bool() {
                    AnimationCategory::Walking
                } else {
                    AnimationCategory::Idle
                };
                if let Some(mut actor) = world.get_mut::<ActorAnimation>(entity) {
                    actor.set_looping_animation(category);
                }
            }
            _ => {}
        }

        schedule.run(&mut world);

        if let (Some(actor), Some(sprite)) = (
            world.get::<ActorAnimation>(entity),
            world.get::<LayeredSprite>(entity),
        ) {
            let layers: Vec<String> = sprite
                .frame
                .visible()
                .iter()
                .map(|(slot, handle)| format!("{}={}#{}", slot, handle.tex_key, handle.slice))
                .collect();
            info!(
                "frame {:>3}: {} {} [{}]",
                frame,
                actor.current_animation(),
                actor.direction(),
                layers.join(", ")
            );
        }
    }
}
