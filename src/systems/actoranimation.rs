//! Actor animation systems.
//!
//! - [`actor_animation_system`] ticks every [`ActorAnimation`] with the frame
//!   delta, copies freshly resolved sprites into [`LayeredSprite`] and
//!   triggers [`AnimationFinishedEvent`]s.
//! - [`set_actor_direction`] turns one actor and pushes the re-resolved
//!   sprites out in the same frame.
//!
//! # Animation Flow
//!
//! 1. Parts are imported into [`PartStore`](crate::resources::partstore::PartStore)
//!    and equipped on an actor's layers
//! 2. Each frame `update_world_time` writes the scaled delta into [`WorldTime`]
//! 3. `actor_animation_system` ticks the shared clock of every actor; when a
//!    frame is due each layer resolves `(animation, direction, frame)`
//! 4. Rendering draws the handles found in [`LayeredSprite`], bottom to top
//!
//! # Related
//!
//! - [`crate::components::actoranimation::ActorAnimation`] – per-actor state machine
//! - [`crate::events::animation`] – completion and direction events

use bevy_ecs::prelude::*;

use crate::components::actoranimation::ActorAnimation;
use crate::components::direction::Direction;
use crate::components::sprite::LayeredSprite;
use crate::events::animation::{AnimationFinishedEvent, DirectionChangedEvent};
use crate::resources::worldtime::WorldTime;

/// Advance every actor's animation clock.
///
/// Contract
/// - Reads [`WorldTime`] for the scaled delta.
/// - Mutates [`ActorAnimation`] state and, when its output differs, the
///   entity's [`LayeredSprite`].
/// - Triggers one [`AnimationFinishedEvent`] per completion.
pub fn actor_animation_system(
    world_time: Res<WorldTime>,
    mut query: Query<(Entity, &mut ActorAnimation, Option<&mut LayeredSprite>)>,
    mut commands: Commands,
) {
    for (entity, mut actor, maybe_sprite) in query.iter_mut() {
        let outcome = actor.tick(world_time.delta);

        if let Some(mut sprite) = maybe_sprite {
            if sprite.frame != *actor.resolved() {
                sprite.frame = actor.resolved().clone();
            }
        }

        if let Some(done) = outcome.completed {
            commands.trigger(AnimationFinishedEvent {
                entity,
                category: done.category,
                one_shot: done.one_shot,
            });
        }
    }
}

/// Turn `entity` to face `direction`.
///
/// Meant to be registered with `World::register_system` and run with
/// `run_system_with`. Returns `true` only if the facing changed; in that case
/// the layered sprite is updated immediately and a [`DirectionChangedEvent`]
/// is triggered.
pub fn set_actor_direction(
    In((entity, direction)): In<(Entity, Direction)>,
    mut query: Query<(&mut ActorAnimation, Option<&mut LayeredSprite>)>,
    mut commands: Commands,
) -> bool {
    let Ok((mut actor, maybe_sprite)) = query.get_mut(entity) else {
        return false;
    };
    let from = actor.direction();
    if !actor.set_direction(direction) {
        return false;
    }
    if let Some(mut sprite) = maybe_sprite {
        sprite.frame = actor.resolved().clone();
    }
    commands.trigger(DirectionChangedEvent {
        entity,
        from,
        to: direction,
    });
    true
}
