//! Animation events.
//!
//! [`actor_animation_system`] triggers an [`AnimationFinishedEvent`] every
//! time an actor reaches the completion frame of its animation: once per
//! cycle for looping animations, once in total for a one-shot (right after
//! the actor went back to its looping animation). [`set_actor_direction`]
//! triggers a [`DirectionChangedEvent`] when the facing actually changed.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<AnimationFinishedEvent>| {
//!     let event = trigger.event();
//!     if event.one_shot && event.category == AnimationCategory::Hitting {
//!         // apply damage, play a sound, ...
//!     }
//! });
//! ```
//!
//! [`actor_animation_system`]: crate::systems::actoranimation::actor_animation_system
//! [`set_actor_direction`]: crate::systems::actoranimation::set_actor_direction

use bevy_ecs::prelude::*;

use crate::components::direction::Direction;
use crate::resources::animationtable::AnimationCategory;

/// An actor reached the completion frame of `category`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFinishedEvent {
    pub entity: Entity,
    pub category: AnimationCategory,
    /// `true` when a one-shot finished and the actor was restored.
    pub one_shot: bool,
}

/// An actor turned to face `to`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionChangedEvent {
    pub entity: Entity,
    pub from: Direction,
    pub to: Direction,
}
