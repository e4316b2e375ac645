//! Layered sprite actor animation.
//!
//! This crate composes a character out of independently swappable sprite
//! parts (body, outfit, eyes, hairstyle, accessory) and animates all of them
//! in lock-step. It exposes its ECS components, resources, systems, and
//! events for use by a host game loop and by integration tests.

pub mod components;
pub mod error;
pub mod events;
pub mod resources;
pub mod systems;
