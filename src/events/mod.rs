//! Event types used by the animation systems.
//!
//! Submodules:
//! - [`animation`] – animation completion and direction change events

pub mod animation;
