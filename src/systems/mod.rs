//! Engine systems.
//!
//! Submodules overview
//! - [`actoranimation`] – tick actor animations and turn actors
//! - [`partsync`] – re-bind actor layers after part libraries are rebuilt
//! - [`time`] – update simulation time and delta

pub mod actoranimation;
pub mod partsync;
pub mod time;
