//! ECS components for actors.
//!
//! Submodules overview:
//! - [`actoranimation`] – shared-clock state machine driving all layers of an actor
//! - [`direction`] – facing direction and sheet direction order
//! - [`layer`] – one body-part slot bound to a part's animation library
//! - [`sprite`] – sprite handles, part slots and the layered sprite output

pub mod actoranimation;
pub mod direction;
pub mod layer;
pub mod sprite;
