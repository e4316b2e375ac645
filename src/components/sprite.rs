//! Sprite handles, body-part slots and the per-actor layered sprite output.
//!
//! A [`SpriteHandle`] is whatever the asset pipeline hands over for one slice
//! of a sprite sheet: a texture key plus the slice index in that sheet. The
//! animation runtime never looks inside it, it only moves handles from a
//! library to the [`LayeredSprite`] component that rendering reads.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::error::AnimationError;

/// Opaque reference to one slice of a sprite-sheet texture.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteHandle {
    pub tex_key: Arc<str>,
    pub slice: u32,
}

impl SpriteHandle {
    pub fn new(tex_key: impl Into<Arc<str>>, slice: u32) -> Self {
        Self {
            tex_key: tex_key.into(),
            slice,
        }
    }

    /// Handles for every slice of one sheet, in flat index order.
    pub fn sheet(tex_key: &str, count: u32) -> Vec<SpriteHandle> {
        let key: Arc<str> = Arc::from(tex_key);
        (0..count)
            .map(|slice| SpriteHandle {
                tex_key: key.clone(),
                slice,
            })
            .collect()
    }
}

/// One of the five fixed body-part layers of an actor.
///
/// Declaration order is the draw order (bottom to top).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PartSlot {
    Body,
    Outfit,
    Eyes,
    Hairstyle,
    Accessory,
}

impl PartSlot {
    pub const COUNT: usize = 5;

    pub const ALL: [PartSlot; PartSlot::COUNT] = [
        PartSlot::Body,
        PartSlot::Outfit,
        PartSlot::Eyes,
        PartSlot::Hairstyle,
        PartSlot::Accessory,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PartSlot::Body => "body",
            PartSlot::Outfit => "outfit",
            PartSlot::Eyes => "eyes",
            PartSlot::Hairstyle => "hairstyle",
            PartSlot::Accessory => "accessory",
        }
    }
}

impl fmt::Display for PartSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartSlot {
    type Err = AnimationError;

    /// Accepts singular and plural forms, as asset folders use both.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "body" | "bodies" => Ok(PartSlot::Body),
            "outfit" | "outfits" => Ok(PartSlot::Outfit),
            "eyes" => Ok(PartSlot::Eyes),
            "hairstyle" | "hairstyles" | "hair" => Ok(PartSlot::Hairstyle),
            "accessory" | "accessories" => Ok(PartSlot::Accessory),
            _ => Err(AnimationError::UnknownSlot(s.to_string())),
        }
    }
}

/// Sprites resolved for every slot during one resolution pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedFrame {
    pub layers: [Option<SpriteHandle>; PartSlot::COUNT],
}

impl ResolvedFrame {
    pub fn get(&self, slot: PartSlot) -> Option<&SpriteHandle> {
        self.layers[slot.index()].as_ref()
    }

    /// Populated layers in draw order.
    pub fn visible(&self) -> ArrayVec<(PartSlot, &SpriteHandle), { PartSlot::COUNT }> {
        PartSlot::ALL
            .iter()
            .filter_map(|slot| self.get(*slot).map(|handle| (*slot, handle)))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Option::is_none)
    }
}

/// What rendering draws for an actor: the sprites of its latest resolution pass.
#[derive(Component, Clone, Debug, Default)]
pub struct LayeredSprite {
    pub frame: ResolvedFrame,
}
