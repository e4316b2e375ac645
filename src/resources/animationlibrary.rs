//! Sprite-sheet to animation library builder.
//!
//! A sprite sheet arrives from the asset pipeline as a flat, index-ordered
//! list of slices. [`build_library`] walks the [`AnimationTable`] in order
//! with a cursor and assigns each slice to an [`AnimationKey`], so that at
//! runtime a sprite is found by `(category, direction, frame)` instead of by
//! its position in the sheet.
//!
//! Libraries are immutable once built. A sheet that changes gets a fresh
//! library which replaces the old one wholesale.

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::direction::Direction;
use crate::components::sprite::SpriteHandle;
use crate::error::LibraryBuildError;
use crate::resources::animationtable::{AnimationCategory, AnimationTable};

/// Symbolic lookup key of a single sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationKey {
    pub category: AnimationCategory,
    pub direction: Direction,
    pub frame: usize,
}

impl AnimationKey {
    pub fn new(category: AnimationCategory, direction: Direction, frame: usize) -> Self {
        Self {
            category,
            direction,
            frame,
        }
    }
}

/// Mapping from [`AnimationKey`] to the sprite built for it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationLibrary {
    entries: FxHashMap<AnimationKey, SpriteHandle>,
}

impl AnimationLibrary {
    pub fn get(&self, key: &AnimationKey) -> Option<&SpriteHandle> {
        self.entries.get(key)
    }

    pub fn lookup(
        &self,
        category: AnimationCategory,
        direction: Direction,
        frame: usize,
    ) -> Option<&SpriteHandle> {
        self.entries.get(&AnimationKey::new(category, direction, frame))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in a stable order, for comparisons and tooling output.
    pub fn keys_sorted(&self) -> Vec<AnimationKey> {
        let mut keys: Vec<AnimationKey> = self.entries.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Position in the flat sheet that `key` was built from, under `table`.
    ///
    /// Returns `None` if the table does not lay out that key.
    pub fn flat_index_of(key: &AnimationKey, table: &AnimationTable) -> Option<usize> {
        let descriptor = table.get(key.category)?;
        if key.frame >= descriptor.frames_per_direction {
            return None;
        }
        let strip = descriptor
            .stored_directions()
            .iter()
            .position(|d| *d == key.direction)?;
        let start = table.span_of(key.category)?.start;
        Some(start + strip * descriptor.frames_per_direction + key.frame)
    }
}

/// Build the animation library of one sprite sheet.
///
/// Descriptors are consumed in table order; direction-dependent ones take a
/// strip per direction in [`Direction::BUILD_ORDER`], the others a single
/// strip for [`Direction::CANONICAL`]. Slices past the end of the layout are
/// ignored. The result only depends on the inputs, so rebuilding an unchanged
/// sheet yields an identical library.
pub fn build_library(
    sprites: &[SpriteHandle],
    table: &AnimationTable,
) -> Result<AnimationLibrary, LibraryBuildError> {
    let mut library = AnimationLibrary {
        entries: FxHashMap::with_capacity_and_hasher(table.required_sprites(), Default::default()),
    };
    let mut cursor = 0;

    for descriptor in table.descriptors() {
        for &direction in descriptor.stored_directions() {
            for frame in 0..descriptor.frames_per_direction {
                let Some(sprite) = sprites.get(cursor) else {
                    return Err(LibraryBuildError {
                        category: descriptor.category,
                        direction,
                        frame,
                        cursor,
                        available: sprites.len(),
                        partial: library,
                    });
                };
                library.entries.insert(
                    AnimationKey::new(descriptor.category, direction, frame),
                    sprite.clone(),
                );
                cursor += 1;
            }
        }
    }

    if cursor < sprites.len() {
        debug!(
            "build_library: {} trailing sprites past the table layout ignored",
            sprites.len() - cursor
        );
    }

    Ok(library)
}
