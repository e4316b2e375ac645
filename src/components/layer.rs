//! One body-part layer of an actor.
//!
//! A [`LayerController`] binds a slot to the library of whatever part is
//! equipped there and answers "which sprite for this key" once per resolution
//! pass. An empty slot, or a key the part's library does not have (an old
//! asset built before a category existed), resolves to `None`.

use std::sync::Arc;

use crate::components::direction::Direction;
use crate::components::sprite::{PartSlot, SpriteHandle};
use crate::resources::animationlibrary::AnimationLibrary;
use crate::resources::animationtable::AnimationCategory;
use crate::resources::partstore::SpritePart;

/// Name and revision of the part a layer was bound from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartBinding {
    pub name: Arc<str>,
    pub revision: u64,
}

#[derive(Clone, Debug)]
pub struct LayerController {
    pub slot: PartSlot,
    library: Option<Arc<AnimationLibrary>>,
    binding: Option<PartBinding>,
}

impl LayerController {
    pub fn new(slot: PartSlot) -> Self {
        Self {
            slot,
            library: None,
            binding: None,
        }
    }

    /// Replace the active library. `None` empties the slot.
    ///
    /// A library set this way is not tied to a stored part, so
    /// [`refresh_part_libraries`](crate::systems::partsync::refresh_part_libraries)
    /// leaves it alone.
    pub fn set_library(&mut self, library: Option<Arc<AnimationLibrary>>) {
        self.library = library;
        self.binding = None;
    }

    /// Show `part` in this layer and remember where the library came from.
    pub fn bind_part(&mut self, part: &SpritePart) {
        self.library = Some(part.library().clone());
        self.binding = Some(PartBinding {
            name: part.name.clone(),
            revision: part.revision(),
        });
    }

    /// Empty the slot. Returns `false` if it was already empty.
    pub fn clear(&mut self) -> bool {
        self.binding = None;
        self.library.take().is_some()
    }

    pub fn library(&self) -> Option<&Arc<AnimationLibrary>> {
        self.library.as_ref()
    }

    pub fn binding(&self) -> Option<&PartBinding> {
        self.binding.as_ref()
    }

    pub fn is_populated(&self) -> bool {
        self.library.is_some()
    }

    pub fn resolve(
        &self,
        category: AnimationCategory,
        direction: Direction,
        frame: usize,
    ) -> Option<SpriteHandle> {
        self.library
            .as_ref()?
            .lookup(category, direction, frame)
            .cloned()
    }
}
