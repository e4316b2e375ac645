//! Sprite part registry.
//!
//! The [`PartStore`] owns every imported [`SpritePart`] and is inserted into
//! the world as a resource, so systems and tools that need a part by name get
//! it through the ECS instead of a global. Actors never own parts: their
//! layers hold a shared pointer to the part's [`AnimationLibrary`].
//!
//! Rebuilding a part's library never mutates the old one. A new library is
//! built next to it and swapped in only if the build succeeded; actors that
//! still point to the old library keep rendering it until
//! [`refresh_part_libraries`] re-binds them.
//!
//! [`refresh_part_libraries`]: crate::systems::partsync::refresh_part_libraries

use std::sync::Arc;

use bevy_ecs::prelude::Resource;
use log::{info, warn};
use rustc_hash::FxHashMap;

use crate::components::sprite::{PartSlot, SpriteHandle};
use crate::error::{LibraryBuildError, PartError};
use crate::resources::animationlibrary::{AnimationLibrary, build_library};
use crate::resources::animationtable::AnimationTable;

/// One imported layer sheet (a body, an outfit, a pair of eyes...).
#[derive(Debug, Clone)]
pub struct SpritePart {
    pub name: Arc<str>,
    pub part_type: PartSlot,
    sprites: Vec<SpriteHandle>,
    library: Arc<AnimationLibrary>,
    revision: u64,
}

impl SpritePart {
    /// Create a part and build its library against `table`.
    pub fn new(
        name: impl Into<Arc<str>>,
        part_type: PartSlot,
        sprites: Vec<SpriteHandle>,
        table: &AnimationTable,
    ) -> Result<Self, LibraryBuildError> {
        let library = build_library(&sprites, table)?;
        Ok(Self {
            name: name.into(),
            part_type,
            sprites,
            library: Arc::new(library),
            revision: 0,
        })
    }

    pub fn sprites(&self) -> &[SpriteHandle] {
        &self.sprites
    }

    pub fn library(&self) -> &Arc<AnimationLibrary> {
        &self.library
    }

    /// Bumped every time the library is rebuilt.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the sprite sequence and rebuild the library.
    ///
    /// On failure the part keeps its previous sprites and library.
    pub fn set_sprites(
        &mut self,
        sprites: Vec<SpriteHandle>,
        table: &AnimationTable,
    ) -> Result<(), LibraryBuildError> {
        let library = build_library(&sprites, table)?;
        self.sprites = sprites;
        self.library = Arc::new(library);
        self.revision += 1;
        Ok(())
    }
}

/// Registry of every imported part, keyed by name.
#[derive(Resource, Debug, Default)]
pub struct PartStore {
    parts: FxHashMap<Arc<str>, Arc<SpritePart>>,
    next_revision: u64,
}

impl PartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and register a part. An existing part with the same name is
    /// replaced, and the new one gets a higher revision.
    pub fn insert(
        &mut self,
        name: &str,
        part_type: PartSlot,
        sprites: Vec<SpriteHandle>,
        table: &AnimationTable,
    ) -> Result<Arc<SpritePart>, PartError> {
        let mut part =
            SpritePart::new(name, part_type, sprites, table).map_err(|source| PartError::Build {
                name: name.to_string(),
                source,
            })?;
        part.revision = self.bump_revision();
        let part = Arc::new(part);
        if self.parts.insert(part.name.clone(), part.clone()).is_some() {
            info!("PartStore: replaced part '{}'", name);
        }
        Ok(part)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<SpritePart>> {
        self.parts.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.parts.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Names of all parts of one type, sorted.
    pub fn parts_of_type(&self, part_type: PartSlot) -> Vec<Arc<str>> {
        let mut names: Vec<Arc<str>> = self
            .parts
            .values()
            .filter(|part| part.part_type == part_type)
            .map(|part| part.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Re-slice an existing part. The stored part is swapped for a rebuilt
    /// copy only when the new sprites fit the table.
    pub fn reassign_sprites(
        &mut self,
        name: &str,
        sprites: Vec<SpriteHandle>,
        table: &AnimationTable,
    ) -> Result<Arc<SpritePart>, PartError> {
        let current = self
            .parts
            .get(name)
            .ok_or_else(|| PartError::UnknownPart(name.to_string()))?;
        let mut rebuilt = SpritePart::clone(current);
        if let Err(source) = rebuilt.set_sprites(sprites, table) {
            warn!(
                "PartStore: keeping previous library of '{}', rebuild failed: {}",
                name, source
            );
            return Err(PartError::Build {
                name: name.to_string(),
                source,
            });
        }
        rebuilt.revision = self.bump_revision();
        let rebuilt = Arc::new(rebuilt);
        self.parts.insert(rebuilt.name.clone(), rebuilt.clone());
        Ok(rebuilt)
    }

    fn bump_revision(&mut self) -> u64 {
        self.next_revision += 1;
        self.next_revision
    }
}
