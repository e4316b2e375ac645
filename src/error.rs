//! Error types.
//!
//! Only configuration problems are errors here. A missing part or a key that
//! a library does not contain is plain absence (`None`), and an animation
//! request made while an actor is locked is a `false` return value.
//!
//! - [`AnimationError`] – an external animation name could not be mapped
//! - [`LibraryBuildError`] – a sprite sequence is shorter than the table layout
//! - [`PartError`] – part store failures (unknown part, failed rebuild)
//! - [`ConfigError`] – INI or JSON configuration could not be read

use thiserror::Error;

use crate::components::direction::Direction;
use crate::resources::animationlibrary::AnimationLibrary;
use crate::resources::animationtable::AnimationCategory;

/// Failure to map an external animation name or build a descriptor table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationError {
    #[error("unknown animation name `{0}`")]
    UnknownAnimation(String),
    #[error("unknown direction `{0}`")]
    UnknownDirection(String),
    #[error("unknown part slot `{0}`")]
    UnknownSlot(String),
    #[error("animation `{0}` is not part of the active animation table")]
    NotInTable(AnimationCategory),
    #[error("animation `{0}` is declared more than once")]
    DuplicateCategory(AnimationCategory),
    #[error("animation `{0}` declares zero frames per direction")]
    ZeroFrames(AnimationCategory),
    #[error("animation table is empty")]
    EmptyTable,
}

/// The builder ran past the end of a sprite sequence.
///
/// `partial` holds every entry built before the failure. It is only useful
/// for diagnostics: a failed build must never be swapped into live use.
#[derive(Debug, Clone, Error)]
#[error(
    "sprite sequence too short at {category} {direction:?} frame {frame}: \
     needs index {cursor}, only {available} sprites available"
)]
pub struct LibraryBuildError {
    pub category: AnimationCategory,
    pub direction: Direction,
    pub frame: usize,
    pub cursor: usize,
    pub available: usize,
    pub partial: AnimationLibrary,
}

/// Part store failures.
#[derive(Debug, Clone, Error)]
pub enum PartError {
    #[error("no part named `{0}` in the part store")]
    UnknownPart(String),
    #[error("failed to build library for part `{name}`: {source}")]
    Build {
        name: String,
        #[source]
        source: LibraryBuildError,
    },
}

/// Configuration file failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Ini(String),
    #[error("failed to read animation table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid animation table json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Table(#[from] AnimationError),
}
