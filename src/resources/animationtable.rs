//! Animation descriptor table.
//!
//! The table is the single source of truth for how a sprite sheet is laid
//! out: descriptors are walked in order and each one occupies
//! `frames_per_direction` slices per stored direction (four for
//! direction-dependent animations, one otherwise). Every [`SpritePart`] of
//! the game is built against the same table.
//!
//! Animation names coming from tooling or gameplay scripts are plain strings.
//! They are mapped to the closed [`AnimationCategory`] enum once, at the
//! boundary ([`AnimationTable::category`]); past that point all lookups go
//! through a dense index.
//!
//! [`SpritePart`]: crate::resources::partstore::SpritePart

use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::components::direction::Direction;
use crate::error::{AnimationError, ConfigError};

/// Every animation the runtime knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnimationCategory {
    Idle,
    Walking,
    Running,
    Hitting,
    Pickup,
    Hurt,
    Dying,
    Sleeping,
}

impl AnimationCategory {
    pub const COUNT: usize = 8;

    pub const ALL: [AnimationCategory; AnimationCategory::COUNT] = [
        AnimationCategory::Idle,
        AnimationCategory::Walking,
        AnimationCategory::Running,
        AnimationCategory::Hitting,
        AnimationCategory::Pickup,
        AnimationCategory::Hurt,
        AnimationCategory::Dying,
        AnimationCategory::Sleeping,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnimationCategory::Idle => "Idle",
            AnimationCategory::Walking => "Walking",
            AnimationCategory::Running => "Running",
            AnimationCategory::Hitting => "Hitting",
            AnimationCategory::Pickup => "Pickup",
            AnimationCategory::Hurt => "Hurt",
            AnimationCategory::Dying => "Dying",
            AnimationCategory::Sleeping => "Sleeping",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AnimationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnimationCategory {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        AnimationCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| AnimationError::UnknownAnimation(s.to_string()))
    }
}

/// Immutable layout and playback rules of one animation category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationDescriptor {
    pub category: AnimationCategory,
    pub frames_per_direction: usize,
    pub direction_dependent: bool,
    pub loops: bool,
}

impl AnimationDescriptor {
    pub const fn new(
        category: AnimationCategory,
        frames_per_direction: usize,
        direction_dependent: bool,
        loops: bool,
    ) -> Self {
        Self {
            category,
            frames_per_direction,
            direction_dependent,
            loops,
        }
    }

    /// Directions stored in the sheet for this animation, in sheet order.
    pub fn stored_directions(&self) -> &'static [Direction] {
        if self.direction_dependent {
            &Direction::BUILD_ORDER
        } else {
            std::slice::from_ref(&Direction::CANONICAL)
        }
    }

    /// Number of slices this animation occupies in a sprite sheet.
    pub fn span(&self) -> usize {
        self.frames_per_direction * self.stored_directions().len()
    }

    /// Direction to look frames up with when the actor faces `facing`.
    pub fn effective_direction(&self, facing: Direction) -> Direction {
        if self.direction_dependent {
            facing
        } else {
            Direction::CANONICAL
        }
    }
}

const STANDARD_DESCRIPTORS: [AnimationDescriptor; 8] = [
    AnimationDescriptor::new(AnimationCategory::Idle, 6, true, true),
    AnimationDescriptor::new(AnimationCategory::Walking, 6, true, true),
    AnimationDescriptor::new(AnimationCategory::Running, 6, true, true),
    AnimationDescriptor::new(AnimationCategory::Hitting, 6, true, false),
    AnimationDescriptor::new(AnimationCategory::Pickup, 4, true, false),
    AnimationDescriptor::new(AnimationCategory::Hurt, 4, true, false),
    AnimationDescriptor::new(AnimationCategory::Dying, 6, false, false),
    AnimationDescriptor::new(AnimationCategory::Sleeping, 4, false, true),
];

/// Ordered, validated set of animation descriptors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AnimationDescriptor>", into = "Vec<AnimationDescriptor>")]
pub struct AnimationTable {
    descriptors: SmallVec<[AnimationDescriptor; 8]>,
    /// Position of each category in `descriptors`, by category index.
    index: [Option<usize>; AnimationCategory::COUNT],
}

impl AnimationTable {
    /// Build a table, rejecting empty tables, zero-frame descriptors and
    /// duplicate categories.
    pub fn new(
        descriptors: impl IntoIterator<Item = AnimationDescriptor>,
    ) -> Result<Self, AnimationError> {
        let descriptors: SmallVec<[AnimationDescriptor; 8]> = descriptors.into_iter().collect();
        if descriptors.is_empty() {
            return Err(AnimationError::EmptyTable);
        }
        let mut index = [None; AnimationCategory::COUNT];
        for (position, descriptor) in descriptors.iter().enumerate() {
            if descriptor.frames_per_direction == 0 {
                return Err(AnimationError::ZeroFrames(descriptor.category));
            }
            let slot = &mut index[descriptor.category.index()];
            if slot.is_some() {
                return Err(AnimationError::DuplicateCategory(descriptor.category));
            }
            *slot = Some(position);
        }
        Ok(Self { descriptors, index })
    }

    /// The layout used by the bundled character sheets.
    pub fn standard() -> Self {
        let mut index = [None; AnimationCategory::COUNT];
        for (position, descriptor) in STANDARD_DESCRIPTORS.iter().enumerate() {
            index[descriptor.category.index()] = Some(position);
        }
        Self {
            descriptors: SmallVec::from_buf(STANDARD_DESCRIPTORS),
            index,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Descriptors in sheet order.
    pub fn descriptors(&self) -> &[AnimationDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn contains(&self, category: AnimationCategory) -> bool {
        self.index[category.index()].is_some()
    }

    pub fn get(&self, category: AnimationCategory) -> Option<&AnimationDescriptor> {
        self.index[category.index()].map(|position| &self.descriptors[position])
    }

    /// Map an external animation name to a category of this table.
    ///
    /// Fails for names outside the vocabulary and for known categories this
    /// table does not declare.
    pub fn category(&self, name: &str) -> Result<AnimationCategory, AnimationError> {
        let category = name.parse::<AnimationCategory>()?;
        if self.contains(category) {
            Ok(category)
        } else {
            Err(AnimationError::NotInTable(category))
        }
    }

    /// Number of slices a sprite sheet needs to cover every descriptor.
    pub fn required_sprites(&self) -> usize {
        self.descriptors.iter().map(AnimationDescriptor::span).sum()
    }

    /// Flat index range a category occupies in a sprite sheet.
    pub fn span_of(&self, category: AnimationCategory) -> Option<Range<usize>> {
        let position = self.index[category.index()]?;
        let start: usize = self.descriptors[..position]
            .iter()
            .map(AnimationDescriptor::span)
            .sum();
        Some(start..start + self.descriptors[position].span())
    }

    /// Animation an actor starts in: `Idle` when declared, else the first one.
    pub fn default_descriptor(&self) -> &AnimationDescriptor {
        self.get(AnimationCategory::Idle)
            .unwrap_or(&self.descriptors[0])
    }

    pub fn default_category(&self) -> AnimationCategory {
        self.default_descriptor().category
    }
}

impl Default for AnimationTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<AnimationDescriptor>> for AnimationTable {
    type Error = AnimationError;

    fn try_from(value: Vec<AnimationDescriptor>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AnimationTable> for Vec<AnimationDescriptor> {
    fn from(value: AnimationTable) -> Self {
        value.descriptors.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_walk() -> AnimationTable {
        AnimationTable::new([
            AnimationDescriptor::new(AnimationCategory::Idle, 6, true, true),
            AnimationDescriptor::new(AnimationCategory::Walking, 6, true, true),
        ])
        .unwrap()
    }

    #[test]
    fn test_standard_table_is_valid() {
        let standard = AnimationTable::standard();
        let rebuilt = AnimationTable::new(standard.descriptors().iter().copied()).unwrap();
        assert_eq!(standard, rebuilt);
    }

    #[test]
    fn test_required_sprites_counts_directions() {
        // 4*6 + 4*6 + 4*6 + 4*6 + 4*4 + 4*4 + 6 + 4
        assert_eq!(AnimationTable::standard().required_sprites(), 138);
        assert_eq!(idle_walk().required_sprites(), 48);
    }

    #[test]
    fn test_span_of_follows_table_order() {
        let table = idle_walk();
        assert_eq!(table.span_of(AnimationCategory::Idle), Some(0..24));
        assert_eq!(table.span_of(AnimationCategory::Walking), Some(24..48));
        assert_eq!(table.span_of(AnimationCategory::Hurt), None);
    }

    #[test]
    fn test_fixed_direction_span_is_single_strip() {
        let table = AnimationTable::standard();
        assert_eq!(table.span_of(AnimationCategory::Dying), Some(128..134));
        assert_eq!(table.span_of(AnimationCategory::Sleeping), Some(134..138));
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = AnimationTable::new([
            AnimationDescriptor::new(AnimationCategory::Idle, 6, true, true),
            AnimationDescriptor::new(AnimationCategory::Idle, 4, false, true),
        ])
        .unwrap_err();
        assert_eq!(err, AnimationError::DuplicateCategory(AnimationCategory::Idle));
    }

    #[test]
    fn test_rejects_zero_frames_and_empty() {
        let err = AnimationTable::new([AnimationDescriptor::new(
            AnimationCategory::Hurt,
            0,
            true,
            false,
        )])
        .unwrap_err();
        assert_eq!(err, AnimationError::ZeroFrames(AnimationCategory::Hurt));
        assert_eq!(
            AnimationTable::new(Vec::new()).unwrap_err(),
            AnimationError::EmptyTable
        );
    }

    #[test]
    fn test_category_lookup_at_boundary() {
        let table = idle_walk();
        assert_eq!(table.category("walking"), Ok(AnimationCategory::Walking));
        assert_eq!(
            table.category("Hitting"),
            Err(AnimationError::NotInTable(AnimationCategory::Hitting))
        );
        assert_eq!(
            table.category("Moonwalk"),
            Err(AnimationError::UnknownAnimation("Moonwalk".to_string()))
        );
    }

    #[test]
    fn test_effective_direction() {
        let table = AnimationTable::standard();
        let dying = table.get(AnimationCategory::Dying).unwrap();
        let walking = table.get(AnimationCategory::Walking).unwrap();
        assert_eq!(dying.effective_direction(Direction::East), Direction::South);
        assert_eq!(walking.effective_direction(Direction::East), Direction::East);
    }

    #[test]
    fn test_default_category_without_idle() {
        let table = AnimationTable::new([AnimationDescriptor::new(
            AnimationCategory::Sleeping,
            4,
            false,
            true,
        )])
        .unwrap();
        assert_eq!(table.default_category(), AnimationCategory::Sleeping);
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let table = AnimationTable::standard();
        let json = table.to_json_string().unwrap();
        let loaded = AnimationTable::from_json_str(&json).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_json_load_validates() {
        let json = r#"[
            {"category":"Idle","frames_per_direction":6,"direction_dependent":true,"loops":true},
            {"category":"Idle","frames_per_direction":6,"direction_dependent":true,"loops":true}
        ]"#;
        assert!(AnimationTable::from_json_str(json).is_err());
    }
}
