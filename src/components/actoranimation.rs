//! Layered actor animation state machine.
//!
//! An [`ActorAnimation`] drives up to five [`LayerController`]s (body,
//! outfit, eyes, hairstyle, accessory) with one shared clock, so every layer
//! always shows the same `(animation, direction, frame)`.
//!
//! # States
//!
//! - `Looping` – the current animation repeats until told otherwise.
//! - `OneShot` – a single pass of an animation, after which the actor goes
//!   back to the looping animation it was playing before. A locked one-shot
//!   rejects every other animation request until it finishes.
//!
//! # Completion timing
//!
//! Completion fires after displaying frame
//! `frames_per_direction - 1 - completion_lead_frames`. The default lead of
//! [`COMPLETION_LEAD_FRAMES`] (one frame early) matches how existing
//! gameplay content was timed; a lead of 0 fires right after the last frame.
//!
//! # Related
//!
//! - [`crate::systems::actoranimation::actor_animation_system`] – ticks actors every frame
//! - [`crate::resources::partstore::PartStore`] – where equipped parts come from

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::Component;
use log::{debug, warn};

use crate::components::direction::Direction;
use crate::components::layer::LayerController;
use crate::components::sprite::{PartSlot, ResolvedFrame};
use crate::error::AnimationError;
use crate::resources::animationlibrary::AnimationLibrary;
use crate::resources::animationtable::{AnimationCategory, AnimationDescriptor, AnimationTable};
use crate::resources::partstore::{PartStore, SpritePart};

/// Frames before the last one at which completion fires by default.
pub const COMPLETION_LEAD_FRAMES: usize = 1;

/// Called once when a one-shot animation completes.
pub type CompletionCallback = Box<dyn FnOnce() + Send + Sync + 'static>;

/// Per-actor playback tuning, usually taken from
/// [`AnimationConfig`](crate::resources::animationconfig::AnimationConfig).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackSettings {
    pub frame_duration: f32,
    pub completion_lead_frames: usize,
    pub reset_frame_on_loop_switch: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            frame_duration: 0.1,
            completion_lead_frames: COMPLETION_LEAD_FRAMES,
            reset_frame_on_loop_switch: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Looping {
        current: AnimationCategory,
    },
    OneShot {
        current: AnimationCategory,
        base: AnimationCategory,
        locked: bool,
    },
}

/// An animation that reached its completion frame during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub category: AnimationCategory,
    pub one_shot: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// A resolution pass happened and the frame advanced.
    pub advanced: bool,
    pub completed: Option<Completion>,
}

#[derive(Component)]
pub struct ActorAnimation {
    table: Arc<AnimationTable>,
    settings: PlaybackSettings,
    layers: [LayerController; PartSlot::COUNT],
    direction: Direction,
    state: PlaybackState,
    descriptor: AnimationDescriptor,
    frame_index: usize,
    tick_remaining: f32,
    on_complete: Option<CompletionCallback>,
    resolved: ResolvedFrame,
    resolution_passes: u64,
    needs_rebind: bool,
}

impl ActorAnimation {
    /// New actor facing south, looping the table's default animation. The
    /// first tick displays frame 0 right away.
    pub fn new(table: Arc<AnimationTable>, settings: PlaybackSettings) -> Self {
        let descriptor = *table.default_descriptor();
        Self {
            table,
            settings,
            layers: PartSlot::ALL.map(LayerController::new),
            direction: Direction::CANONICAL,
            state: PlaybackState::Looping {
                current: descriptor.category,
            },
            descriptor,
            frame_index: 0,
            tick_remaining: 0.0,
            on_complete: None,
            resolved: ResolvedFrame::default(),
            resolution_passes: 0,
            needs_rebind: false,
        }
    }

    pub fn table(&self) -> &Arc<AnimationTable> {
        &self.table
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_animation(&self) -> AnimationCategory {
        match self.state {
            PlaybackState::Looping { current } => current,
            PlaybackState::OneShot { current, .. } => current,
        }
    }

    /// Animation restored when the in-flight one-shot completes.
    pub fn base_animation(&self) -> Option<AnimationCategory> {
        match self.state {
            PlaybackState::Looping { .. } => None,
            PlaybackState::OneShot { base, .. } => Some(base),
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, PlaybackState::OneShot { locked: true, .. })
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn tick_remaining(&self) -> f32 {
        self.tick_remaining
    }

    pub fn has_pending_callback(&self) -> bool {
        self.on_complete.is_some()
    }

    /// Sprites of the latest resolution pass.
    pub fn resolved(&self) -> &ResolvedFrame {
        &self.resolved
    }

    pub fn resolution_passes(&self) -> u64 {
        self.resolution_passes
    }

    /// A part was equipped since the last [`rebind_from_store`](Self::rebind_from_store).
    pub fn needs_rebind(&self) -> bool {
        self.needs_rebind
    }

    pub fn layer(&self, slot: PartSlot) -> &LayerController {
        &self.layers[slot.index()]
    }

    /// Frame index after whose display completion fires.
    pub fn completion_frame(&self) -> usize {
        self.descriptor
            .frames_per_direction
            .saturating_sub(1 + self.settings.completion_lead_frames)
    }

    /// Turn the actor. A real change re-resolves every layer immediately so
    /// the new facing shows without waiting for the next tick.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction == self.direction {
            return false;
        }
        self.direction = direction;
        self.resolve_pass();
        true
    }

    /// Switch the looping animation. Rejected while locked.
    ///
    /// An unlocked one-shot in flight is cancelled and its callback dropped.
    pub fn set_looping_animation(&mut self, category: AnimationCategory) -> bool {
        if self.is_locked() {
            return false;
        }
        let Some(descriptor) = self.table.get(category).copied() else {
            warn!("set_looping_animation: {} is not in the animation table", category);
            return false;
        };
        match self.state {
            PlaybackState::Looping { current } if current == category => return true,
            PlaybackState::OneShot { current, .. } => {
                debug!("set_looping_animation: cancelling one-shot {}", current);
                self.on_complete = None;
            }
            PlaybackState::Looping { .. } => {}
        }
        self.state = PlaybackState::Looping { current: category };
        self.descriptor = descriptor;
        if self.settings.reset_frame_on_loop_switch
            || self.frame_index >= descriptor.frames_per_direction
        {
            self.frame_index = 0;
        }
        true
    }

    pub fn set_looping_animation_named(&mut self, name: &str) -> Result<bool, AnimationError> {
        let category = self.table.category(name)?;
        Ok(self.set_looping_animation(category))
    }

    /// Play `category` once from frame 0, then return to the animation that
    /// was looping. Rejected while locked.
    ///
    /// A previous unlocked one-shot is replaced: its callback is dropped
    /// without being called and the original looping animation stays the one
    /// to restore.
    pub fn play_one_shot_animation(
        &mut self,
        category: AnimationCategory,
        lock: bool,
        on_complete: Option<CompletionCallback>,
    ) -> bool {
        if self.is_locked() {
            return false;
        }
        let Some(descriptor) = self.table.get(category).copied() else {
            warn!("play_one_shot_animation: {} is not in the animation table", category);
            return false;
        };
        let base = match self.state {
            PlaybackState::Looping { current } => current,
            PlaybackState::OneShot { base, .. } => base,
        };
        self.state = PlaybackState::OneShot {
            current: category,
            base,
            locked: lock,
        };
        self.descriptor = descriptor;
        self.frame_index = 0;
        self.on_complete = on_complete;
        true
    }

    pub fn play_one_shot_named(
        &mut self,
        name: &str,
        lock: bool,
        on_complete: Option<CompletionCallback>,
    ) -> Result<bool, AnimationError> {
        let category = self.table.category(name)?;
        Ok(self.play_one_shot_animation(category, lock, on_complete))
    }

    /// Show `part` in `slot`. Rejects parts imported for another slot.
    ///
    /// `part` may be an older revision than the one in the store; the next
    /// [`rebind_from_store`](Self::rebind_from_store) moves the layer to the
    /// current library.
    pub fn equip_part(&mut self, slot: PartSlot, part: &SpritePart) -> bool {
        if part.part_type != slot {
            warn!(
                "equip_part: part '{}' is a {} part, not {}",
                part.name, part.part_type, slot
            );
            return false;
        }
        self.layers[slot.index()].bind_part(part);
        self.needs_rebind = true;
        true
    }

    /// Empty `slot`. Its sprite disappears immediately.
    pub fn remove_part(&mut self, slot: PartSlot) -> bool {
        self.resolved.layers[slot.index()] = None;
        self.layers[slot.index()].clear()
    }

    /// Point `slot` at a library directly, or empty it with `None`.
    pub fn update_part_library(&mut self, slot: PartSlot, library: Option<Arc<AnimationLibrary>>) {
        self.layers[slot.index()].set_library(library);
    }

    /// Re-bind layers whose part was rebuilt or removed in `store`.
    ///
    /// Returns the number of layers that changed.
    pub fn rebind_from_store(&mut self, store: &PartStore) -> usize {
        self.needs_rebind = false;
        let mut changed = 0;
        for layer in self.layers.iter_mut() {
            let Some(binding) = layer.binding().cloned() else {
                continue;
            };
            match store.get(&binding.name) {
                Some(part) if part.part_type != layer.slot => {
                    layer.clear();
                    changed += 1;
                }
                Some(part) if part.revision() != binding.revision => {
                    layer.bind_part(part);
                    changed += 1;
                }
                Some(_) => {}
                None => {
                    layer.clear();
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Advance the shared clock by `delta` seconds.
    ///
    /// When the frame timer runs out every layer resolves the current frame,
    /// the timer restarts and the frame index advances (wrapping). Reaching
    /// the completion frame finishes a one-shot: the looping animation is
    /// restored and unlocked first, then the callback runs once.
    pub fn tick(&mut self, delta: f32) -> TickOutcome {
        self.tick_remaining -= delta;
        if self.tick_remaining > 0.0 {
            return TickOutcome::default();
        }

        self.resolve_pass();
        self.tick_remaining = self.settings.frame_duration;

        let displayed = self.frame_index;
        self.frame_index = (displayed + 1) % self.descriptor.frames_per_direction;

        let completed = if displayed == self.completion_frame() {
            Some(self.complete())
        } else {
            None
        };

        TickOutcome {
            advanced: true,
            completed,
        }
    }

    fn complete(&mut self) -> Completion {
        match self.state {
            PlaybackState::Looping { current } => Completion {
                category: current,
                one_shot: false,
            },
            PlaybackState::OneShot { current, base, .. } => {
                self.state = PlaybackState::Looping { current: base };
                self.descriptor = self.table.get(base).copied().unwrap_or(self.descriptor);
                self.frame_index = 0;
                if let Some(callback) = self.on_complete.take() {
                    callback();
                }
                Completion {
                    category: current,
                    one_shot: true,
                }
            }
        }
    }

    fn resolve_pass(&mut self) {
        let category = self.current_animation();
        let direction = self.descriptor.effective_direction(self.direction);
        for (layer, out) in self.layers.iter().zip(self.resolved.layers.iter_mut()) {
            *out = layer.resolve(category, direction, self.frame_index);
        }
        self.resolution_passes += 1;
    }
}

impl fmt::Debug for ActorAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorAnimation")
            .field("direction", &self.direction)
            .field("state", &self.state)
            .field("frame_index", &self.frame_index)
            .field("tick_remaining", &self.tick_remaining)
            .field("pending_callback", &self.on_complete.is_some())
            .field("resolution_passes", &self.resolution_passes)
            .field("needs_rebind", &self.needs_rebind)
            .finish()
    }
}
