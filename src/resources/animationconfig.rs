//! Animation configuration resource.
//!
//! Playback settings loaded from an INI configuration file. Provides defaults
//! for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [animation]
//! frame_duration = 0.1
//! completion_lead_frames = 1
//! reset_frame_on_loop_switch = true
//!
//! [table]
//! path = assets/animations.json
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::components::actoranimation::{COMPLETION_LEAD_FRAMES, PlaybackSettings};
use crate::error::ConfigError;
use crate::resources::animationtable::AnimationTable;

/// Default safe values for startup
const DEFAULT_FRAME_DURATION: f32 = 0.1;
const DEFAULT_RESET_FRAME_ON_LOOP_SWITCH: bool = true;
const DEFAULT_CONFIG_PATH: &str = "./animation.ini";

/// Animation configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct AnimationConfig {
    /// Seconds each frame stays on screen.
    pub frame_duration: f32,
    /// How many frames before the last one completion fires.
    pub completion_lead_frames: usize,
    /// Restart at frame 0 when switching between looping animations.
    pub reset_frame_on_loop_switch: bool,
    /// Optional JSON file overriding the standard animation table.
    pub table_path: Option<PathBuf>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            frame_duration: DEFAULT_FRAME_DURATION,
            completion_lead_frames: COMPLETION_LEAD_FRAMES,
            reset_frame_on_loop_switch: DEFAULT_RESET_FRAME_ON_LOOP_SWITCH,
            table_path: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. A non-positive
    /// frame duration is ignored.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(ConfigError::Ini)?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.read(text.to_string()).map_err(ConfigError::Ini)?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [animation] section
        if let Some(duration) = config.getfloat("animation", "frame_duration").ok().flatten() {
            if duration > 0.0 {
                self.frame_duration = duration as f32;
            }
        }
        if let Some(lead) = config
            .getuint("animation", "completion_lead_frames")
            .ok()
            .flatten()
        {
            self.completion_lead_frames = lead as usize;
        }
        if let Some(reset) = config
            .getbool("animation", "reset_frame_on_loop_switch")
            .ok()
            .flatten()
        {
            self.reset_frame_on_loop_switch = reset;
        }

        // [table] section
        if let Some(path) = config.get("table", "path") {
            if !path.trim().is_empty() {
                self.table_path = Some(PathBuf::from(path.trim()));
            }
        }

        info!(
            "Loaded animation config: frame_duration={}, completion_lead_frames={}, reset_frame_on_loop_switch={}, table={:?}",
            self.frame_duration,
            self.completion_lead_frames,
            self.reset_frame_on_loop_switch,
            self.table_path
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();

        // [animation] section
        config.set(
            "animation",
            "frame_duration",
            Some(self.frame_duration.to_string()),
        );
        config.set(
            "animation",
            "completion_lead_frames",
            Some(self.completion_lead_frames.to_string()),
        );
        config.set(
            "animation",
            "reset_frame_on_loop_switch",
            Some(self.reset_frame_on_loop_switch.to_string()),
        );

        // [table] section
        if let Some(path) = &self.table_path {
            config.set("table", "path", Some(path.display().to_string()));
        }

        config
            .write(&self.config_path)
            .map_err(ConfigError::Io)?;

        info!("Saved animation config to {:?}", self.config_path);

        Ok(())
    }

    /// Playback settings handed to every new actor.
    pub fn playback(&self) -> PlaybackSettings {
        PlaybackSettings {
            frame_duration: self.frame_duration,
            completion_lead_frames: self.completion_lead_frames,
            reset_frame_on_loop_switch: self.reset_frame_on_loop_switch,
        }
    }

    /// The configured table file, or the standard table when none is set.
    pub fn load_table(&self) -> Result<AnimationTable, ConfigError> {
        match &self.table_path {
            Some(path) => AnimationTable::load_json(path),
            None => Ok(AnimationTable::standard()),
        }
    }
}
