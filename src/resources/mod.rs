//! ECS resources made available to systems.
//!
//! Overview
//! - `animationconfig` – playback settings loaded from an INI file
//! - `animationlibrary` – `(category, direction, frame)` lookup built from a sprite sheet
//! - `animationtable` – ordered animation descriptors defining the sheet layout
//! - `partstore` – imported sprite parts keyed by name
//! - `worldtime` – simulation time and delta
pub mod animationconfig;
pub mod animationlibrary;
pub mod animationtable;
pub mod partstore;
pub mod worldtime;
