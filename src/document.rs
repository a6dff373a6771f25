//! Persisted form of a generated map.
//!
//! The JSON layout is
//! `{grid, width, height, start_direction, factions, custom_locations,
//! created_at, fog_of_war_enabled}` plus an optional `seed`. Documents written
//! before notes or fog of war existed still load: missing notes become `""`
//! and a missing fog flag becomes `true`.

use crate::config::{GenerationConfig, StartDirection};
use crate::error::MapError;
use crate::generator::{Generation, generate};
use crate::grid::{Cell, Grid};
use crate::hex::Coord;
use chrono::{Local, NaiveDateTime};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    pub grid: Grid,
    pub width: u32,
    pub height: u32,
    pub start_direction: StartDirection,
    pub factions: Vec<String>,
    pub custom_locations: Vec<String>,
    pub created_at: NaiveDateTime,
    #[serde(default = "default_fog_of_war")]
    pub fog_of_war_enabled: bool,
    /// Seed the map was generated from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_fog_of_war() -> bool {
    true
}

impl MapDocument {
    /// Generates a fresh map. Without a configured seed a random one is drawn
    /// and recorded so the map can be reproduced later.
    pub fn generate(config: &GenerationConfig) -> Result<Self, MapError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let generation = generate(config, seed)?;
        info!(
            "generated {}x{} map from seed {seed}",
            config.width, config.height
        );
        Ok(Self::from_generation(
            config,
            generation,
            Local::now().naive_local(),
        ))
    }

    #[must_use]
    pub fn from_generation(
        config: &GenerationConfig,
        generation: Generation,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            width: generation.grid.width(),
            height: generation.grid.height(),
            grid: generation.grid,
            start_direction: config.start_direction,
            factions: config.factions.clone(),
            custom_locations: config.custom_locations.clone(),
            created_at,
            fog_of_war_enabled: true,
            seed: generation.report.seed,
        }
    }

    /// The configuration that reproduces this map, seed included.
    #[must_use]
    pub fn config(&self) -> GenerationConfig {
        GenerationConfig {
            width: self.width,
            height: self.height,
            start_direction: self.start_direction,
            factions: self.factions.clone(),
            custom_locations: self.custom_locations.clone(),
            seed: self.seed,
        }
    }

    /// `hex-map-<YYYY-MM-DD>.json`, dated by creation.
    #[must_use]
    pub fn default_file_name(&self) -> String {
        format!("hex-map-{}.json", self.created_at.format("%Y-%m-%d"))
    }

    pub fn to_json_string(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        let document: Self = serde_json::from_str(json)?;
        document.check_shape()?;
        Ok(document)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    fn check_shape(&self) -> Result<(), MapError> {
        if self.grid.width() != self.width || self.grid.height() != self.height {
            return Err(MapError::GridShape {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn cell(&self, q: u32, r: u32) -> Option<&Cell> {
        self.grid.get(Coord::new(q, r))
    }

    pub fn reveal(&mut self, q: u32, r: u32) -> Result<(), MapError> {
        self.grid.set_explored(Coord::new(q, r), true)
    }

    pub fn hide(&mut self, q: u32, r: u32) -> Result<(), MapError> {
        self.grid.set_explored(Coord::new(q, r), false)
    }

    pub fn set_notes(&mut self, q: u32, r: u32, notes: impl Into<String>) -> Result<(), MapError> {
        self.grid.set_notes(Coord::new(q, r), notes)
    }

    /// Flips fog of war without touching any hex's explored flag. Returns the
    /// new state.
    pub fn toggle_fog_of_war(&mut self) -> bool {
        self.fog_of_war_enabled = !self.fog_of_war_enabled;
        self.fog_of_war_enabled
    }

    /// Whether a hex's contents may be shown: explored, or fog of war is off.
    #[must_use]
    pub fn is_visible(&self, q: u32, r: u32) -> bool {
        !self.fog_of_war_enabled || self.cell(q, r).is_some_and(|cell| cell.explored)
    }
}
