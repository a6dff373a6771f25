// src/config.rs
//! Map generation configuration
//!
//! This module defines the input of a single generation run:
//! - map size in hexes
//! - the edge the party starts from
//! - faction names used for the capital and settlements
//! - custom location names mixed into points of interest
//! - an optional seed for reproducible maps
//!
//! Everything here round-trips through TOML/JSON so a campaign setup can be kept
//! in a configuration file.

use crate::error::{ConfigError, MapError};
use crate::hex::{Bounds, Coord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Map edge the party starts from.
///
/// The capital sits at the midpoint of this edge; corruption grows toward the
/// opposite one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StartDirection {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "E")]
    East,
    /// Default: start on the western edge, corruption to the east
    #[default]
    #[serde(rename = "W")]
    West,
}

impl StartDirection {
    /// Midpoint of the starting edge.
    ///
    /// # Examples
    /// ```
    /// use hexmarch::config::StartDirection;
    /// use hexmarch::hex::{Bounds, Coord};
    /// assert_eq!(StartDirection::West.start(Bounds::new(10, 10)), Coord::new(0, 5));
    /// assert_eq!(StartDirection::North.start(Bounds::new(10, 10)), Coord::new(5, 0));
    /// ```
    #[must_use]
    pub fn start(self, bounds: Bounds) -> Coord {
        let (w, h) = (bounds.width, bounds.height);
        match self {
            StartDirection::North => Coord::new(w / 2, 0),
            StartDirection::South => Coord::new(w / 2, h - 1),
            StartDirection::East => Coord::new(w - 1, h / 2),
            StartDirection::West => Coord::new(0, h / 2),
        }
    }

    /// Midpoint of the opposite edge, used to scale the grimdark threshold.
    #[must_use]
    pub fn opposite(self, bounds: Bounds) -> Coord {
        let (w, h) = (bounds.width, bounds.height);
        match self {
            StartDirection::North => Coord::new(w / 2, h - 1),
            StartDirection::South => Coord::new(w / 2, 0),
            StartDirection::East => Coord::new(0, h / 2),
            StartDirection::West => Coord::new(w - 1, h / 2),
        }
    }

    #[must_use]
    pub fn letter(self) -> &'static str {
        match self {
            StartDirection::North => "N",
            StartDirection::South => "S",
            StartDirection::East => "E",
            StartDirection::West => "W",
        }
    }
}

impl fmt::Display for StartDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

impl FromStr for StartDirection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" | "NORTH" => Ok(StartDirection::North),
            "S" | "SOUTH" => Ok(StartDirection::South),
            "E" | "EAST" => Ok(StartDirection::East),
            "W" | "WEST" => Ok(StartDirection::West),
            _ => Err(ConfigError::InvalidDirection(s.to_string())),
        }
    }
}

/// Parameters of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Map width in hexes (default 25)
    #[serde(default = "default_width")]
    pub width: u32,

    /// Map height in hexes (default 20)
    #[serde(default = "default_height")]
    pub height: u32,

    /// Starting edge (default `W`)
    #[serde(default)]
    pub start_direction: StartDirection,

    /// Faction names. The first one owns the capital.
    #[serde(default)]
    pub factions: Vec<String>,

    /// Location names that may replace procedural POI names.
    #[serde(default)]
    pub custom_locations: Vec<String>,

    /// Random seed. A fresh one is drawn when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_width() -> u32 {
    25
}
fn default_height() -> u32 {
    20
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 25,
            height: 20,
            start_direction: StartDirection::West,
            factions: Vec::new(),
            custom_locations: Vec::new(),
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Loads a configuration from a TOML file
    ///
    /// # Example
    /// ```toml
    /// # campaign.toml
    /// width = 30
    /// height = 20
    /// start_direction = "S"
    /// factions = ["Silver Hand", "Iron Circle"]
    /// custom_locations = ["The Sunken Bell"]
    /// seed = 42
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, MapError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects maps with a zero dimension.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Validated map bounds.
    pub fn bounds(&self) -> Result<Bounds, ConfigError> {
        self.validate()?;
        Ok(Bounds::new(self.width, self.height))
    }
}
