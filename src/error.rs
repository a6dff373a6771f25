//! Error types for configuration and map documents.
//!
//! Generation itself is total: the only thing that can go wrong before a run
//! starts is a bad [`GenerationConfig`](crate::config::GenerationConfig).
//! Everything after that concerns the resulting document: I/O,
//! (de)serialization, and edits addressed to hexes off the map.

use thiserror::Error;

/// Rejected generation input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("map dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
    #[error("unknown start direction {0:?}, expected one of N, S, E, W")]
    InvalidDirection(String),
}

/// Everything that can fail while producing, loading or saving a map document.
#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed map document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed configuration file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("grid does not match the declared {width}x{height} size")]
    GridShape { width: u32, height: u32 },
    #[error("hex ({q}, {r}) lies outside the {width}x{height} map")]
    OutOfBounds {
        q: u32,
        r: u32,
        width: u32,
        height: u32,
    },
}
