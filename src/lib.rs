pub mod ascii;
pub mod biome;
pub mod cluster;
pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod grid;
pub mod hex;
pub mod naming;

pub use biome::{Biome, TransitionGraph};
pub use cluster::{GrowthStrategy, grow_cluster};
pub use config::{GenerationConfig, StartDirection};
pub use document::MapDocument;
pub use error::{ConfigError, MapError};
pub use generator::{
    CellOrigin, Generation, GenerationReport, MapGenerator, Phase, generate, generate_batch,
};
pub use grid::{Cell, Grid, PoiMarker, Settlement, SettlementKind};
pub use hex::{Bounds, Coord};
pub use naming::poi_name;
