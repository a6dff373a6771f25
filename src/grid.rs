use crate::biome::Biome;
use crate::error::{ConfigError, MapError};
use crate::hex::{Bounds, Coord};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementKind {
    /// Capital tier, only ever placed at the starting hex.
    City,
    Village,
    Town,
    Outpost,
    Fort,
    Keep,
    Hamlet,
}

impl SettlementKind {
    /// Kinds the settlement pass picks from.
    pub const SCATTERED: [SettlementKind; 6] = [
        SettlementKind::Village,
        SettlementKind::Town,
        SettlementKind::Outpost,
        SettlementKind::Fort,
        SettlementKind::Keep,
        SettlementKind::Hamlet,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SettlementKind::City => "City",
            SettlementKind::Village => "Village",
            SettlementKind::Town => "Town",
            SettlementKind::Outpost => "Outpost",
            SettlementKind::Fort => "Fort",
            SettlementKind::Keep => "Keep",
            SettlementKind::Hamlet => "Hamlet",
        }
    }
}

impl fmt::Display for SettlementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    #[serde(rename = "type")]
    pub kind: SettlementKind,
    pub name: String,
    pub faction: Option<String>,
}

impl Settlement {
    /// `"<faction> <kind>"`, or just the kind when unaffiliated.
    #[must_use]
    pub fn new(kind: SettlementKind, faction: Option<&str>) -> Self {
        let name = match faction {
            Some(f) => format!("{f} {kind}"),
            None => kind.name().to_string(),
        };
        Self {
            kind,
            name,
            faction: faction.map(str::to_string),
        }
    }

    #[must_use]
    pub fn capital(faction: &str) -> Self {
        Self::new(SettlementKind::City, Some(faction))
    }
}

/// Points of interest on one hex, collapsed into a single marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PoiMarker {
    #[serde(rename = "poi")]
    Single { name: String },
    /// Two or three POIs; `name` joins them with `", "`.
    #[serde(rename = "multiple")]
    Multiple { name: String, count: u8 },
}

impl PoiMarker {
    /// Collapses a list of POI names. `None` for an empty list.
    #[must_use]
    pub fn from_names(mut names: Vec<String>) -> Option<Self> {
        match names.len() {
            0 => None,
            1 => names.pop().map(|name| PoiMarker::Single { name }),
            n => Some(PoiMarker::Multiple {
                name: names.join(", "),
                count: n as u8,
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            PoiMarker::Single { name } | PoiMarker::Multiple { name, .. } => name,
        }
    }

    #[must_use]
    pub fn count(&self) -> u8 {
        match self {
            PoiMarker::Single { .. } => 1,
            PoiMarker::Multiple { count, .. } => *count,
        }
    }
}

/// One hex of the finished map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub terrain: Biome,
    pub poi: Option<PoiMarker>,
    pub settlement: Option<Settlement>,
    pub explored: bool,
    /// Older documents have no notes; they load as empty.
    #[serde(default)]
    pub notes: String,
}

impl Cell {
    #[must_use]
    pub fn new(terrain: Biome) -> Self {
        Self {
            terrain,
            poi: None,
            settlement: None,
            explored: false,
            notes: String::new(),
        }
    }

    /// Settlements and POIs never share a hex.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        self.settlement.is_none() && self.poi.is_none()
    }
}

/// Fully populated map, stored row-major.
///
/// Terrain, settlements and POIs are fixed once generation hands the grid over;
/// only `explored` and `notes` can change afterwards. Serializes as an array of
/// rows, `grid[r][q]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<Cell>>", try_from = "Vec<Vec<Cell>>")]
pub struct Grid {
    bounds: Bounds,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from row-major cells.
    pub fn from_cells(bounds: Bounds, cells: Vec<Cell>) -> Result<Self, MapError> {
        if bounds.width == 0 || bounds.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: bounds.width,
                height: bounds.height,
            }
            .into());
        }
        if cells.len() != bounds.area() {
            return Err(MapError::GridShape {
                width: bounds.width,
                height: bounds.height,
            });
        }
        Ok(Self { bounds, cells })
    }

    /// Caller guarantees `cells.len() == bounds.area()`.
    pub(crate) fn from_parts(bounds: Bounds, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), bounds.area());
        Self { bounds, cells }
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.bounds.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.bounds.height
    }

    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        if self
            .bounds
            .contains(i64::from(coord.q), i64::from(coord.r))
        {
            self.cells.get(self.bounds.index(coord))
        } else {
            None
        }
    }

    /// Cells with their coordinates, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.bounds.coords().zip(self.cells.iter())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.bounds.width as usize)
    }

    pub fn settlements(&self) -> impl Iterator<Item = (Coord, &Settlement)> {
        self.iter()
            .filter_map(|(c, cell)| cell.settlement.as_ref().map(|s| (c, s)))
    }

    fn cell_mut(&mut self, coord: Coord) -> Result<&mut Cell, MapError> {
        let bounds = self.bounds;
        if !bounds.contains(i64::from(coord.q), i64::from(coord.r)) {
            return Err(MapError::OutOfBounds {
                q: coord.q,
                r: coord.r,
                width: bounds.width,
                height: bounds.height,
            });
        }
        Ok(&mut self.cells[bounds.index(coord)])
    }

    pub fn set_explored(&mut self, coord: Coord, explored: bool) -> Result<(), MapError> {
        self.cell_mut(coord)?.explored = explored;
        Ok(())
    }

    pub fn set_notes(&mut self, coord: Coord, notes: impl Into<String>) -> Result<(), MapError> {
        self.cell_mut(coord)?.notes = notes.into();
        Ok(())
    }
}

impl From<Grid> for Vec<Vec<Cell>> {
    fn from(grid: Grid) -> Self {
        let width = grid.bounds.width as usize;
        let mut rows = Vec::with_capacity(grid.bounds.height as usize);
        let mut cells = grid.cells.into_iter();
        for _ in 0..grid.bounds.height {
            rows.push(cells.by_ref().take(width).collect());
        }
        rows
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Grid {
    type Error = MapError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, Vec::len) as u32;
        if rows.iter().any(|row| row.len() != width as usize) {
            return Err(MapError::GridShape { width, height });
        }
        Grid::from_cells(Bounds::new(width, height), rows.into_iter().flatten().collect())
    }
}
