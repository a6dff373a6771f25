//! Terminal rendering of map documents.
//!
//! One glyph per hex, odd rows shifted half a hex to the right. Hexes hidden
//! by fog of war render as `?`. Each view is a `Display` wrapper; the free
//! functions are shorthands that format one into a `String`.

use crate::biome::Biome;
use crate::document::MapDocument;
use crate::grid::{Cell, Grid, PoiMarker, SettlementKind};
use std::collections::BTreeMap;
use std::fmt;

pub const FOG_CHAR: char = '?';
pub const CAPITAL_CHAR: char = '★';
pub const SETTLEMENT_CHAR: char = '⌂';
pub const POI_CHAR: char = '!';

const RULE_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Hide unexplored hexes when the document has fog of war on.
    pub fog: bool,
    /// Draw settlements and POIs over the terrain glyph.
    pub features: bool,
    /// Wrap glyphs in 24-bit ANSI colour escapes.
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            fog: true,
            features: true,
            color: false,
        }
    }
}

/// Glyph for a visible hex.
#[must_use]
pub fn cell_char(cell: &Cell, features: bool) -> char {
    if features {
        if let Some(settlement) = &cell.settlement {
            return if settlement.kind == SettlementKind::City {
                CAPITAL_CHAR
            } else {
                SETTLEMENT_CHAR
            };
        }
        if cell.poi.is_some() {
            return POI_CHAR;
        }
    }
    cell.terrain.glyph()
}

fn rule(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    writeln!(f, "{}", c.to_string().repeat(RULE_WIDTH))
}

/// The glyph grid of a document.
#[derive(Debug, Clone, Copy)]
pub struct MapView<'a> {
    pub doc: &'a MapDocument,
    pub options: RenderOptions,
}

impl fmt::Display for MapView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fogged = self.options.fog && self.doc.fog_of_war_enabled;

        for (r, row) in self.doc.grid.rows().enumerate() {
            if r % 2 == 1 {
                f.write_str(" ")?;
            }
            for (q, cell) in row.iter().enumerate() {
                if q > 0 {
                    f.write_str(" ")?;
                }
                if fogged && !cell.explored {
                    write!(f, "{FOG_CHAR}")?;
                    continue;
                }
                let glyph = cell_char(cell, self.options.features);
                if self.options.color {
                    let [red, green, blue] = cell.terrain.to_rgb();
                    write!(f, "\x1b[38;2;{red};{green};{blue}m{glyph}\x1b[0m")?;
                } else {
                    write!(f, "{glyph}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Glyph legend for every biome plus the feature markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Legend;

impl fmt::Display for Legend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Terrain:")?;
        for biome in Biome::all() {
            let zone = if biome.is_corrupted() { " (corrupted)" } else { "" };
            writeln!(f, "  {}  {}{zone}", biome.glyph(), biome.name())?;
        }
        writeln!(f, "Features:")?;
        writeln!(f, "  {CAPITAL_CHAR}  Capital")?;
        writeln!(f, "  {SETTLEMENT_CHAR}  Settlement")?;
        writeln!(f, "  {POI_CHAR}  Point of interest")?;
        writeln!(f, "  {FOG_CHAR}  Unexplored")
    }
}

/// Header, map and statistics in one block.
#[derive(Debug, Clone, Copy)]
pub struct Summary<'a> {
    pub doc: &'a MapDocument,
    pub options: RenderOptions,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.doc;
        writeln!(f, "=== HEX MAP {}x{} ===", doc.width, doc.height)?;
        if let Some(seed) = doc.seed {
            writeln!(f, "Seed: {seed}")?;
        }
        writeln!(f, "Start: {}", doc.start_direction)?;
        writeln!(f, "Created: {}", doc.created_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(
            f,
            "Fog of war: {}",
            if doc.fog_of_war_enabled { "on" } else { "off" }
        )?;
        writeln!(f)?;
        write!(
            f,
            "{}",
            MapView {
                doc,
                options: self.options
            }
        )?;
        writeln!(f)?;

        let total = doc.grid.bounds().area();
        writeln!(f, "Biome distribution:")?;
        for (biome, count) in biome_stats(&doc.grid) {
            let pct = 100.0 * count as f64 / total as f64;
            writeln!(
                f,
                "  {:16} {} {:>5} ({:>5.1}%)",
                biome.name(),
                biome.glyph(),
                count,
                pct
            )?;
        }
        let settlements = doc.grid.settlements().count();
        let pois = doc.grid.iter().filter(|(_, c)| c.poi.is_some()).count();
        writeln!(f, "Settlements: {settlements}  POI hexes: {pois}")
    }
}

/// Details of one hex: terrain, settlement, POIs, status and notes.
///
/// Under fog of war an unexplored hex shows nothing but its status, the same
/// rule [`MapDocument::is_visible`] applies.
#[derive(Debug, Clone, Copy)]
pub struct HexInfo<'a> {
    pub doc: &'a MapDocument,
    pub q: u32,
    pub r: u32,
}

impl fmt::Display for HexInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (q, r) = (self.q, self.r);
        writeln!(f, "Hex ({q}, {r})")?;
        rule(f, '=')?;
        writeln!(f)?;

        let Some(cell) = self.doc.cell(q, r) else {
            return writeln!(f, "Outside the {}x{} map.", self.doc.width, self.doc.height);
        };

        if !self.doc.is_visible(q, r) {
            writeln!(f, "Status: UNEXPLORED")?;
            writeln!(f)?;
            writeln!(f, "This hex has not been explored yet.")?;
            return writeln!(f, "Reveal it to view terrain, POIs, and notes.");
        }

        writeln!(f, "Terrain: {}", cell.terrain.name())?;
        writeln!(f)?;

        if let Some(settlement) = &cell.settlement {
            writeln!(f, "Settlement: {}", settlement.name)?;
            writeln!(f, "Type: {}", settlement.kind)?;
            if let Some(faction) = &settlement.faction {
                writeln!(f, "Faction: {faction}")?;
            }
            writeln!(f)?;
        }

        match &cell.poi {
            Some(PoiMarker::Multiple { name, count }) => {
                writeln!(f, "POIs ({count}): {name}")?;
                writeln!(f)?;
            }
            Some(PoiMarker::Single { name }) => {
                writeln!(f, "POI: {name}")?;
                writeln!(f)?;
            }
            None => {}
        }

        let status = if cell.explored { "EXPLORED" } else { "UNEXPLORED" };
        writeln!(f, "Status: {status}")?;
        rule(f, '=')?;
        writeln!(f)?;
        writeln!(f, "NOTES:")?;
        rule(f, '-')?;
        if !cell.notes.is_empty() {
            writeln!(f, "{}", cell.notes)?;
        }
        Ok(())
    }
}

/// Renders the document's grid, one text line per row.
#[must_use]
pub fn render_map(doc: &MapDocument, options: RenderOptions) -> String {
    MapView { doc, options }.to_string()
}

#[must_use]
pub fn legend() -> String {
    Legend.to_string()
}

#[must_use]
pub fn describe(doc: &MapDocument, options: RenderOptions) -> String {
    Summary { doc, options }.to_string()
}

#[must_use]
pub fn describe_hex(doc: &MapDocument, q: u32, r: u32) -> String {
    HexInfo { doc, q, r }.to_string()
}

/// Hex count per biome.
#[must_use]
pub fn biome_stats(grid: &Grid) -> BTreeMap<Biome, usize> {
    let mut stats = BTreeMap::new();
    for (_, cell) in grid.iter() {
        *stats.entry(cell.terrain).or_insert(0) += 1;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenerationConfig, StartDirection};
    use crate::generator::generate;
    use crate::grid::Settlement;
    use crate::hex::Bounds;
    use chrono::{NaiveDate, NaiveDateTime};

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn doc(width: u32, height: u32) -> MapDocument {
        let config = GenerationConfig {
            width,
            height,
            ..GenerationConfig::default()
        };
        MapDocument::from_generation(&config, generate(&config, 3).unwrap(), noon())
    }

    /// Three hexes: a village, a hex with three POIs, and empty hills.
    fn hamlet_row() -> MapDocument {
        let mut village = Cell::new(Biome::Plains);
        village.settlement = Some(Settlement::new(SettlementKind::Village, Some("Iron Circle")));
        village.explored = true;

        let mut ruins = Cell::new(Biome::Forest);
        ruins.poi = PoiMarker::from_names(vec![
            "Mossy Glen".into(),
            "Twisted Hollow".into(),
            "Old Mill".into(),
        ]);
        ruins.explored = true;

        let hills = Cell::new(Biome::Hills);

        MapDocument {
            grid: Grid::from_cells(Bounds::new(3, 1), vec![village, ruins, hills]).unwrap(),
            width: 3,
            height: 1,
            start_direction: StartDirection::West,
            factions: vec!["Iron Circle".into()],
            custom_locations: vec!["Old Mill".into()],
            created_at: noon(),
            fog_of_war_enabled: true,
            seed: None,
        }
    }

    #[test]
    fn feature_glyphs_override_terrain() {
        let mut cell = Cell::new(Biome::Forest);
        assert_eq!(cell_char(&cell, true), '♠');

        cell.poi = PoiMarker::from_names(vec!["Mossy Glen".into()]);
        assert_eq!(cell_char(&cell, true), POI_CHAR);
        assert_eq!(cell_char(&cell, false), '♠');

        cell.poi = None;
        cell.settlement = Some(Settlement::capital("Imperial"));
        assert_eq!(cell_char(&cell, true), CAPITAL_CHAR);
    }

    #[test]
    fn fog_hides_all_but_the_start() {
        let doc = doc(6, 4);
        let text = render_map(&doc, RenderOptions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with(' '));

        let glyphs: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(glyphs.len(), 24);
        assert_eq!(glyphs.iter().filter(|&&c| c == FOG_CHAR).count(), 23);
        // West start on a 6x4 map is (0, 2).
        assert_eq!(lines[2].chars().next(), Some(CAPITAL_CHAR));
    }

    #[test]
    fn fog_can_be_ignored() {
        let mut doc = doc(6, 4);
        let clear = RenderOptions {
            fog: false,
            ..RenderOptions::default()
        };
        assert!(!render_map(&doc, clear).contains(FOG_CHAR));

        doc.toggle_fog_of_war();
        assert!(!render_map(&doc, RenderOptions::default()).contains(FOG_CHAR));
    }

    #[test]
    fn color_wraps_every_visible_glyph() {
        let doc = doc(3, 2);
        let options = RenderOptions {
            fog: false,
            features: false,
            color: true,
        };
        let text = render_map(&doc, options);
        assert_eq!(text.matches("\x1b[38;2;").count(), 6);
        assert_eq!(text.matches("\x1b[0m").count(), 6);
    }

    #[test]
    fn stats_cover_the_whole_grid() {
        let doc = doc(10, 7);
        let stats = biome_stats(&doc.grid);
        assert_eq!(stats.values().sum::<usize>(), 70);
        assert!(stats.contains_key(&Biome::Plains));
    }

    #[test]
    fn description_and_legend() {
        let text = describe(&doc(5, 5), RenderOptions::default());
        assert!(text.starts_with("=== HEX MAP 5x5 ==="));
        assert!(text.contains("Seed: 3"));
        assert!(text.contains("Created: 2024-01-01 12:00:00"));
        assert!(text.contains("Plains"));

        let legend = legend();
        assert!(legend.contains("⚉  Abyssal Depths (corrupted)"));
        assert!(legend.contains("·  Plains\n"));
    }

    #[test]
    fn hidden_hex_shows_only_its_status() {
        let mut doc = hamlet_row();
        doc.set_notes(2, 0, "ogre camp").unwrap();

        let info = describe_hex(&doc, 2, 0);
        assert!(info.starts_with("Hex (2, 0)\n"));
        assert!(info.contains("Status: UNEXPLORED"));
        assert!(!info.contains("Terrain:"));
        assert!(!info.contains("ogre camp"));
        assert!(!info.contains("NOTES:"));
    }

    #[test]
    fn revealed_settlement_hex() {
        let info = describe_hex(&hamlet_row(), 0, 0);
        assert!(info.contains("Terrain: Plains\n"));
        assert!(info.contains("Settlement: Iron Circle Village\n"));
        assert!(info.contains("Type: Village\n"));
        assert!(info.contains("Faction: Iron Circle\n"));
        assert!(info.contains("Status: EXPLORED\n"));
        assert!(!info.contains("POI"));
    }

    #[test]
    fn multiple_poi_hex() {
        let info = describe_hex(&hamlet_row(), 1, 0);
        assert!(info.contains("Terrain: Forest\n"));
        assert!(info.contains("POIs (3): Mossy Glen, Twisted Hollow, Old Mill\n"));
        assert!(!info.contains("Settlement:"));
    }

    #[test]
    fn notes_follow_the_status() {
        let mut doc = hamlet_row();
        doc.set_notes(2, 0, "ogre camp").unwrap();
        doc.reveal(2, 0).unwrap();

        let info = describe_hex(&doc, 2, 0);
        assert!(info.contains("Terrain: Hills\n"));
        assert!(info.ends_with("NOTES:\n------------------------------\nogre camp\n"));
    }

    #[test]
    fn fog_off_shows_unexplored_hexes() {
        let mut doc = hamlet_row();
        doc.toggle_fog_of_war();
        let info = describe_hex(&doc, 2, 0);
        assert!(info.contains("Terrain: Hills\n"));
        assert!(info.contains("Status: UNEXPLORED\n"));
        assert!(info.contains("NOTES:"));
    }

    #[test]
    fn off_map_hex() {
        let info = describe_hex(&hamlet_row(), 5, 0);
        assert!(info.contains("Outside the 3x1 map."));
    }
}
