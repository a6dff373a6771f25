// src/generator.rs
//! Map orchestration.
//!
//! A run walks through [`Phase`]s in order: seed a Plains region around the
//! capital, grow legally-adjacent biome clusters until the map is covered (or
//! the attempt budget runs out), patch any leftovers from their neighbours,
//! scatter settlements, then decorate the remaining hexes with points of
//! interest. All randomness comes from the one generator handed to the run, so
//! a seed reproduces the same map.

use crate::biome::{Biome, TransitionGraph};
use crate::cluster::grow_cluster;
use crate::config::GenerationConfig;
use crate::error::ConfigError;
use crate::grid::{Cell, Grid, PoiMarker, Settlement, SettlementKind};
use crate::hex::{Bounds, Coord};
use crate::naming::poi_name;
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Faction that owns the capital when none are configured.
pub const DEFAULT_FACTION: &str = "Imperial";

/// Share of the start-to-far-edge distance beyond which biomes turn corrupted.
const GRIMDARK_RATIO: f64 = 0.6;
const START_REGION_SIZE: usize = 7;
const CLUSTER_SIZE_MIN: usize = 5;
const CLUSTER_SIZE_MAX: usize = 12;
const SETTLEMENT_ATTEMPTS: usize = 1000;
const POI_CHANCE: f64 = 0.5;
const CUSTOM_LOCATION_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Seeding,
    Growing,
    Filling,
    Settling,
    Decorating,
    Done,
}

/// How a hex got its biome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellOrigin {
    /// Part of the Plains region around the capital.
    StartRegion,
    /// The hex a cluster grew from; its biome was chosen here.
    ClusterSeed {
        /// Biome of the assigned neighbour that constrained the choice, `None`
        /// for a random reseed with no assigned neighbours.
        from: Option<Biome>,
        grimdark: bool,
        /// Picked from the whole zone catalog instead of `from`'s transitions.
        fallback: bool,
    },
    /// Grown as part of the cluster seeded at `seed`.
    Cluster { seed: Coord },
    /// Inherited from a neighbour after the attempt budget ran out.
    Filled,
}

/// Bookkeeping of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// Seed the run was started from, when it was started from one.
    pub seed: Option<u64>,
    pub start: Coord,
    pub opposite: Coord,
    pub grimdark_threshold: f64,
    /// Growing attempts used, out of `3 * width * height`.
    pub attempts: usize,
    /// Growing attempts that found no frontier and reseeded at random.
    pub reseeds: usize,
    /// Hexes assigned by the filling phase.
    pub filled: usize,
    /// Settlements the settling phase aimed for, capital excluded.
    pub settlements_target: usize,
    pub settlements_placed: usize,
    origins: Vec<CellOrigin>,
}

/// A finished map with its report.
#[derive(Debug, Clone)]
pub struct Generation {
    pub grid: Grid,
    pub report: GenerationReport,
}

impl Generation {
    #[must_use]
    pub fn origin(&self, coord: Coord) -> Option<CellOrigin> {
        let bounds = self.grid.bounds();
        if !bounds.contains(i64::from(coord.q), i64::from(coord.r)) {
            return None;
        }
        self.report.origins.get(bounds.index(coord)).copied()
    }
}

/// Generates a map from `seed`.
///
/// ```
/// use hexmarch::config::GenerationConfig;
/// use hexmarch::generator::generate;
///
/// let config = GenerationConfig { width: 12, height: 9, ..Default::default() };
/// let a = generate(&config, 42)?;
/// let b = generate(&config, 42)?;
/// assert_eq!(a.grid, b.grid);
/// # Ok::<(), hexmarch::error::ConfigError>(())
/// ```
pub fn generate(config: &GenerationConfig, seed: u64) -> Result<Generation, ConfigError> {
    let mut generation = MapGenerator::new(config, ChaCha8Rng::seed_from_u64(seed))?.run();
    generation.report.seed = Some(seed);
    Ok(generation)
}

/// Generates one map per seed. Runs share nothing but the configuration, so
/// with the `parallel` feature they are spread over the rayon pool.
pub fn generate_batch(
    config: &GenerationConfig,
    seeds: &[u64],
) -> Result<Vec<Generation>, ConfigError> {
    config.validate()?;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        seeds.par_iter().map(|&seed| generate(config, seed)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(|&seed| generate(config, seed)).collect()
    }
}

/// Phase-by-phase generation state for one run.
pub struct MapGenerator<'a, R: Rng> {
    config: &'a GenerationConfig,
    rng: R,
    bounds: Bounds,
    transitions: TransitionGraph,
    phase: Phase,
    cells: Vec<Option<Cell>>,
    origins: Vec<Option<CellOrigin>>,
    assigned: usize,
    start: Coord,
    opposite: Coord,
    threshold: f64,
    attempts: usize,
    reseeds: usize,
    filled: usize,
    settlements_target: usize,
    settlements_placed: usize,
}

impl<'a, R: Rng> MapGenerator<'a, R> {
    /// Fails only for a map with a zero dimension.
    pub fn new(config: &'a GenerationConfig, rng: R) -> Result<Self, ConfigError> {
        let bounds = config.bounds()?;
        let start = config.start_direction.start(bounds);
        let opposite = config.start_direction.opposite(bounds);
        let area = bounds.area();

        Ok(Self {
            config,
            rng,
            bounds,
            transitions: TransitionGraph::authored(),
            phase: Phase::Seeding,
            cells: vec![None; area],
            origins: vec![None; area],
            assigned: 0,
            start,
            opposite,
            threshold: GRIMDARK_RATIO * start.distance(opposite),
            attempts: 0,
            reseeds: 0,
            filled: 0,
            settlements_target: 0,
            settlements_placed: 0,
        })
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Runs the current phase (one attempt while growing) and returns the next.
    pub fn step(&mut self) -> Phase {
        let next = match self.phase {
            Phase::Seeding => self.seed_start_region(),
            Phase::Growing => self.grow_once(),
            Phase::Filling => self.fill_leftovers(),
            Phase::Settling => self.place_settlements(),
            Phase::Decorating => self.place_pois(),
            Phase::Done => Phase::Done,
        };
        if next != self.phase {
            debug!("{:?} -> {:?} ({} hexes assigned)", self.phase, next, self.assigned);
        }
        self.phase = next;
        next
    }

    /// Runs every remaining phase and hands over the finished map.
    pub fn run(mut self) -> Generation {
        while self.step() != Phase::Done {}

        info!(
            "generated {}x{} map: {} growing attempts, {} reseeds, {} filled, {}/{} settlements",
            self.bounds.width,
            self.bounds.height,
            self.attempts,
            self.reseeds,
            self.filled,
            self.settlements_placed,
            self.settlements_target
        );

        let cells = self
            .cells
            .into_iter()
            .map(|cell| cell.unwrap_or_else(|| Cell::new(Biome::Plains)))
            .collect();
        let origins = self
            .origins
            .into_iter()
            .map(|origin| origin.unwrap_or(CellOrigin::Filled))
            .collect();

        Generation {
            grid: Grid::from_parts(self.bounds, cells),
            report: GenerationReport {
                seed: None,
                start: self.start,
                opposite: self.opposite,
                grimdark_threshold: self.threshold,
                attempts: self.attempts,
                reseeds: self.reseeds,
                filled: self.filled,
                settlements_target: self.settlements_target,
                settlements_placed: self.settlements_placed,
                origins,
            },
        }
    }

    fn is_grimdark(&self, coord: Coord) -> bool {
        coord.distance(self.start) > self.threshold
    }

    fn assign(&mut self, coord: Coord, biome: Biome, origin: CellOrigin) -> bool {
        let idx = self.bounds.index(coord);
        if self.cells[idx].is_some() {
            return false;
        }
        self.cells[idx] = Some(Cell::new(biome));
        self.origins[idx] = Some(origin);
        self.assigned += 1;
        true
    }

    fn seed_start_region(&mut self) -> Phase {
        let region = grow_cluster(
            self.start,
            Biome::Plains,
            self.bounds,
            START_REGION_SIZE,
            &mut self.rng,
        );
        for coord in region {
            self.assign(coord, Biome::Plains, CellOrigin::StartRegion);
        }

        let faction = self
            .config
            .factions
            .first()
            .map_or(DEFAULT_FACTION, String::as_str);
        let idx = self.bounds.index(self.start);
        if let Some(cell) = self.cells[idx].as_mut() {
            cell.explored = true;
            cell.settlement = Some(Settlement::capital(faction));
        }

        debug!(
            "start {:?}, opposite {:?}, grimdark beyond {:.2}",
            self.start, self.opposite, self.threshold
        );
        Phase::Growing
    }

    /// Unassigned hexes next to assigned ones, each listed once per assigned
    /// neighbour together with that neighbour's biome.
    fn frontier(&self) -> Vec<(Coord, Biome)> {
        let mut frontier = Vec::new();
        for (idx, cell) in self.cells.iter().enumerate() {
            let Some(cell) = cell else { continue };
            for n in self.bounds.neighbors(self.bounds.coord(idx)) {
                if self.cells[self.bounds.index(n)].is_none() {
                    frontier.push((n, cell.terrain));
                }
            }
        }
        frontier
    }

    fn pick_from_catalog(&mut self, grimdark: bool) -> Biome {
        let catalog = Biome::catalog(grimdark);
        catalog[self.rng.gen_range(0..catalog.len())]
    }

    fn grow_once(&mut self) -> Phase {
        let budget = 3 * self.bounds.area();
        if self.assigned == self.bounds.area() || self.attempts >= budget {
            return Phase::Filling;
        }
        self.attempts += 1;

        let frontier = self.frontier();
        let (seed, biome, origin) = if let Some(&(seed, neighbor)) = frontier.choose(&mut self.rng)
        {
            let grimdark = self.is_grimdark(seed);
            let candidates = self.transitions.candidates(neighbor, grimdark);
            let (biome, fallback) = match candidates.choose(&mut self.rng) {
                Some(&biome) => (biome, false),
                None => (self.pick_from_catalog(grimdark), true),
            };
            let origin = CellOrigin::ClusterSeed {
                from: Some(neighbor),
                grimdark,
                fallback,
            };
            (seed, biome, origin)
        } else {
            let unassigned: Vec<Coord> = self
                .cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_none())
                .map(|(idx, _)| self.bounds.coord(idx))
                .collect();
            let Some(&seed) = unassigned.choose(&mut self.rng) else {
                return Phase::Filling;
            };
            self.reseeds += 1;
            let grimdark = self.is_grimdark(seed);
            let biome = self.pick_from_catalog(grimdark);
            let origin = CellOrigin::ClusterSeed {
                from: None,
                grimdark,
                fallback: true,
            };
            (seed, biome, origin)
        };

        let min_size = self.rng.gen_range(CLUSTER_SIZE_MIN..=CLUSTER_SIZE_MAX);
        let cluster = grow_cluster(seed, biome, self.bounds, min_size, &mut self.rng);
        for coord in cluster {
            let origin = if coord == seed {
                origin
            } else {
                CellOrigin::Cluster { seed }
            };
            self.assign(coord, biome, origin);
        }

        Phase::Growing
    }

    fn fill_leftovers(&mut self) -> Phase {
        // Row-major passes; a hex filled earlier in a pass can seed later ones.
        loop {
            let mut progress = false;
            for idx in 0..self.cells.len() {
                if self.cells[idx].is_some() {
                    continue;
                }
                let coord = self.bounds.coord(idx);
                let inherited = self
                    .bounds
                    .neighbors(coord)
                    .find_map(|n| self.cells[self.bounds.index(n)].as_ref())
                    .map(|cell| cell.terrain);
                if let Some(biome) = inherited {
                    self.assign(coord, biome, CellOrigin::Filled);
                    self.filled += 1;
                    progress = true;
                }
            }
            if !progress {
                break;
            }
        }

        if self.filled > 0 {
            debug!("filled {} leftover hexes from neighbours", self.filled);
        }
        Phase::Settling
    }

    fn place_settlements(&mut self) -> Phase {
        let area = self.bounds.area();
        self.settlements_target = (area / 50 + self.rng.gen_range(0..=3)).max(3);

        let mut attempts = 0;
        while self.settlements_placed < self.settlements_target && attempts < SETTLEMENT_ATTEMPTS {
            attempts += 1;
            let q = self.rng.gen_range(0..self.bounds.width);
            let r = self.rng.gen_range(0..self.bounds.height);
            let idx = self.bounds.index(Coord::new(q, r));

            let Some(cell) = self.cells[idx].as_mut() else {
                continue;
            };
            if !cell.is_vacant() || !cell.terrain.is_habitable() {
                continue;
            }

            let kind = SettlementKind::SCATTERED
                [self.rng.gen_range(0..SettlementKind::SCATTERED.len())];
            let faction = self
                .config
                .factions
                .choose(&mut self.rng)
                .map(String::as_str);
            cell.settlement = Some(Settlement::new(kind, faction));
            self.settlements_placed += 1;
        }

        if self.settlements_placed < self.settlements_target {
            warn!(
                "placed {} of {} settlements after {} attempts",
                self.settlements_placed, self.settlements_target, attempts
            );
        }
        Phase::Decorating
    }

    fn place_pois(&mut self) -> Phase {
        let config = self.config;
        let locations = &config.custom_locations;
        for idx in 0..self.cells.len() {
            let terrain = match &self.cells[idx] {
                Some(cell) if cell.settlement.is_none() => cell.terrain,
                _ => continue,
            };
            if !self.rng.gen_bool(POI_CHANCE) {
                continue;
            }

            let count = poi_count(&mut self.rng);
            let mut names = Vec::with_capacity(count);
            for _ in 0..count {
                let custom = if !locations.is_empty() && self.rng.gen_bool(CUSTOM_LOCATION_CHANCE)
                {
                    locations.choose(&mut self.rng).cloned()
                } else {
                    None
                };
                names.push(custom.unwrap_or_else(|| poi_name(terrain, &mut self.rng)));
            }

            if let Some(cell) = self.cells[idx].as_mut() {
                cell.poi = PoiMarker::from_names(names);
            }
        }
        Phase::Done
    }
}

/// One, two or three POIs, weighted 70 / 25 / 5.
fn poi_count<R: Rng + ?Sized>(rng: &mut R) -> usize {
    match rng.gen_range(0..100) {
        0..70 => 1,
        70..95 => 2,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StartDirection;
    use assert_approx_eq::assert_approx_eq;

    fn config(width: u32, height: u32, start: StartDirection) -> GenerationConfig {
        GenerationConfig {
            width,
            height,
            start_direction: start,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn west_start_on_ten_by_ten() {
        let mut config = config(10, 10, StartDirection::West);
        config.factions = vec!["Silver Hand".into(), "Iron Circle".into()];
        let generation = generate(&config, 1).unwrap();
        let report = &generation.report;

        assert_eq!(report.start, Coord::new(0, 5));
        assert_eq!(report.opposite, Coord::new(9, 5));
        assert_approx_eq!(report.grimdark_threshold, 5.4);

        let start = generation.grid.get(Coord::new(0, 5)).unwrap();
        assert!(start.explored);
        assert_eq!(start.terrain, Biome::Plains);
        let capital = start.settlement.as_ref().unwrap();
        assert_eq!(capital.kind, SettlementKind::City);
        assert_eq!(capital.name, "Silver Hand City");
        assert_eq!(capital.faction.as_deref(), Some("Silver Hand"));
    }

    #[test]
    fn capital_falls_back_to_default_faction() {
        let generation = generate(&config(8, 8, StartDirection::North), 4).unwrap();
        let start = generation.grid.get(Coord::new(4, 0)).unwrap();
        assert_eq!(
            start.settlement.as_ref().unwrap().name,
            format!("{DEFAULT_FACTION} City")
        );
    }

    #[test]
    fn only_the_start_hex_is_explored() {
        let generation = generate(&config(15, 12, StartDirection::South), 9).unwrap();
        let explored: Vec<Coord> = generation
            .grid
            .iter()
            .filter(|(_, cell)| cell.explored)
            .map(|(c, _)| c)
            .collect();
        assert_eq!(explored, vec![Coord::new(7, 11)]);
    }

    #[test]
    fn phases_run_in_order() {
        let config = config(6, 5, StartDirection::East);
        let mut generator = MapGenerator::new(&config, ChaCha8Rng::seed_from_u64(2)).unwrap();
        assert_eq!(generator.phase(), Phase::Seeding);

        let mut seen = vec![generator.phase()];
        while generator.phase() != Phase::Done {
            let next = generator.step();
            if seen.last() != Some(&next) {
                seen.push(next);
            }
        }
        assert_eq!(
            seen,
            vec![
                Phase::Seeding,
                Phase::Growing,
                Phase::Filling,
                Phase::Settling,
                Phase::Decorating,
                Phase::Done
            ]
        );
        assert_eq!(generator.step(), Phase::Done);
    }

    #[test]
    fn every_attempt_assigns_so_budget_is_never_needed() {
        for seed in 0..20 {
            let generation = generate(&config(12, 10, StartDirection::West), seed).unwrap();
            assert!(generation.report.attempts <= 12 * 10);
            assert_eq!(generation.report.filled, 0);
        }
    }

    #[test]
    fn single_hex_map() {
        let generation = generate(&config(1, 1, StartDirection::West), 0).unwrap();
        let cell = generation.grid.get(Coord::new(0, 0)).unwrap();
        assert_eq!(cell.terrain, Biome::Plains);
        assert!(cell.settlement.is_some());
        assert!(cell.poi.is_none());
        assert_eq!(generation.report.settlements_placed, 0);
        assert_eq!(generation.report.attempts, 0);
    }

    #[test]
    fn zero_sized_map_is_rejected() {
        let err = generate(&config(0, 5, StartDirection::West), 0).unwrap_err();
        assert_eq!(err, ConfigError::ZeroDimension { width: 0, height: 5 });
    }

    #[test]
    fn cluster_seeds_follow_transitions_and_zones() {
        let transitions = TransitionGraph::authored();
        for seed in 0..10 {
            let generation = generate(&config(24, 18, StartDirection::North), seed).unwrap();
            let report = &generation.report;
            for (coord, cell) in generation.grid.iter() {
                let Some(CellOrigin::ClusterSeed {
                    from,
                    grimdark,
                    fallback,
                }) = generation.origin(coord)
                else {
                    continue;
                };
                assert_eq!(
                    grimdark,
                    coord.distance(report.start) > report.grimdark_threshold
                );
                assert_eq!(cell.terrain.is_corrupted(), grimdark);
                if let (Some(from), false) = (from, fallback) {
                    assert!(transitions.allows(from, cell.terrain));
                }
                if fallback {
                    if let Some(from) = from {
                        assert!(transitions.candidates(from, grimdark).is_empty());
                    }
                }
            }
        }
    }

    #[test]
    fn custom_locations_show_up_in_pois() {
        let mut config = config(20, 20, StartDirection::West);
        config.custom_locations = vec!["The Sunken Bell".into()];
        let generation = generate(&config, 13).unwrap();
        assert!(
            generation
                .grid
                .iter()
                .filter_map(|(_, cell)| cell.poi.as_ref())
                .any(|poi| poi.name().contains("The Sunken Bell"))
        );
    }

    #[test]
    fn batch_matches_individual_runs() {
        let config = config(10, 8, StartDirection::East);
        let batch = generate_batch(&config, &[1, 2, 3]).unwrap();
        assert_eq!(batch.len(), 3);
        for (generation, seed) in batch.iter().zip([1, 2, 3]) {
            assert_eq!(generation.grid, generate(&config, seed).unwrap().grid);
            assert_eq!(generation.report.seed, Some(seed));
        }
    }
}
