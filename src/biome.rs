use petgraph::Direction;
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

/// Terrain kind of a single hex.
///
/// The first eight variants form the standard catalog; the rest are the
/// corrupted ("grimdark") variants that take over toward the far edge of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Biome {
    Plains,
    Forest,
    Hills,
    Mountains,
    Swamp,
    Desert,
    Tundra,
    Lake,
    Blighted,
    Corrupted,
    Shadowlands,
    Deadlands,
    Cursed,
    Abyssal,
}

const STANDARD: [Biome; 8] = [
    Biome::Plains,
    Biome::Forest,
    Biome::Hills,
    Biome::Mountains,
    Biome::Swamp,
    Biome::Desert,
    Biome::Tundra,
    Biome::Lake,
];

const CORRUPTED: [Biome; 6] = [
    Biome::Blighted,
    Biome::Corrupted,
    Biome::Shadowlands,
    Biome::Deadlands,
    Biome::Cursed,
    Biome::Abyssal,
];

/// Hand-authored one-step transitions. Order matters: it is the order in which
/// candidates are offered to the generator. Abyssal has no row.
const TRANSITIONS: &[(Biome, &[Biome])] = &[
    (
        Biome::Plains,
        &[
            Biome::Plains,
            Biome::Forest,
            Biome::Hills,
            Biome::Desert,
            Biome::Swamp,
            Biome::Lake,
            Biome::Blighted,
        ],
    ),
    (
        Biome::Forest,
        &[
            Biome::Forest,
            Biome::Plains,
            Biome::Hills,
            Biome::Swamp,
            Biome::Lake,
            Biome::Corrupted,
        ],
    ),
    (
        Biome::Hills,
        &[
            Biome::Hills,
            Biome::Plains,
            Biome::Forest,
            Biome::Mountains,
            Biome::Desert,
            Biome::Deadlands,
        ],
    ),
    (
        Biome::Mountains,
        &[
            Biome::Mountains,
            Biome::Hills,
            Biome::Tundra,
            Biome::Shadowlands,
        ],
    ),
    (
        Biome::Swamp,
        &[
            Biome::Swamp,
            Biome::Forest,
            Biome::Plains,
            Biome::Lake,
            Biome::Corrupted,
            Biome::Cursed,
        ],
    ),
    (
        Biome::Desert,
        &[Biome::Desert, Biome::Plains, Biome::Hills, Biome::Cursed],
    ),
    (
        Biome::Tundra,
        &[Biome::Tundra, Biome::Mountains, Biome::Deadlands],
    ),
    (
        Biome::Lake,
        &[Biome::Lake, Biome::Plains, Biome::Forest, Biome::Swamp],
    ),
    (
        Biome::Blighted,
        &[
            Biome::Blighted,
            Biome::Plains,
            Biome::Corrupted,
            Biome::Shadowlands,
            Biome::Deadlands,
            Biome::Cursed,
        ],
    ),
    (
        Biome::Corrupted,
        &[
            Biome::Corrupted,
            Biome::Forest,
            Biome::Swamp,
            Biome::Blighted,
            Biome::Shadowlands,
            Biome::Cursed,
        ],
    ),
    (
        Biome::Shadowlands,
        &[
            Biome::Shadowlands,
            Biome::Mountains,
            Biome::Blighted,
            Biome::Corrupted,
            Biome::Deadlands,
        ],
    ),
    (
        Biome::Deadlands,
        &[
            Biome::Deadlands,
            Biome::Hills,
            Biome::Tundra,
            Biome::Blighted,
            Biome::Shadowlands,
            Biome::Cursed,
        ],
    ),
    (
        Biome::Cursed,
        &[
            Biome::Cursed,
            Biome::Desert,
            Biome::Swamp,
            Biome::Blighted,
            Biome::Corrupted,
            Biome::Deadlands,
        ],
    ),
];

impl Biome {
    /// Standard catalog, in catalog order.
    #[must_use]
    pub fn standard() -> &'static [Biome] {
        &STANDARD
    }

    /// Corrupted catalog, in catalog order.
    #[must_use]
    pub fn corrupted() -> &'static [Biome] {
        &CORRUPTED
    }

    /// Every biome, standard first.
    pub fn all() -> impl Iterator<Item = Biome> {
        STANDARD.into_iter().chain(CORRUPTED)
    }

    /// The catalog a new cluster is drawn from, depending on its zone.
    #[must_use]
    pub fn catalog(grimdark: bool) -> &'static [Biome] {
        if grimdark { &CORRUPTED } else { &STANDARD }
    }

    #[must_use]
    pub fn is_corrupted(self) -> bool {
        CORRUPTED.contains(&self)
    }

    /// Biomes where settlements may be founded.
    #[must_use]
    pub fn is_habitable(self) -> bool {
        matches!(
            self,
            Biome::Plains | Biome::Forest | Biome::Hills | Biome::Lake
        ) && !self.is_corrupted()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Biome::Plains => "Plains",
            Biome::Forest => "Forest",
            Biome::Hills => "Hills",
            Biome::Mountains => "Mountains",
            Biome::Swamp => "Swamp",
            Biome::Desert => "Desert",
            Biome::Tundra => "Tundra",
            Biome::Lake => "Lake",
            Biome::Blighted => "Blighted Lands",
            Biome::Corrupted => "Corrupted Forest",
            Biome::Shadowlands => "Shadowlands",
            Biome::Deadlands => "Deadlands",
            Biome::Cursed => "Cursed Wastes",
            Biome::Abyssal => "Abyssal Depths",
        }
    }

    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            Biome::Plains => '·',
            Biome::Forest => '♠',
            Biome::Hills => '∩',
            Biome::Mountains => '▲',
            Biome::Swamp => '≋',
            Biome::Desert => '∴',
            Biome::Tundra => '❄',
            Biome::Lake => '~',
            Biome::Blighted => '☠',
            Biome::Corrupted => '†',
            Biome::Shadowlands => '◆',
            Biome::Deadlands => '✝',
            Biome::Cursed => '⚠',
            Biome::Abyssal => '⚉',
        }
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        match self {
            Biome::Plains => [0x86, 0xef, 0xac],
            Biome::Forest => [0x16, 0x65, 0x34],
            Biome::Hills => [0xa1, 0x62, 0x07],
            Biome::Mountains => [0x78, 0x71, 0x6c],
            Biome::Swamp => [0x4d, 0x7c, 0x0f],
            Biome::Desert => [0xfb, 0xbf, 0x24],
            Biome::Tundra => [0xe0, 0xf2, 0xfe],
            Biome::Lake => [0x3b, 0x82, 0xf6],
            Biome::Blighted => [0x3f, 0x1f, 0x3f],
            Biome::Corrupted => [0x1a, 0x1a, 0x2e],
            Biome::Shadowlands => [0x16, 0x21, 0x3e],
            Biome::Deadlands => [0x4a, 0x4a, 0x4a],
            Biome::Cursed => [0x5a, 0x1f, 0x5a],
            Biome::Abyssal => [0x0d, 0x11, 0x17],
        }
    }

    /// Render colour as `#rrggbb`.
    #[must_use]
    pub fn color(self) -> String {
        let [r, g, b] = self.to_rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Directed graph of legal biome-to-biome transitions.
///
/// Edges are kept exactly as authored and never mirrored: `Lake -> Swamp` says
/// nothing about `Swamp -> Lake` unless Swamp's own row lists Lake.
#[derive(Debug, Clone)]
pub struct TransitionGraph {
    graph: DiGraphMap<Biome, ()>,
}

impl Default for TransitionGraph {
    fn default() -> Self {
        Self::authored()
    }
}

impl TransitionGraph {
    /// Builds the graph from the authored transition table.
    #[must_use]
    pub fn authored() -> Self {
        Self::from_table(TRANSITIONS)
    }

    /// Builds a graph from an arbitrary `(from, [to...])` table. Every biome is
    /// present as a node even when it has no row.
    #[must_use]
    pub fn from_table(table: &[(Biome, &[Biome])]) -> Self {
        let mut graph = DiGraphMap::new();
        for biome in Biome::all() {
            graph.add_node(biome);
        }
        for &(from, targets) in table {
            for &to in targets {
                graph.add_edge(from, to, ());
            }
        }
        Self { graph }
    }

    /// Biomes a new cluster may take when it borders `from`, in authored order.
    #[must_use]
    pub fn allowed_from(&self, from: Biome) -> Vec<Biome> {
        self.graph
            .neighbors_directed(from, Direction::Outgoing)
            .collect()
    }

    #[must_use]
    pub fn allows(&self, from: Biome, to: Biome) -> bool {
        self.graph.contains_edge(from, to)
    }

    /// Authored candidates for a cluster bordering `from`, restricted to the
    /// zone's catalog. Empty when the authored row has nothing in that catalog.
    #[must_use]
    pub fn candidates(&self, from: Biome, grimdark: bool) -> Vec<Biome> {
        self.allowed_from(from)
            .into_iter()
            .filter(|b| b.is_corrupted() == grimdark)
            .collect()
    }

    /// Authored transitions whose reverse is missing, self-loops excluded.
    #[must_use]
    pub fn one_way_transitions(&self) -> Vec<(Biome, Biome)> {
        self.graph
            .all_edges()
            .filter(|&(a, b, _)| a != b && !self.graph.contains_edge(b, a))
            .map(|(a, b, _)| (a, b))
            .collect()
    }
}
