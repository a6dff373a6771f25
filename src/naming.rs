//! Procedural names for points of interest.
//!
//! Names are `"<Adjective> <Noun>"` drawn from word banks keyed by biome.
//! Biomes without their own bank (currently Abyssal) borrow the Plains bank.

use crate::biome::Biome;
use rand::Rng;

struct WordBank {
    biome: Biome,
    adjectives: &'static [&'static str],
    nouns: &'static [&'static str],
}

const BANKS: &[WordBank] = &[
    WordBank {
        biome: Biome::Plains,
        adjectives: &[
            "Ancient", "Forgotten", "Hidden", "Mysterious", "Lost", "Abandoned", "Weathered",
            "Crumbling", "Sacred",
        ],
        nouns: &[
            "Ruins", "Tower", "Shrine", "Stones", "Monument", "Cairn", "Settlement",
            "Battlefield", "Outpost", "Well",
        ],
    },
    WordBank {
        biome: Biome::Forest,
        adjectives: &[
            "Verdant", "Enchanted", "Twisted", "Overgrown", "Mossy", "Ancient", "Shadowy",
            "Whispering", "Tangled",
        ],
        nouns: &[
            "Grove", "Glade", "Hollow", "Circle", "Tree", "Path", "Glen", "Thicket", "Bower",
            "Dell",
        ],
    },
    WordBank {
        biome: Biome::Hills,
        adjectives: &[
            "Windswept", "Rocky", "Echoing", "Lonely", "Rugged", "Steep", "Towering", "Ancient",
            "Crumbling",
        ],
        nouns: &[
            "Keep", "Fort", "Lookout", "Cave", "Mine", "Warren", "Barrow", "Tumulus",
            "Stronghold",
        ],
    },
    WordBank {
        biome: Biome::Mountains,
        adjectives: &[
            "Frozen", "Treacherous", "Sky-Piercing", "Snow-Capped", "Perilous", "Jagged",
            "Lofty", "Storm-Wracked",
        ],
        nouns: &[
            "Peak", "Pass", "Cave", "Mine", "Monastery", "Refuge", "Aerie", "Cavern", "Grotto",
            "Chasm",
        ],
    },
    WordBank {
        biome: Biome::Swamp,
        adjectives: &[
            "Fetid", "Murky", "Mist-Shrouded", "Decaying", "Stagnant", "Poisonous", "Sodden",
            "Rotting", "Reeking",
        ],
        nouns: &[
            "Bog", "Fen", "Marsh", "Mire", "Pool", "Grove", "Hut", "Hovel", "Shack", "Hideout",
        ],
    },
    WordBank {
        biome: Biome::Desert,
        adjectives: &[
            "Scorched", "Buried", "Sun-Bleached", "Desiccated", "Windswept", "Barren", "Parched",
            "Shifting", "Miraging",
        ],
        nouns: &[
            "Oasis", "Tomb", "Temple", "Pyramid", "Ruins", "Vault", "Crypt", "Shrine",
            "Monument",
        ],
    },
    WordBank {
        biome: Biome::Tundra,
        adjectives: &[
            "Frozen", "Icy", "Howling", "Desolate", "Bitter", "Glacial", "Frostbitten",
            "Wind-Scoured",
        ],
        nouns: &[
            "Cave", "Shelter", "Outpost", "Cairn", "Barrow", "Tomb", "Shrine", "Monolith",
        ],
    },
    WordBank {
        biome: Biome::Lake,
        adjectives: &[
            "Serene", "Deep", "Crystalline", "Mist-Covered", "Reflective", "Tranquil", "Sunken",
            "Rippling",
        ],
        nouns: &[
            "Island", "Dock", "Shipwreck", "Grotto", "Spring", "Falls", "Reef", "Wreck",
        ],
    },
    WordBank {
        biome: Biome::Blighted,
        adjectives: &[
            "Cursed", "Corrupted", "Diseased", "Withered", "Accursed", "Tainted", "Plagued",
            "Malevolent", "Festering",
        ],
        nouns: &[
            "Altar", "Site", "Ground", "Zone", "Field", "Pit", "Scar", "Wound", "Blight",
        ],
    },
    WordBank {
        biome: Biome::Corrupted,
        adjectives: &[
            "Twisted", "Dark", "Corrupted", "Malformed", "Warped", "Profane", "Vile", "Unholy",
            "Defiled",
        ],
        nouns: &[
            "Tree", "Grove", "Circle", "Shrine", "Pool", "Spring", "Hollow", "Heart",
        ],
    },
    WordBank {
        biome: Biome::Shadowlands,
        adjectives: &[
            "Shadowy", "Darkened", "Umbral", "Tenebrous", "Gloomy", "Shrouded", "Pitch-Black",
            "Nightmarish",
        ],
        nouns: &[
            "Portal", "Gate", "Rift", "Void", "Nexus", "Well", "Abyss", "Chasm",
        ],
    },
    WordBank {
        biome: Biome::Deadlands,
        adjectives: &[
            "Lifeless", "Ashen", "Barren", "Skeletal", "Deathly", "Bone-Strewn", "Macabre",
            "Necrotic",
        ],
        nouns: &[
            "Graveyard", "Crypt", "Ossuary", "Barrow", "Tomb", "Grave", "Boneyard", "Mausoleum",
        ],
    },
    WordBank {
        biome: Biome::Cursed,
        adjectives: &[
            "Hexed", "Damned", "Doomed", "Forsaken", "Accursed", "Bewitched", "Ill-Fated",
            "Jinxed",
        ],
        nouns: &[
            "Circle", "Ground", "Altar", "Stone", "Monument", "Site", "Place", "Nexus",
        ],
    },
];

fn bank(biome: Biome) -> &'static WordBank {
    BANKS
        .iter()
        .find(|b| b.biome == biome)
        .unwrap_or(&BANKS[0])
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

/// Generates a point-of-interest name suited to `biome`.
pub fn poi_name<R: Rng + ?Sized>(biome: Biome, rng: &mut R) -> String {
    let bank = bank(biome);
    let adjective = pick(rng, bank.adjectives);
    let noun = pick(rng, bank.nouns);
    format!("{adjective} {noun}")
}
