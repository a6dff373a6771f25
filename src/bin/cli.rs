use clap::{Args, Parser, Subcommand};
use hexmarch::ascii::{RenderOptions, describe, describe_hex, legend};
use hexmarch::{GenerationConfig, MapDocument, MapError, StartDirection};
use log::info;
use std::path::{Path, PathBuf};

/// Hex map generator for West Marches campaigns
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new map and save it as JSON
    Generate(GenerateArgs),
    /// Print a saved map
    Show {
        file: PathBuf,
        /// Show every hex regardless of fog of war
        #[arg(long)]
        no_fog: bool,
        /// Colour glyphs with ANSI escapes
        #[arg(long)]
        color: bool,
        /// Print the glyph legend
        #[arg(long)]
        legend: bool,
    },
    /// Print one hex: terrain, settlement, POIs, status and notes
    Info { file: PathBuf, q: u32, r: u32 },
    /// Mark a hex as explored
    Reveal { file: PathBuf, q: u32, r: u32 },
    /// Mark a hex as unexplored
    Hide { file: PathBuf, q: u32, r: u32 },
    /// Attach GM notes to a hex
    Note {
        file: PathBuf,
        q: u32,
        r: u32,
        text: String,
    },
    /// Turn fog of war on or off
    Fog { file: PathBuf },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// TOML configuration file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Starting edge: N, S, E or W
    #[arg(long)]
    start: Option<StartDirection>,

    /// Faction name; repeat for several. The first owns the capital.
    #[arg(long = "faction")]
    factions: Vec<String>,

    /// Custom location name; repeat for several
    #[arg(long = "location")]
    locations: Vec<String>,

    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the JSON document [default: hex-map-<date>.json]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the map after generating it
    #[arg(long)]
    show: bool,
}

impl GenerateArgs {
    fn into_config(
        self,
    ) -> Result<(GenerationConfig, Option<PathBuf>, bool), Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => GenerationConfig::from_toml_file(path)?,
            None => GenerationConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(start) = self.start {
            config.start_direction = start;
        }
        if !self.factions.is_empty() {
            config.factions = self.factions;
        }
        if !self.locations.is_empty() {
            config.custom_locations = self.locations;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok((config, self.output, self.show))
    }
}

fn edit(
    file: &Path,
    apply: impl FnOnce(&mut MapDocument) -> Result<(), MapError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = MapDocument::load_json(file)?;
    apply(&mut doc)?;
    doc.save_json(file)?;
    info!("updated {}", file.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => {
            let (config, output, show) = args.into_config()?;
            println!(
                "Generating {}x{} map, starting {}...",
                config.width, config.height, config.start_direction
            );
            let doc = MapDocument::generate(&config)?;
            let output = output.unwrap_or_else(|| PathBuf::from(doc.default_file_name()));
            doc.save_json(&output)?;
            if let Some(seed) = doc.seed {
                println!("Seed: {seed}");
            }
            println!("Saved to {}", output.display());
            if show {
                println!();
                print!("{}", describe(&doc, RenderOptions::default()));
            }
        }
        Command::Show {
            file,
            no_fog,
            color,
            legend: with_legend,
        } => {
            let doc = MapDocument::load_json(&file)?;
            let options = RenderOptions {
                fog: !no_fog,
                color,
                ..RenderOptions::default()
            };
            print!("{}", describe(&doc, options));
            if with_legend {
                println!();
                print!("{}", legend());
            }
        }
        Command::Info { file, q, r } => {
            let doc = MapDocument::load_json(&file)?;
            if doc.cell(q, r).is_none() {
                return Err(MapError::OutOfBounds {
                    q,
                    r,
                    width: doc.width,
                    height: doc.height,
                }
                .into());
            }
            print!("{}", describe_hex(&doc, q, r));
        }
        Command::Reveal { file, q, r } => edit(&file, |doc| doc.reveal(q, r))?,
        Command::Hide { file, q, r } => edit(&file, |doc| doc.hide(q, r))?,
        Command::Note { file, q, r, text } => edit(&file, |doc| doc.set_notes(q, r, text))?,
        Command::Fog { file } => edit(&file, |doc| {
            let enabled = doc.toggle_fog_of_war();
            println!("Fog of war {}", if enabled { "on" } else { "off" });
            Ok(())
        })?,
    }

    Ok(())
}
