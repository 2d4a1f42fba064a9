//! CLI interface for Can Eye.
//!
//! Each subcommand is non-interactive: arguments in, plain text out.
//!
//! - `can-eye location add|list|show|history`: browse and seed locations.
//! - `can-eye report <place-id>`: file a condition report. The arguments
//!   are fed through the report wizard exactly as a UI would feed it.
//! - `can-eye photo <ref>`: export a photo attached to a report.

mod format;
mod location;
mod report;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::model::{Coordinates, PhotoRef, Place, PlaceId};
use crate::storage::Storage;

use location::LocationCommand;
use report::ReportArgs;

/// Can Eye: find recycling machines and report on their condition.
#[derive(Debug, Parser)]
#[command(name = "can-eye", after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// Storage root. Overrides `data-dir` from the config file.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: reporting on a location
  1. can-eye location list --near 40.7007,-73.9181
  2. can-eye location show ChIJ-wyckoff
  3. can-eye report ChIJ-wyckoff --as a@x.com --glass up,repair --bottle up
  4. can-eye location history ChIJ-wyckoff

First report for a place nobody has stored yet:
  can-eye report ChIJ-new --glass up --name 'Key Food' \
    --address '1 Wyckoff Ave' --lat 40.7007 --lon -73.9181";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and seed locations.
    Location {
        #[command(subcommand)]
        command: LocationCommand,
    },

    /// File a condition report for a location.
    ///
    /// Each `--glass`/`--can`/`--bottle` entry is one machine: `up` if it
    /// works, `repair` if it needs fixing. Omit a type to report none.
    Report(ReportArgs),

    /// Save an attached photo to a file.
    Photo {
        /// Photo reference, as printed with the report (e.g. `photos/3fa9…`).
        reference: String,

        /// Where to write the image.
        #[arg(long)]
        out: PathBuf,
    },
}

/// Descriptive fields for a place, as shown by the place search.
#[derive(Debug, Args)]
pub struct PlaceArgs {
    /// Display name.
    #[arg(long)]
    name: Option<String>,

    /// Street address.
    #[arg(long)]
    address: Option<String>,

    /// Latitude in decimal degrees.
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Image URL shown for the place.
    #[arg(long)]
    image: Option<String>,
}

impl PlaceArgs {
    /// The descriptive flags that were actually passed.
    fn given(&self) -> Vec<&'static str> {
        [
            ("--name", self.name.is_some()),
            ("--address", self.address.is_some()),
            ("--lat", self.lat.is_some()),
            ("--lon", self.lon.is_some()),
            ("--image", self.image.is_some()),
        ]
        .into_iter()
        .filter_map(|(flag, set)| set.then_some(flag))
        .collect()
    }

    /// Build a place, requiring every descriptive field but the image.
    fn into_place(self, place_id: PlaceId) -> Result<Place, String> {
        let (Some(name), Some(address), Some(latitude), Some(longitude)) =
            (self.name, self.address, self.lat, self.lon)
        else {
            return Err(format!(
                "unknown place '{place_id}': pass --name, --address, --lat and --lon"
            ));
        };
        Ok(Place {
            place_id,
            name,
            address,
            coordinates: Coordinates {
                latitude,
                longitude,
            },
            display_image: self.image,
        })
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config) -> Result<(), String> {
    let cli = Cli::parse();

    let root = cli
        .data_dir
        .or_else(|| config.data_dir.clone())
        .or_else(Storage::default_root)
        .ok_or("could not determine home directory; pass --data-dir")?;
    let storage = Storage::new(&root)
        .map_err(|e| format!("failed to open storage at {}: {e}", root.display()))?;

    match cli.command {
        Command::Location { command } => location::run(config, &storage, command),
        Command::Report(args) => report::cmd_report(config, &storage, args),
        Command::Photo { reference, out } => cmd_photo(&storage, &reference, &out),
    }
}

fn cmd_photo(storage: &Storage, reference: &str, out: &Path) -> Result<(), String> {
    let bytes = storage
        .load_photo(&PhotoRef::new(reference))
        .map_err(|e| e.to_string())?;
    fs::write(out, &bytes).map_err(|e| format!("failed to write {}: {e}", out.display()))?;
    eprintln!("Saved {reference} → {}", out.display());
    Ok(())
}

fn parse_place_id(raw: &str) -> Result<PlaceId, String> {
    PlaceId::new(raw).map_err(|e| e.to_string())
}
