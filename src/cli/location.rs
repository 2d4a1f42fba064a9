//! Location commands: add, list, show, history.

use clap::Subcommand;

use crate::config::Config;
use crate::model::{Coordinates, Location};
use crate::nearby::nearby;
use crate::storage::Storage;

use super::{
    PlaceArgs,
    format::{format_location_line, format_report},
    parse_place_id,
};

#[derive(Debug, Subcommand)]
pub enum LocationCommand {
    /// Store a place before anyone has reported on it.
    Add {
        /// Place ID from the place search.
        place_id: String,

        #[command(flatten)]
        place: PlaceArgs,
    },

    /// List stored locations.
    List {
        /// Only locations near this point, nearest first (`LAT,LON`).
        #[arg(long, value_parser = parse_coordinates, allow_hyphen_values = true)]
        near: Option<Coordinates>,

        /// Radius for `--near`, in miles. Defaults to the configured radius.
        #[arg(long, requires = "near")]
        radius: Option<f64>,
    },

    /// Show a location and its latest machine counts.
    Show {
        /// Place ID.
        place_id: String,

        /// Print the stored document as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List every report filed for a location, oldest first.
    History {
        /// Place ID.
        place_id: String,
    },
}

pub(super) fn run(
    config: &Config,
    storage: &Storage,
    command: LocationCommand,
) -> Result<(), String> {
    match command {
        LocationCommand::Add { place_id, place } => cmd_add(storage, &place_id, place),
        LocationCommand::List { near, radius } => cmd_list(
            storage,
            near.as_ref(),
            radius.unwrap_or(config.search_radius_miles),
        ),
        LocationCommand::Show { place_id, json } => cmd_show(storage, &place_id, json),
        LocationCommand::History { place_id } => cmd_history(storage, &place_id),
    }
}

fn cmd_add(storage: &Storage, place_id: &str, place: PlaceArgs) -> Result<(), String> {
    let place = place.into_place(parse_place_id(place_id)?)?;
    let location = storage
        .seed_location(place)
        .map_err(|e| format!("failed to add location: {e}"))?;
    println!("{}", location.place_id());
    Ok(())
}

fn cmd_list(storage: &Storage, near: Option<&Coordinates>, radius: f64) -> Result<(), String> {
    let locations = storage
        .list_locations()
        .map_err(|e| format!("failed to list locations: {e}"))?;

    let lines: Vec<String> = match near {
        Some(origin) => nearby(&locations, origin, radius)
            .into_iter()
            .map(|(l, d)| format_location_line(l, Some(d)))
            .collect(),
        None => locations
            .iter()
            .map(|l| format_location_line(l, None))
            .collect(),
    };

    if lines.is_empty() {
        println!("No locations");
        return Ok(());
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn cmd_show(storage: &Storage, place_id: &str, json: bool) -> Result<(), String> {
    let location = load(storage, place_id)?;

    if json {
        let json = serde_json::to_string_pretty(&location)
            .map_err(|e| format!("failed to serialize location: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", location.place.name);
    println!("{}", location.place.address);
    println!(
        "{:.6}, {:.6}",
        location.place.coordinates.latitude, location.place.coordinates.longitude
    );
    if let Some(image) = &location.place.display_image {
        println!("image: {image}");
    }
    match location.latest_report() {
        Some(latest) => {
            println!(
                "{}/{} machines working",
                location.good_machine_count(),
                location.total_machine_count()
            );
            println!("{}", format_report(location.reports().len(), latest));
        }
        None => println!("No reports yet"),
    }
    Ok(())
}

fn cmd_history(storage: &Storage, place_id: &str) -> Result<(), String> {
    let location = load(storage, place_id)?;
    if location.reports().is_empty() {
        println!("No reports yet");
        return Ok(());
    }
    for (i, report) in location.reports().iter().enumerate() {
        println!("{}", format_report(i + 1, report));
    }
    Ok(())
}

fn load(storage: &Storage, place_id: &str) -> Result<Location, String> {
    storage
        .require_location(&parse_place_id(place_id)?)
        .map_err(|e| e.to_string())
}

/// Parse `LAT,LON` in decimal degrees.
fn parse_coordinates(raw: &str) -> Result<Coordinates, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{raw}'"))?;
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude '{lat}': {e}"))?;
    let longitude: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude '{lon}': {e}"))?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("coordinates out of range: '{raw}'"));
    }
    Ok(Coordinates {
        latitude,
        longitude,
    })
}
