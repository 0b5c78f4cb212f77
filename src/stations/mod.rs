//! Station activity/balance pipeline: filter raw bike trips, reshape them
//! into per-station hourly events, aggregate, map onto color channels, and
//! render a station × hour heatmap.

pub mod aggregate;
pub mod color;
pub mod filter;
pub mod heatmap;
pub mod types;

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::stations::types::TripRecord;

/// Reads raw trip rows from a CSV file. Columns beyond the four the
/// pipeline uses are ignored.
pub fn load_trips(path: impl AsRef<Path>) -> Result<Vec<TripRecord>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("opening trip csv {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut trips = Vec::new();
    for result in rdr.deserialize() {
        let record: TripRecord =
            result.with_context(|| format!("reading trip csv {}", path.display()))?;
        trips.push(record);
    }

    info!(rows = trips.len(), path = %path.display(), "Trip records loaded");
    Ok(trips)
}
