//! Inspection outputs: CSV append of trend rows and a JSON dump of the
//! station-hour table, so a run's intermediates can be examined without
//! re-running the pipelines.

use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::ridership::types::TrendRow;
use crate::stations::color::ChannelScale;
use crate::stations::types::StationHourTable;

/// Flat export row for one station-hour bucket, channels included.
#[derive(Debug, Serialize)]
pub struct StationHourRow<'a> {
    pub station: &'a str,
    pub hour: String,
    pub activity: f64,
    pub balance: i64,
    pub hue: f64,
    pub saturation: f64,
    pub luminance: f64,
}

/// Flattens the aggregated table into export rows in key order, with hours
/// zero-padded to two digits.
pub fn station_rows(table: &StationHourTable) -> Vec<StationHourRow<'_>> {
    let scale = ChannelScale::from_table(table);

    table
        .iter()
        .map(|(station, hour, bucket)| {
            let channels = scale.channels(bucket);
            StationHourRow {
                station,
                hour: format!("{hour:02}"),
                activity: bucket.activity,
                balance: bucket.balance,
                hue: channels.hue,
                saturation: channels.saturation,
                luminance: channels.luminance,
            }
        })
        .collect()
}

/// Writes the aggregated station-hour table as pretty JSON.
pub fn write_station_json(table: &StationHourTable, path: &Path) -> Result<()> {
    let rows = station_rows(table);
    let json = serde_json::to_string_pretty(&rows)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;

    info!(rows = rows.len(), path = %path.display(), "Station-hour JSON written");
    Ok(())
}

/// Appends trend rows to a CSV file, writing headers only when the file is
/// first created.
pub fn append_trend_rows(path: &str, rows: &[TrendRow]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = rows.len(), "Appending trend CSV rows");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("opening {path}"))?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
