//! Data types for the station activity/balance pipeline.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Deserialize;

/// Raw trip row as it appears in the archive CSV. Station names may be
/// absent; older archive vintages use space-separated header names, covered
/// by the serde aliases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripRecord {
    pub starttime: Option<String>,
    pub stoptime: Option<String>,
    #[serde(alias = "start station name")]
    pub start_station_name: Option<String>,
    #[serde(alias = "end station name")]
    pub end_station_name: Option<String>,
}

/// Whether a station-perspective event is a trip leaving or entering the
/// station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Departure,
    Arrival,
}

/// A single station-perspective observation derived from one side of a trip.
#[derive(Debug, Clone)]
pub struct TripEvent {
    pub station: String,
    pub kind: EventKind,
    pub timestamp: NaiveDateTime,
}

/// Aggregate for one `(station, hour)` cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bucket {
    /// Event count in the bucket (arrivals + departures).
    pub activity: f64,
    /// Departures minus arrivals; negative means net inflow of bikes.
    pub balance: i64,
}

/// Station × hour aggregation. Every observed station carries all 24 hours,
/// zero-filled, and iteration is deterministic: station name order, then
/// hour.
#[derive(Debug, Default)]
pub struct StationHourTable {
    pub stations: BTreeMap<String, [Bucket; 24]>,
}

impl StationHourTable {
    pub fn bucket(&self, station: &str, hour: u8) -> Option<&Bucket> {
        self.stations.get(station).map(|hours| &hours[hour as usize])
    }

    /// Iterates `(station, hour, bucket)` in grouping-key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u8, &Bucket)> {
        self.stations.iter().flat_map(|(station, hours)| {
            hours
                .iter()
                .enumerate()
                .map(move |(hour, bucket)| (station.as_str(), hour as u8, bucket))
        })
    }
}

/// Color-channel coordinates derived from one bucket: hue in degrees,
/// saturation and luminance as percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelValues {
    pub hue: f64,
    pub saturation: f64,
    pub luminance: f64,
}
