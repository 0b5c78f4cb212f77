//! Station-hour aggregation of trip events.
//!
//! Each retained trip contributes two observations: a departure at its
//! start station (hour taken from the start time) and an arrival at its end
//! station (hour taken from the stop time). Buckets cover the full cross
//! product of observed stations and all 24 hours, so hours with no events
//! still appear, zero-filled.
//!
//! `activity` is the plain event count per bucket. The analysis this
//! reimplements nominally averaged that count over days, but its grouping
//! made the average a no-op over a constant; the count semantics are kept
//! deliberately rather than second-guessing the intent.

use chrono::{NaiveDateTime, Timelike};
use tracing::debug;

use crate::stations::types::{Bucket, EventKind, StationHourTable, TripEvent, TripRecord};

/// Timestamp layouts seen across archive vintages.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

/// Expands retained trips into station-perspective events.
///
/// Both station names must be present for a trip to contribute anything;
/// each side's event additionally needs its own timestamp to parse.
pub fn trip_events(trips: &[TripRecord]) -> Vec<TripEvent> {
    let mut events = Vec::with_capacity(trips.len() * 2);

    for trip in trips {
        let (Some(start), Some(end)) = (&trip.start_station_name, &trip.end_station_name)
        else {
            continue;
        };

        if let Some(ts) = trip.starttime.as_deref().and_then(parse_timestamp) {
            events.push(TripEvent {
                station: start.clone(),
                kind: EventKind::Departure,
                timestamp: ts,
            });
        }
        if let Some(ts) = trip.stoptime.as_deref().and_then(parse_timestamp) {
            events.push(TripEvent {
                station: end.clone(),
                kind: EventKind::Arrival,
                timestamp: ts,
            });
        }
    }

    debug!(events = events.len(), "Trip events derived");
    events
}

/// Groups events into the station × hour table. Deterministic for fixed
/// input; iteration order is station name, then hour.
pub fn aggregate_events(events: &[TripEvent]) -> StationHourTable {
    let mut table = StationHourTable::default();

    for event in events {
        let hours = table
            .stations
            .entry(event.station.clone())
            .or_insert([Bucket::default(); 24]);

        let bucket = &mut hours[event.timestamp.hour() as usize];
        bucket.activity += 1.0;
        match event.kind {
            EventKind::Departure => bucket.balance += 1,
            EventKind::Arrival => bucket.balance -= 1,
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(start: &str, end: &str, starttime: &str, stoptime: &str) -> TripRecord {
        TripRecord {
            starttime: Some(starttime.into()),
            stoptime: Some(stoptime.into()),
            start_station_name: Some(start.into()),
            end_station_name: Some(end.into()),
        }
    }

    fn two_station_table() -> StationHourTable {
        let trips = vec![
            trip("A", "B", "2021-09-01 08:15:00", "2021-09-01 08:40:00"),
            trip("B", "A", "2021-09-01 08:45:00", "2021-09-01 09:05:00"),
        ];
        aggregate_events(&trip_events(&trips))
    }

    #[test]
    fn test_each_trip_yields_departure_and_arrival() {
        let trips = vec![trip("A", "B", "2021-09-01 08:15:00", "2021-09-01 08:40:00")];
        let events = trip_events(&trips);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].station, "A");
        assert_eq!(events[0].kind, EventKind::Departure);
        assert_eq!(events[1].station, "B");
        assert_eq!(events[1].kind, EventKind::Arrival);
    }

    #[test]
    fn test_trips_missing_a_station_yield_no_events() {
        let mut incomplete = trip("A", "B", "2021-09-01 08:15:00", "2021-09-01 08:40:00");
        incomplete.end_station_name = None;
        assert!(trip_events(&[incomplete]).is_empty());
    }

    #[test]
    fn test_unparsable_timestamp_skips_only_that_side() {
        let trips = vec![trip("A", "B", "garbage", "2021-09-01 08:40:00")];
        let events = trip_events(&trips);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Arrival);
    }

    #[test]
    fn test_timestamp_formats_with_and_without_seconds() {
        assert!(parse_timestamp("2021-09-01 08:15:00").is_some());
        assert!(parse_timestamp("2021-09-01 08:15:00.1230").is_some());
        assert!(parse_timestamp("2021-09-01 08:15").is_some());
        assert!(parse_timestamp("09/01/2021 08:15").is_none());
    }

    #[test]
    fn test_hour_comes_from_each_events_own_timestamp() {
        let table = two_station_table();

        // A departs at 08, receives an arrival at 09
        assert_eq!(table.bucket("A", 8).unwrap().balance, 1);
        assert_eq!(table.bucket("A", 8).unwrap().activity, 1.0);
        assert_eq!(table.bucket("A", 9).unwrap().balance, -1);

        // B receives an arrival at 08 and departs at 08 in the same bucket
        assert_eq!(table.bucket("B", 8).unwrap().activity, 2.0);
        assert_eq!(table.bucket("B", 8).unwrap().balance, 0);
    }

    #[test]
    fn test_all_24_hours_present_for_every_station() {
        let table = two_station_table();

        for (_, hours) in &table.stations {
            assert_eq!(hours.len(), 24);
        }
        // an hour with no events is zero-filled, not absent
        assert_eq!(*table.bucket("A", 3).unwrap(), Bucket::default());
    }

    #[test]
    fn test_station_balance_sums_to_departures_minus_arrivals() {
        let trips = vec![
            trip("A", "B", "2021-09-01 07:10:00", "2021-09-01 07:30:00"),
            trip("A", "B", "2021-09-01 18:05:00", "2021-09-01 18:25:00"),
            trip("B", "A", "2021-09-01 19:00:00", "2021-09-01 19:20:00"),
        ];
        let table = aggregate_events(&trip_events(&trips));

        // A: 2 departures, 1 arrival
        let a_sum: i64 = (0..24).map(|h| table.bucket("A", h).unwrap().balance).sum();
        assert_eq!(a_sum, 1);

        // B: 1 departure, 2 arrivals
        let b_sum: i64 = (0..24).map(|h| table.bucket("B", h).unwrap().balance).sum();
        assert_eq!(b_sum, -1);
    }

    #[test]
    fn test_iteration_is_key_ordered() {
        let table = two_station_table();
        let keys: Vec<(String, u8)> = table
            .iter()
            .map(|(station, hour, _)| (station.to_string(), hour))
            .collect();

        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys.len(), 48);
    }
}
