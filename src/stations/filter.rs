//! Global referential filter over raw trip records.
//!
//! A trip is retained only when it names at least one station and its end
//! station also appears as the start station of some retained trip.
//! Stations that never originate a trip would otherwise surface as
//! incomplete rows in the station × hour grid. Dropping a trip can remove a
//! station's only outgoing trip and invalidate other rows, so the global
//! pass repeats until nothing more drops; the result is a true fixed point
//! and re-applying the filter changes nothing.

use std::collections::HashSet;

use tracing::info;

use crate::stations::types::TripRecord;

pub fn filter_trips(trips: Vec<TripRecord>) -> Vec<TripRecord> {
    let before = trips.len();
    let mut kept = trips;

    loop {
        let start_stations: HashSet<String> = kept
            .iter()
            .filter_map(|t| t.start_station_name.clone())
            .collect();

        let len_before_pass = kept.len();
        kept.retain(|t| {
            let names_station =
                t.start_station_name.is_some() || t.end_station_name.is_some();
            let end_known = t
                .end_station_name
                .as_ref()
                .is_some_and(|end| start_stations.contains(end));
            names_station && end_known
        });

        if kept.len() == len_before_pass {
            break;
        }
    }

    info!(before, after = kept.len(), "Referential trip filter applied");
    kept
}
