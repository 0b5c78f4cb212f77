//! Loader and cleaner for the daily ridership CSV.
//!
//! The source file names its columns by human-readable convention, e.g.
//! "Subways: % of Comparable Pre-Pandemic Day". Headers are mapped onto a
//! `(mode, total|change)` pair, percentage strings lose their `%` suffix,
//! dates are parsed from `MM/DD/YYYY`, and the Metro-North total column
//! (which ships as text with thousands separators) is coerced to numeric.
//! Any cell that fails to parse becomes `None`; a bad cell never aborts the
//! load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::ridership::types::{Mode, RidershipRow, RidershipTable};

/// Leading header token for each transportation mode.
static MODE_PREFIXES: &[(&str, Mode)] = &[
    ("Subways", Mode::Subway),
    ("Buses", Mode::Bus),
    ("LIRR", Mode::Lirr),
    ("Metro-North", Mode::Mta),
    ("Access-A-Ride", Mode::AccessRide),
    ("Bridges and Tunnels", Mode::BridgeTunnel),
];

const DATE_FORMAT: &str = "%m/%d/%Y";

/// Role a raw CSV column plays after header mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRole {
    Date,
    Total(Mode),
    Change(Mode),
    Ignored,
}

/// Loads and cleans the ridership CSV at `path`, logging a per-column
/// missing-value summary as a diagnostic.
pub fn load_ridership(path: impl AsRef<Path>) -> Result<RidershipTable> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("opening ridership csv {}", path.display()))?;
    let table = read_ridership(file)
        .with_context(|| format!("reading ridership csv {}", path.display()))?;

    info!(rows = table.rows.len(), path = %path.display(), "Ridership table loaded");
    log_missing_summary(&table);

    Ok(table)
}

/// Cleans ridership rows from any CSV reader. Split out from the path-based
/// entry point so tests can feed in-memory data.
pub fn read_ridership<R: Read>(reader: R) -> Result<RidershipTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers().context("reading ridership csv headers")?;
    let roles = map_headers(headers);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row = RidershipRow::default();

        for (i, role) in roles.iter().enumerate() {
            let raw = record.get(i).unwrap_or("");
            match role {
                ColumnRole::Date => row.date = parse_date(raw),
                ColumnRole::Total(mode) => row.cell_mut(*mode).total = parse_number(raw),
                ColumnRole::Change(mode) => row.cell_mut(*mode).change = parse_percent(raw),
                ColumnRole::Ignored => {}
            }
        }

        rows.push(row);
    }

    Ok(RidershipTable { rows })
}

fn map_headers(headers: &csv::StringRecord) -> Vec<ColumnRole> {
    headers
        .iter()
        .map(|header| {
            let header = header.trim();
            if header.eq_ignore_ascii_case("date") {
                return ColumnRole::Date;
            }

            let mode = MODE_PREFIXES
                .iter()
                .find(|(prefix, _)| header.starts_with(prefix))
                .map(|(_, mode)| *mode);

            match mode {
                Some(mode) if header.contains('%') => ColumnRole::Change(mode),
                Some(mode) => ColumnRole::Total(mode),
                None => {
                    warn!(header, "Unrecognized ridership column, ignoring");
                    ColumnRole::Ignored
                }
            }
        })
        .collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Parses a numeric cell, tolerating thousands separators. The Metro-North
/// total column arrives as quoted text like `"55,702"`.
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Parses a percentage cell, stripping the `%` suffix when present.
fn parse_percent(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_suffix('%').unwrap_or(trimmed);
    if stripped.is_empty() {
        return None;
    }
    stripped.trim().parse::<f64>().ok()
}

/// Per-column missing-value counts. Diagnostic only; nothing downstream
/// consumes this.
fn log_missing_summary(table: &RidershipTable) {
    let missing_dates = table.rows.iter().filter(|r| r.date.is_none()).count();
    debug!(missing_dates, "Missing-value summary");

    for mode in Mode::ALL {
        let missing_total = table
            .rows
            .iter()
            .filter(|r| r.cell(mode).total.is_none())
            .count();
        let missing_change = table
            .rows
            .iter()
            .filter(|r| r.cell(mode).change.is_none())
            .count();
        debug!(
            mode = mode.label(),
            missing_total, missing_change, "Missing-value summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
Date,Subways: Total Estimated Ridership,Subways: % of Comparable Pre-Pandemic Day,Metro-North: Total Estimated Ridership,Metro-North: % of Comparable Pre-Pandemic Day
03/01/2021,1456286,42.4%,\"55,702\",28.1%
03/02/2021,1525648,44.3%,57118,29.0%
";

    fn load_sample() -> RidershipTable {
        read_ridership(Cursor::new(SAMPLE)).unwrap()
    }

    #[test]
    fn test_dates_parse_from_us_format() {
        let table = load_sample();
        assert_eq!(
            table.rows[0].date,
            Some(NaiveDate::from_ymd_opt(2021, 3, 1).unwrap())
        );
        assert_eq!(
            table.rows[1].date,
            Some(NaiveDate::from_ymd_opt(2021, 3, 2).unwrap())
        );
    }

    #[test]
    fn test_percent_suffix_is_stripped() {
        let table = load_sample();
        assert_eq!(table.rows[0].cell(Mode::Subway).change, Some(42.4));
        assert_eq!(table.rows[1].cell(Mode::Subway).change, Some(44.3));
    }

    #[test]
    fn test_mta_total_text_is_coerced_to_numeric() {
        let table = load_sample();
        assert_eq!(table.rows[0].cell(Mode::Mta).total, Some(55702.0));
        assert_eq!(table.rows[1].cell(Mode::Mta).total, Some(57118.0));
    }

    #[test]
    fn test_unparsable_cells_become_none_not_errors() {
        let csv = "\
Date,Subways: Total Estimated Ridership,Subways: % of Comparable Pre-Pandemic Day
not-a-date,garbage,n/a%
03/04/2021,1600000,45.0%
";
        let table = read_ridership(Cursor::new(csv)).unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].date, None);
        assert_eq!(table.rows[0].cell(Mode::Subway).total, None);
        assert_eq!(table.rows[0].cell(Mode::Subway).change, None);
        assert_eq!(table.rows[1].cell(Mode::Subway).change, Some(45.0));
    }

    #[test]
    fn test_empty_cells_become_none() {
        let csv = "\
Date,Subways: Total Estimated Ridership,Subways: % of Comparable Pre-Pandemic Day
03/05/2021,,
";
        let table = read_ridership(Cursor::new(csv)).unwrap();
        assert_eq!(table.rows[0].cell(Mode::Subway).total, None);
        assert_eq!(table.rows[0].cell(Mode::Subway).change, None);
    }

    #[test]
    fn test_unknown_columns_are_ignored() {
        let csv = "\
Date,Ferries: Total,Subways: % of Comparable Pre-Pandemic Day
03/06/2021,9999,50.0%
";
        let table = read_ridership(Cursor::new(csv)).unwrap();
        assert_eq!(table.rows[0].cell(Mode::Subway).change, Some(50.0));
        // the unknown ferry column must not leak into any mode cell
        for mode in Mode::ALL {
            assert_eq!(table.rows[0].cell(mode).total, None);
        }
    }

    #[test]
    fn test_header_typo_in_total_column_still_maps() {
        // the published file misspells "Ridership" in one header revision
        let csv = "\
Date,Subways: Total Estimated Ridersip,Subways: % of Comparable Pre-Pandemic Day
03/07/2021,1700000,47.0%
";
        let table = read_ridership(Cursor::new(csv)).unwrap();
        assert_eq!(table.rows[0].cell(Mode::Subway).total, Some(1700000.0));
    }
}
