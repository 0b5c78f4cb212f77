//! Wide-to-long reshape of the cleaned ridership table.

use crate::ridership::types::{Mode, RidershipTable, TrendRow};

/// Pivots the wide table into one `(date, mode, change)` row per mode per
/// day, re-basing `change` so that 0 is the pre-pandemic baseline.
///
/// Date insertion order is preserved. Rows whose date failed to parse stay
/// in the wide table but produce no trend rows, since they cannot be keyed.
/// Missing percentages are carried as `None`.
pub fn to_long(table: &RidershipTable) -> Vec<TrendRow> {
    let mut out = Vec::with_capacity(table.rows.len() * Mode::ALL.len());

    for row in &table.rows {
        let Some(date) = row.date else { continue };

        for mode in Mode::ALL {
            out.push(TrendRow {
                date,
                transportation_type: mode,
                change: row.cell(mode).change.map(|pct| pct - 100.0),
            });
        }
    }

    out
}
