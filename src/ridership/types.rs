//! Data types for the ridership trend pipeline.

use chrono::NaiveDate;
use serde::Serialize;

/// Transportation modes reported in the daily ridership file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Subway,
    Bus,
    Lirr,
    Mta,
    AccessRide,
    BridgeTunnel,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Subway,
        Mode::Bus,
        Mode::Lirr,
        Mode::Mta,
        Mode::AccessRide,
        Mode::BridgeTunnel,
    ];

    /// Short label used in the long-form table and the chart legend.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Subway => "subway",
            Mode::Bus => "bus",
            Mode::Lirr => "lirr",
            Mode::Mta => "mta",
            Mode::AccessRide => "access_ride",
            Mode::BridgeTunnel => "bridge_tunnel",
        }
    }
}

/// Total ridership and percent-of-baseline cells for one mode on one day.
/// Either side is `None` when the source cell was absent or unparsable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ModeCell {
    pub total: Option<f64>,
    pub change: Option<f64>,
}

/// One cleaned row of the wide ridership table, cells indexed by
/// [`Mode::ALL`] order.
#[derive(Debug, Clone, Default)]
pub struct RidershipRow {
    pub date: Option<NaiveDate>,
    pub cells: [ModeCell; 6],
}

impl RidershipRow {
    pub fn cell(&self, mode: Mode) -> &ModeCell {
        &self.cells[mode as usize]
    }

    pub fn cell_mut(&mut self, mode: Mode) -> &mut ModeCell {
        &mut self.cells[mode as usize]
    }
}

/// The cleaned wide table produced by the loader.
#[derive(Debug, Default)]
pub struct RidershipTable {
    pub rows: Vec<RidershipRow>,
}

/// One row of the long-form trend table.
///
/// `change` is the source percentage minus 100, so 0 means "at pre-pandemic
/// baseline" and negative values are percent decline. A `None` marks a day
/// the mode reported no observation; it is carried, never imputed.
#[derive(Debug, Clone, Serialize)]
pub struct TrendRow {
    pub date: NaiveDate,
    pub transportation_type: Mode,
    pub change: Option<f64>,
}
