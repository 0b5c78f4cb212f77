//! Mapping of station-hour aggregates onto hue/saturation/luminance
//! channels.
//!
//! Hue is categorical on the sign of `balance`: strictly negative buckets
//! get the outflow hue, everything else (zero included) the inflow hue.
//! Saturation scales with |balance| and luminance with activity, each
//! against the table-wide maximum.

use plotters::style::HSLColor;

use crate::stations::types::{Bucket, ChannelValues, StationHourTable};

/// Hue (degrees) for buckets where departures outnumber arrivals.
pub const OUTFLOW_HUE_DEG: f64 = 10.0;
/// Hue (degrees) for buckets at or above neutral balance.
pub const INFLOW_HUE_DEG: f64 = 230.0;

const CHANNEL_MAX: f64 = 100.0;

/// Linear min-max remap of `value` from `[src_min, src_max]` onto
/// `[dst_min, dst_max]`. A zero-width source range maps to `dst_min`, so a
/// degenerate table never divides by zero.
pub fn rescale(value: f64, src_min: f64, src_max: f64, dst_min: f64, dst_max: f64) -> f64 {
    if src_max == src_min {
        return dst_min;
    }
    (value - src_min) / (src_max - src_min) * (dst_max - dst_min) + dst_min
}

/// Outflow hue strictly below zero; zero itself counts as inflow.
pub fn hue_for_balance(balance: i64) -> f64 {
    if balance < 0 {
        OUTFLOW_HUE_DEG
    } else {
        INFLOW_HUE_DEG
    }
}

/// Table-wide maxima the per-bucket rescales are anchored to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelScale {
    max_abs_balance: f64,
    max_activity: f64,
}

impl ChannelScale {
    pub fn from_table(table: &StationHourTable) -> Self {
        let mut scale = ChannelScale::default();
        for (_, _, bucket) in table.iter() {
            scale.max_abs_balance = scale.max_abs_balance.max(bucket.balance.unsigned_abs() as f64);
            scale.max_activity = scale.max_activity.max(bucket.activity);
        }
        scale
    }

    /// Color-channel coordinates for one bucket.
    pub fn channels(&self, bucket: &Bucket) -> ChannelValues {
        ChannelValues {
            hue: hue_for_balance(bucket.balance),
            saturation: rescale(
                bucket.balance.unsigned_abs() as f64,
                0.0,
                self.max_abs_balance,
                0.0,
                CHANNEL_MAX,
            ),
            luminance: rescale(bucket.activity, 0.0, self.max_activity, 0.0, CHANNEL_MAX),
        }
    }
}

/// Composes the three channels into one display color. plotters expects
/// hue, saturation, and lightness all normalized to `[0, 1]`.
pub fn display_color(channels: &ChannelValues) -> HSLColor {
    HSLColor(
        channels.hue / 360.0,
        channels.saturation / CHANNEL_MAX,
        channels.luminance / CHANNEL_MAX,
    )
}
