//! System-wide ridership trend pipeline: load the daily ridership CSV,
//! reshape it to long form, and render a percent-change line chart.

pub mod loader;
pub mod plot;
pub mod reshape;
pub mod types;
