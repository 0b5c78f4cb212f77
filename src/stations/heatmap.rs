//! Station × hour heatmap rendering.

use std::path::Path;

use anyhow::{Result, bail};
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

use crate::stations::color::{ChannelScale, display_color};
use crate::stations::types::StationHourTable;

/// Fixed page dimensions of the heatmap.
pub const HEATMAP_SIZE: (u32, u32) = (1000, 1400);

const MAX_STATION_LABELS: usize = 60;

/// Renders the station × hour heatmap as an SVG at `path`: hour of day on
/// the x axis, one row per station, each cell filled with the color
/// composed from the bucket's channels.
pub fn render_heatmap(table: &StationHourTable, path: &Path) -> Result<()> {
    if table.stations.is_empty() {
        bail!("station heatmap: no stations to draw");
    }

    let stations: Vec<&str> = table.stations.keys().map(|s| s.as_str()).collect();
    let scale = ChannelScale::from_table(table);

    let root = SVGBackend::new(path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(25)
        .caption(
            "Station activity and balance by hour",
            FontDesc::new(FontFamily::SansSerif, 22.0, FontStyle::Normal),
        )
        .set_label_area_size(LabelAreaPosition::Left, 180)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0usize..24usize, 0usize..stations.len())?;

    let station_label = |idx: &usize| {
        stations
            .get(*idx)
            .map(|s| (*s).to_string())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(24)
        .y_labels(stations.len().min(MAX_STATION_LABELS))
        .x_label_formatter(&|hour| format!("{hour:02}"))
        .y_label_formatter(&station_label)
        .label_style(FontDesc::new(
            FontFamily::SansSerif,
            12.0,
            FontStyle::Normal,
        ))
        .draw()?;

    chart.draw_series(table.stations.values().enumerate().flat_map(|(row, hours)| {
        hours.iter().enumerate().map(move |(hour, bucket)| {
            let color = display_color(&scale.channels(bucket));
            Rectangle::new([(hour, row), (hour + 1, row + 1)], color.filled())
        })
    }))?;

    root.present()?;
    Ok(())
}
