//! Line chart of percent change vs. date, one series per transportation
//! mode.

use std::path::Path;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

use crate::ridership::types::{Mode, TrendRow};

/// Fixed page dimensions of the trend chart.
pub const TREND_CHART_SIZE: (u32, u32) = (1280, 720);

fn series_color(mode: Mode) -> RGBColor {
    match mode {
        Mode::Subway => RGBColor(30, 144, 255),
        Mode::Bus => RGBColor(34, 139, 34),
        Mode::Lirr => RGBColor(200, 0, 100),
        Mode::Mta => RGBColor(255, 140, 0),
        Mode::AccessRide => RGBColor(128, 0, 128),
        Mode::BridgeTunnel => RGBColor(90, 90, 90),
    }
}

/// Renders the trend chart as an SVG at `path`.
///
/// The paratransit series is omitted from the chart but remains in the long
/// table; that exclusion is a rendering choice, not a data property. Missing
/// observations break a mode's line into separate segments rather than being
/// interpolated across.
pub fn render_trend(rows: &[TrendRow], path: &Path) -> Result<()> {
    let observed: Vec<(NaiveDate, f64)> = rows
        .iter()
        .filter_map(|r| r.change.map(|v| (r.date, v)))
        .collect();
    if observed.is_empty() {
        bail!("ridership trend: no plottable observations");
    }

    let first = observed.iter().map(|(d, _)| *d).min().unwrap_or_default();
    let last = observed.iter().map(|(d, _)| *d).max().unwrap_or_default();
    let mut y_min = 0.0f64;
    let mut y_max = 0.0f64;
    for (_, v) in &observed {
        y_min = y_min.min(*v);
        y_max = y_max.max(*v);
    }

    let root = SVGBackend::new(path, TREND_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(25)
        .caption(
            "Ridership change vs. pre-pandemic baseline",
            FontDesc::new(FontFamily::SansSerif, 22.0, FontStyle::Normal),
        )
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(first..last, (y_min - 5.0)..(y_max + 5.0))?;

    chart
        .configure_mesh()
        .x_label_formatter(&|d| d.format("%b %Y").to_string())
        .y_label_formatter(&|v| format!("{v:.0}%"))
        .label_style(FontDesc::new(
            FontFamily::SansSerif,
            16.0,
            FontStyle::Normal,
        ))
        .draw()?;

    for mode in Mode::ALL {
        if mode == Mode::AccessRide {
            continue;
        }
        let color = series_color(mode);

        let mut labeled = false;
        for segment in segments(rows, mode) {
            let anno = chart.draw_series(LineSeries::new(segment.into_iter(), color))?;
            if !labeled {
                anno.label(mode.label()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 30, y)], color)
                });
                labeled = true;
            }
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Splits one mode's trend rows into contiguous runs of observed values,
/// breaking at every missing observation.
fn segments(rows: &[TrendRow], mode: Mode) -> Vec<Vec<(NaiveDate, f64)>> {
    let mut segs = Vec::new();
    let mut current = Vec::new();

    for row in rows.iter().filter(|r| r.transportation_type == mode) {
        match row.change {
            Some(v) => current.push((row.date, v)),
            None => {
                if !current.is_empty() {
                    segs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segs.push(current);
    }

    segs
}
