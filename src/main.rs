//! CLI entry point for the transit ridership report.
//!
//! Provides subcommands for rendering the system-wide ridership trend chart,
//! the station activity/balance heatmap, or the full report.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ridership_report::archive::ensure_trip_csv;
use ridership_report::output::{append_trend_rows, write_station_json};
use ridership_report::ridership::loader::load_ridership;
use ridership_report::ridership::plot::render_trend;
use ridership_report::ridership::reshape::to_long;
use ridership_report::stations::aggregate::{aggregate_events, trip_events};
use ridership_report::stations::filter::filter_trips;
use ridership_report::stations::heatmap::render_heatmap;
use ridership_report::stations::load_trips;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_RIDERSHIP_CSV: &str = "data/mta_daily_ridership.csv";
const DEFAULT_TRIP_CSV: &str = "data/citibike_trips.csv";
const DEFAULT_TRIP_ARCHIVE_URL: &str =
    "https://s3.amazonaws.com/tripdata/202109-citibike-tripdata.csv.zip";
const DEFAULT_TREND_SVG: &str = "ridership_trend.svg";
const DEFAULT_HEATMAP_SVG: &str = "station_heatmap.svg";

#[derive(Parser)]
#[command(name = "ridership-report")]
#[command(about = "Exploratory report over MTA ridership and Citi Bike trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the system-wide ridership trend line chart
    Ridership {
        /// Path to the daily ridership CSV
        #[arg(short, long, default_value = DEFAULT_RIDERSHIP_CSV)]
        input: String,

        /// SVG file to render the trend chart to
        #[arg(short, long, default_value = DEFAULT_TREND_SVG)]
        output: String,

        /// Optional CSV file to append the reshaped trend rows to
        #[arg(long)]
        csv: Option<String>,
    },
    /// Render the station activity/balance heatmap
    Stations {
        /// Path to the trip CSV, extracted from the archive on first run
        #[arg(short, long, default_value = DEFAULT_TRIP_CSV)]
        input: String,

        /// URL of the zipped trip archive fetched on a cache miss
        #[arg(long, default_value = DEFAULT_TRIP_ARCHIVE_URL)]
        archive_url: String,

        /// SVG file to render the heatmap to
        #[arg(short, long, default_value = DEFAULT_HEATMAP_SVG)]
        output: String,

        /// Optional JSON file to dump the aggregated station-hour table to
        #[arg(long)]
        json: Option<String>,
    },
    /// Run both pipelines in sequence
    Report {
        /// Path to the daily ridership CSV
        #[arg(long, default_value = DEFAULT_RIDERSHIP_CSV)]
        ridership_input: String,

        /// Path to the trip CSV, extracted from the archive on first run
        #[arg(long, default_value = DEFAULT_TRIP_CSV)]
        trips_input: String,

        /// URL of the zipped trip archive fetched on a cache miss
        #[arg(long, default_value = DEFAULT_TRIP_ARCHIVE_URL)]
        archive_url: String,

        /// SVG file to render the trend chart to
        #[arg(long, default_value = DEFAULT_TREND_SVG)]
        trend_output: String,

        /// SVG file to render the heatmap to
        #[arg(long, default_value = DEFAULT_HEATMAP_SVG)]
        heatmap_output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/ridership_report.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ridership_report.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ridership { input, output, csv } => {
            run_ridership(&input, &output, csv.as_deref())?;
        }
        Commands::Stations {
            input,
            archive_url,
            output,
            json,
        } => {
            run_stations(&input, &archive_url, &output, json.as_deref()).await?;
        }
        Commands::Report {
            ridership_input,
            trips_input,
            archive_url,
            trend_output,
            heatmap_output,
        } => {
            run_ridership(&ridership_input, &trend_output, None)?;
            run_stations(&trips_input, &archive_url, &heatmap_output, None).await?;
        }
    }

    Ok(())
}

/// Runs the ridership trend pipeline: load, reshape, render.
#[tracing::instrument(skip(csv), fields(input, output))]
fn run_ridership(input: &str, output: &str, csv: Option<&str>) -> Result<()> {
    let table = load_ridership(input)?;

    let trend = to_long(&table);
    info!(rows = trend.len(), "Trend table reshaped");

    if let Some(csv_path) = csv {
        append_trend_rows(csv_path, &trend)?;
    }

    render_trend(&trend, Path::new(output))?;
    info!(output, "Trend chart rendered");
    Ok(())
}

/// Runs the station activity/balance pipeline: fetch/cache, filter,
/// aggregate, render.
#[tracing::instrument(skip(json), fields(input, output))]
async fn run_stations(
    input: &str,
    archive_url: &str,
    output: &str,
    json: Option<&str>,
) -> Result<()> {
    ensure_trip_csv(Path::new(input), archive_url).await?;

    let trips = load_trips(input)?;
    let kept = filter_trips(trips);
    let events = trip_events(&kept);
    let table = aggregate_events(&events);
    info!(
        stations = table.stations.len(),
        events = events.len(),
        "Station-hour table aggregated"
    );

    if let Some(json_path) = json {
        write_station_json(&table, Path::new(json_path))?;
    }

    render_heatmap(&table, Path::new(output))?;
    info!(output, "Station heatmap rendered");
    Ok(())
}
