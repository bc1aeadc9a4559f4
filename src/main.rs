use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use surveymap::config::FileConfig;
use surveymap::geometry::LatLon;
use surveymap::map::{DatasetReport, MapView, populate};
use surveymap::output::{PageOptions, write_page};
use surveymap::Fetcher;

/// Render an interactive web map of survey and clearance area datasets
///
/// Examples:
///   # Render the built-in Desktop Studies and Field Work datasets from ./data
///   surveymap --data-dir data -o nt_projects.html
///
///   # Start zoomed in on Darwin
///   surveymap --lat -12.46 --lon 130.84 -z 10
///
///   # Use a config file describing other datasets
///   surveymap --config heritage.toml --fit-bounds
#[derive(Parser, Debug)]
#[command(name = "surveymap")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches surveymap.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output HTML file path
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Directory relative dataset paths are resolved against
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Initial map center latitude (use with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Initial map center longitude (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Initial zoom level
    #[arg(short = 'z', long)]
    zoom: Option<f64>,

    /// Zoom the page to the loaded data instead of the configured view
    #[arg(long)]
    fit_bounds: bool,

    /// Leave the legend off the map
    #[arg(long)]
    no_legend: bool,

    /// HTTP timeout for remote datasets, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Page title
    #[arg(long, default_value = "Survey Map")]
    title: String,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();
    init_logging(args.verbose);

    let mut file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load().unwrap_or_default()
    };

    let verbose = args.verbose || file_config.verbose;

    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        file_config.view.center = LatLon::new(lat, lon);
    }
    if let Some(zoom) = args.zoom {
        file_config.view.zoom = zoom;
    }
    if let Some(timeout) = args.timeout {
        file_config.fetch.timeout_secs = timeout;
    }
    if args.no_legend {
        file_config.show_legend = false;
    }
    let fit_bounds = args.fit_bounds || file_config.fit_bounds;
    let output_path = args
        .output
        .clone()
        .or_else(|| file_config.output.clone())
        .unwrap_or_else(|| PathBuf::from("map.html"));
    let data_dir = args
        .data_dir
        .clone()
        .or_else(|| file_config.data_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let datasets = file_config.datasets();
    if datasets.is_empty() {
        bail!("No datasets configured");
    }

    println!("surveymap - Survey Area Map Generator");
    println!("=====================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!(
            "  Center: ({:.4}, {:.4})",
            file_config.view.center.lat, file_config.view.center.lon
        );
        println!("  Zoom: {}", file_config.view.zoom);
        println!("  Data directory: {}", data_dir.display());
        for dataset in &datasets {
            println!("  Dataset: {} <- {}", dataset.name, dataset.source);
        }
        println!("  Output: {}", output_path.display());
        println!();
    }

    let fetcher =
        Fetcher::new(&file_config.fetch, &data_dir).context("Failed to set up dataset loader")?;

    let mut map = MapView::new(&file_config.view, file_config.tile_layers());

    let mut reports = Vec::with_capacity(datasets.len());
    for dataset in &datasets {
        let spinner = create_spinner(&format!("Loading {}...", dataset.name));
        let start = Instant::now();
        let report = populate(&mut map, dataset, &fetcher);
        if report.is_loaded() {
            spinner.finish_with_message(format!(
                "{}: {} polygons, {} markers [{:.1}s]",
                report.name,
                report.polygons,
                report.markers,
                start.elapsed().as_secs_f32()
            ));
        } else {
            spinner.finish_with_message(format!("{}: not loaded", report.name));
        }
        reports.push(report);
    }

    map.set_legend(file_config.legend());
    map.refresh_markers();

    let spinner = create_spinner("Writing map page...");
    let options = PageOptions {
        title: args.title.clone(),
        fit_bounds,
    };
    write_page(&output_path, &map, &options).context("Failed to write map page")?;
    spinner.finish_with_message(format!(
        "Wrote {} polygons and {} markers",
        map.polygons().len(),
        map.markers().len()
    ));

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Output: {}", output_path.display());
    print_failures(&reports);

    Ok(())
}

fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_target(false)
        .compact()
        .init();
}

/// `RUST_LOG` wins when set and valid; otherwise `--verbose` picks the level.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let default_level = if verbose { "surveymap=debug" } else { "surveymap=warn" };
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}

fn print_failures(reports: &[DatasetReport]) {
    let failed: Vec<&DatasetReport> = reports.iter().filter(|r| !r.is_loaded()).collect();
    if failed.is_empty() {
        return;
    }

    println!();
    println!("Datasets missing from the map:");
    for report in failed {
        if let Some(ref error) = report.error {
            println!("  {}: {}", report.name, error);
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
