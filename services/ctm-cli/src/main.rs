//! Community Thermal Model query tool.
//!
//! Loads one thermal model, normalizes it through the model registry and
//! answers point, profile, cross-section and slice queries, writing CSV or
//! JSON with a metadata header. Batch mode runs a YAML list of queries
//! against a single loaded model.

mod config;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ctm_query::{write_gradients_csv, write_outcome, OutputFormat, QueryConfig, QueryOutcome, QuerySession, QuerySpec};
use netcdf_parser::load_raw_grid;
use thermal_grid::{normalize, ModelRegistry};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ctm-query")]
#[command(about = "Query temperatures from Community Thermal Models", version)]
struct Args {
    /// Model name from the registry, e.g. Lee_2025
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Model file (overrides the registry's default file)
    #[arg(long, global = true)]
    model_path: Option<PathBuf>,

    /// Model registry YAML (default: built-in registry)
    #[arg(long, global = true, env = "CTM_REGISTRY")]
    registry: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "csv")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Also write per-location geothermal gradients to this CSV file
    #[arg(long, global = true)]
    gradients: Option<PathBuf>,

    /// Log level (ignored when RUST_LOG is set)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Temperature at a single point
    Point {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Depth in metres
        #[arg(long, allow_negative_numbers = true)]
        depth: f64,
    },
    /// Temperatures down a vertical line
    Profile {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        depth_start: f64,
        #[arg(long, allow_negative_numbers = true)]
        depth_end: f64,
        #[arg(long, allow_negative_numbers = true)]
        depth_step: f64,
    },
    /// Temperatures on a vertical section along a geodesic
    CrossSection {
        #[arg(long, allow_negative_numbers = true)]
        lat_start: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon_start: f64,
        #[arg(long, allow_negative_numbers = true)]
        lat_end: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon_end: f64,
        #[arg(long, allow_negative_numbers = true)]
        depth_start: f64,
        #[arg(long, allow_negative_numbers = true)]
        depth_end: f64,
    },
    /// Temperatures on a lon/lat box at one depth
    Slice {
        #[arg(long, allow_negative_numbers = true)]
        lat_start: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon_start: f64,
        #[arg(long, allow_negative_numbers = true)]
        lat_end: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon_end: f64,
        #[arg(long, allow_negative_numbers = true)]
        depth: f64,
    },
    /// Run a YAML list of queries against one model
    Batch {
        /// YAML file with a list of queries
        #[arg(long)]
        file: PathBuf,
        /// Directory for the result files
        #[arg(long)]
        output_dir: PathBuf,
    },
    /// List the models in the registry
    Models,
}

impl Command {
    fn query(&self) -> Option<QuerySpec> {
        let spec = match *self {
            Command::Point { lat, lon, depth } => QuerySpec::Point { lon, lat, depth },
            Command::Profile {
                lat,
                lon,
                depth_start,
                depth_end,
                depth_step,
            } => QuerySpec::VerticalProfile {
                lon,
                lat,
                depth_start,
                depth_end,
                depth_step,
            },
            Command::CrossSection {
                lat_start,
                lon_start,
                lat_end,
                lon_end,
                depth_start,
                depth_end,
            } => QuerySpec::VerticalCrossSection {
                lon_start,
                lat_start,
                lon_end,
                lat_end,
                depth_start,
                depth_end,
            },
            Command::Slice {
                lat_start,
                lon_start,
                lat_end,
                lon_end,
                depth,
            } => QuerySpec::HorizontalSlice {
                lon_start,
                lat_start,
                lon_end,
                lat_end,
                depth,
            },
            Command::Batch { .. } | Command::Models => return None,
        };
        Some(spec)
    }
}

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);

    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let registry = config::load_registry(args.registry.as_deref())?;

    if let Command::Models = args.command {
        return list_models(&registry);
    }

    let session = open_session(&registry, &args)?;

    match &args.command {
        Command::Batch { file, output_dir } => run_batch(&session, file, output_dir, args.format),
        command => {
            let Some(spec) = command.query() else {
                bail!("Unsupported command");
            };
            let outcome = session.run(&spec)?;
            write_result(args.output.as_deref(), args.format, &outcome)?;
            if let Some(path) = &args.gradients {
                write_gradients(path, &outcome)?;
            }
            Ok(())
        }
    }
}

fn list_models(registry: &ModelRegistry) -> Result<()> {
    let mut out = io::stdout().lock();
    for model in registry.iter() {
        let file = model
            .file
            .as_deref()
            .map(|f| f.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:<16} {:<12} {:<24} {}",
            model.name, model.abbreviation, file, model.description
        )?;
    }
    Ok(())
}

/// Load, normalize and wrap the selected model.
fn open_session(registry: &ModelRegistry, args: &Args) -> Result<QuerySession> {
    let Some(model) = args.model.as_deref() else {
        bail!("--model is required (see `ctm-query models`)");
    };
    let descriptor = registry.get(model)?.clone();
    let path = config::resolve_model_path(
        &descriptor,
        args.model_path.as_deref(),
        config::model_dir_from_env().as_deref(),
    )?;

    let variables = descriptor.native_variables();
    let raw = load_raw_grid(&path, Some(&variables[..]))
        .with_context(|| format!("Failed to read model file {}", path.display()))?;
    let grid = normalize(&descriptor, &raw)
        .with_context(|| format!("{} does not look like a {} model", path.display(), descriptor.name))?;

    let [nlon, nlat, ndep] = grid.shape();
    info!(model = %descriptor.name, nlon, nlat, ndep, "Model ready");

    let query_config = QueryConfig::from_env()?;
    Ok(QuerySession::new(Arc::new(grid), descriptor, query_config)?)
}

fn write_result(path: Option<&Path>, format: OutputFormat, outcome: &QueryOutcome) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            write_outcome(BufWriter::new(file), format, outcome)?;
            info!(path = %path.display(), rows = outcome.table.len(), "Wrote results");
        }
        None => write_outcome(io::stdout().lock(), format, outcome)?,
    }
    Ok(())
}

fn write_gradients(path: &Path, outcome: &QueryOutcome) -> Result<()> {
    if outcome.gradients.is_empty() {
        warn!(kind = %outcome.spec.kind(), "Query has no gradients; not writing {}", path.display());
        return Ok(());
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_gradients_csv(BufWriter::new(file), &outcome.gradients)?;
    Ok(())
}

/// Run every query in `file`, one output file per query.
///
/// A failing query is logged and skipped; the command fails afterwards if
/// any query did.
fn run_batch(session: &QuerySession, file: &Path, output_dir: &Path, format: OutputFormat) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let queries = QuerySpec::list_from_yaml(&text)?;
    fs::create_dir_all(output_dir).with_context(|| format!("Failed to create {}", output_dir.display()))?;

    info!(queries = queries.len(), "Running batch");

    let model = &session.descriptor().name;
    let mut failed = 0usize;
    for (index, spec) in queries.iter().enumerate() {
        let name = format!("{}_{}_{}.{}", index, spec.kind().name(), model, format.extension());
        let path = output_dir.join(name);
        let result = session
            .run(spec)
            .map_err(anyhow::Error::from)
            .and_then(|outcome| write_result(Some(&path), format, &outcome));
        if let Err(e) = result {
            error!(index, kind = %spec.kind(), error = %e, "Query failed");
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} queries failed", failed, queries.len());
    }
    Ok(())
}
