use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trailgeo::commands::{self, audit, enhance, import, normalize, sources, synthesize, validate, validate_gpx};
use trailgeo::config::Config;
use trailgeo::error::AppError;
use trailgeo::store;

#[derive(Parser, Debug)]
#[command(author, version, about = "Trail catalogue GPS tooling", long_about = None)]
struct Cli {
    /// Toolkit tuning file (JSON); falls back to TRAILGEO_CONFIG
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score GPS path quality across the whole catalogue
    Audit {
        #[arg(long, value_hint = ValueHint::DirPath)]
        data_dir: Option<PathBuf>,
        /// Where the JSON report is written
        #[arg(long, value_hint = ValueHint::FilePath)]
        report: Option<PathBuf>,
    },
    /// Densify an existing sparse path with interpolated points
    Enhance {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(long)]
        target_density: Option<f64>,
        /// Lower bound of points inserted per segment
        #[arg(long)]
        min_segment_points: Option<usize>,
        /// Synthetic terrain variation amplitude in feet (0 = off)
        #[arg(long)]
        variation_ft: Option<f64>,
        #[arg(long)]
        variation_cycles: Option<f64>,
        /// Trailhead elevation used when the path has none
        #[arg(long)]
        base_elevation: Option<f64>,
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Build a path from the start and summit markers
    Synthesize {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(long)]
        density: Option<f64>,
        #[arg(long)]
        min_points: Option<usize>,
        #[arg(long)]
        base_elevation: Option<f64>,
    },
    /// Convert a GPX/FIT file into the catalogue geo format
    Import {
        #[arg(value_hint = ValueHint::FilePath)]
        source: PathBuf,
        /// Trail file to update; prints the geo block when omitted
        #[arg(value_hint = ValueHint::FilePath)]
        trail: Option<PathBuf>,
        #[arg(long)]
        max_points: Option<usize>,
        #[arg(long)]
        chart_points: Option<usize>,
    },
    /// Check a GPX file is dense enough to import
    ValidateGpx {
        #[arg(value_hint = ValueHint::FilePath)]
        source: PathBuf,
    },
    /// Attach data_sources from a provenance table
    Sources {
        #[arg(long, value_hint = ValueHint::FilePath)]
        table: PathBuf,
        /// Restrict to these state slugs
        #[arg(long)]
        state: Vec<String>,
        /// Verification date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_hint = ValueHint::DirPath)]
        data_dir: Option<PathBuf>,
    },
    /// Fill in slugs, tags and difficulty the site pages rely on
    Normalize {
        #[arg(long, value_hint = ValueHint::DirPath)]
        data_dir: Option<PathBuf>,
    },
    /// Check catalogue values against plausibility rules
    Validate {
        #[arg(long, value_hint = ValueHint::DirPath)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "trailgeo=debug" } else { "trailgeo=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, AppError> {
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Audit { data_dir, report } => {
            let data_dir = data_dir.unwrap_or(config.data_dir);
            let report_path = report.unwrap_or(config.report_path);
            tracing::info!("Auditing GPS data quality under {}", data_dir.display());

            let files = store::discover(&data_dir)?;
            let report = audit::audit_all(&files);
            audit::print_report(&report);
            report.export(&report_path)?;
            println!("Full report exported to: {}", report_path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Enhance {
            file,
            target_density,
            min_segment_points,
            variation_ft,
            variation_cycles,
            base_elevation,
            dry_run,
        } => {
            let densify = &mut config.toolkit.densify;
            if let Some(target) = target_density {
                densify.target_points_per_mile = target;
            }
            if let Some(floor) = min_segment_points {
                densify.min_points_per_segment = floor;
            }
            if let Some(amplitude) = variation_ft {
                densify.variation.amplitude_ft = amplitude;
            }
            if let Some(cycles) = variation_cycles {
                densify.variation.cycles = cycles;
            }
            let outcome = enhance::enhance_file(&file, &config.toolkit, base_elevation, dry_run)?;
            println!(
                "Enhanced {}: {} -> {} points ({:.1} pts/mi)",
                file.display(),
                outcome.original_points,
                outcome.enhanced_points,
                outcome.points_per_mile
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Synthesize {
            file,
            density,
            min_points,
            base_elevation,
        } => {
            if let Some(density) = density {
                config.toolkit.synthesis.points_per_mile = density;
            }
            if let Some(min_points) = min_points {
                config.toolkit.synthesis.min_points = min_points;
            }
            let outcome = synthesize::synthesize_file(&file, &config.toolkit, base_elevation)?;
            println!(
                "Created path with {} points ({:.1} pts/mi)",
                outcome.points, outcome.points_per_mile
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Import {
            source,
            trail,
            max_points,
            chart_points,
        } => {
            if let Some(max_points) = max_points {
                config.toolkit.import_max_points = max_points;
            }
            if let Some(chart_points) = chart_points {
                config.toolkit.chart_points = chart_points;
            }
            let track = import::read_track(&source)?;
            let imported = import::build_geo(&track, &config.toolkit)?;

            println!("Trail Statistics:");
            println!("   Distance: {} mi", imported.distance_mi);
            println!("   Elevation Gain: {} ft", imported.gain_ft);
            println!("   Min Elevation: {} ft", imported.min_elevation_ft.round());
            println!("   Max Elevation: {} ft", imported.max_elevation_ft.round());

            match trail {
                Some(target) => import::apply_to_trail_file(&target, &imported)?,
                None => {
                    let text = serde_json::to_string_pretty(&imported.geo)
                        .map_err(|err| AppError::Failed(err.to_string()))?;
                    println!("{text}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::ValidateGpx { source } => {
            let track = import::read_track(&source)?;
            let validation = validate_gpx::validate_track(&track);
            validate_gpx::print_validation(&source.display().to_string(), &validation);
            Ok(if validation.is_usable() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Sources {
            table,
            state,
            date,
            data_dir,
        } => {
            let data_dir = data_dir.unwrap_or(config.data_dir);
            let table = sources::SourceTable::load(&table)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let files: Vec<_> = store::discover(&data_dir)?
                .into_iter()
                .filter(|f| state.is_empty() || state.contains(&f.state_slug))
                .collect();

            let results = sources::attach_sources_to_files(&files, &table, &date.format("%Y-%m-%d").to_string());
            report_batch("data_sources added", &commands::summarize(&results))
        }
        Command::Normalize { data_dir } => {
            let data_dir = data_dir.unwrap_or(config.data_dir);
            let files = store::discover(&data_dir)?;
            let results = normalize::normalize_files(&files);
            report_batch("fixed", &commands::summarize(&results))
        }
        Command::Validate { data_dir } => {
            let data_dir = data_dir.unwrap_or(config.data_dir);
            let files = store::discover(&data_dir)?;
            let report = validate::validate_files(
                &files,
                &validate::ValidationRules::default(),
                Local::now().date_naive(),
            );
            validate::print_report(&report);
            Ok(if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn report_batch(action: &str, summary: &commands::BatchSummary) -> Result<ExitCode, AppError> {
    println!(
        "Processed {} trail files: {} {}, {} unchanged, {} failed",
        summary.processed, summary.changed, action, summary.unchanged, summary.failed
    );
    Ok(if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
