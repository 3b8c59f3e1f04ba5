//! `fra-analyze` - run land analyses from the command line

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use fra_core::{AnalysisCoordinator, CoordinatorConfig};
use fra_engine::LatencyProfile;
use fra_model::{AnalysisQuery, AnalysisResult, Coordinates, LandAssetType};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn location_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("lat")
                .long("lat")
                .required(true)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64))
                .help("Latitude of the area centre"),
        )
        .arg(
            Arg::new("lng")
                .long("lng")
                .required(true)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64))
                .help("Longitude of the area centre"),
        )
        .arg(
            Arg::new("radius")
                .long("radius")
                .value_parser(value_parser!(f64))
                .help("Search radius in km (defaults to the configured radius)"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Random seed for reproducibility"),
        )
        .arg(
            Arg::new("latency-ms")
                .long("latency-ms")
                .value_parser(value_parser!(u64))
                .help("Fixed simulated processing latency"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a coordinator TOML config"),
        )
}

fn cli() -> Command {
    Command::new("fra-analyze")
        .version(fra_core::VERSION)
        .about("FRA Atlas land analysis coordinator")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            location_args(Command::new("analyze").about("Analyze the area around a point")).arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Print the full result as JSON"),
            ),
        )
        .subcommand(
            location_args(
                Command::new("burst").about("Issue concurrent identical analyses and report deduplication"),
            )
            .arg(
                Arg::new("callers")
                    .long("callers")
                    .default_value("16")
                    .value_parser(value_parser!(usize))
                    .help("Number of concurrent callers"),
            ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(args: &ArgMatches) -> Result<CoordinatorConfig> {
    let mut config = match args.get_one::<String>("config") {
        Some(path) => CoordinatorConfig::from_file(path)
            .with_context(|| format!("loading config from {path}"))?,
        None => CoordinatorConfig::default(),
    };
    if let Some(seed) = args.get_one::<u64>("seed") {
        config = config.with_seed(*seed);
    }
    if let Some(ms) = args.get_one::<u64>("latency-ms") {
        config = config.with_latency(LatencyProfile::fixed(*ms));
    }
    config.validate().context("invalid coordinator config")?;
    Ok(config)
}

fn location(args: &ArgMatches) -> Result<(Coordinates, Option<f64>)> {
    let lat = args.get_one::<f64>("lat").context("--lat is required")?;
    let lng = args.get_one::<f64>("lng").context("--lng is required")?;
    Ok((Coordinates::new(*lat, *lng), args.get_one::<f64>("radius").copied()))
}

fn print_summary(result: &AnalysisResult) {
    println!("Land assets: {}", result.land_assets.len());
    for asset_type in LandAssetType::ALL {
        let count = result.assets_of(asset_type).count();
        if count > 0 {
            println!("  {asset_type}: {count}");
        }
    }
    println!("Total area: {:.2} ha", result.total_area_ha());
    println!(
        "Forest: {:?}, canopy {:.1}%",
        result.forest_data.forest_type, result.forest_data.canopy_cover
    );
    println!(
        "Groundwater: {:.1} m, {:?}",
        result.groundwater_data.water_table_depth, result.groundwater_data.water_quality
    );
    println!("Overall risk: {:?}", result.risk_assessment.overall());
    println!("Recommendations:");
    for line in &result.recommendations {
        println!("  - {line}");
    }
}

async fn run_analyze(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    let (coordinates, radius) = location(args)?;
    let coordinator = AnalysisCoordinator::new(config);

    let result = coordinator.analyze_at(coordinates, radius).await?;
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(result.as_ref())?);
    } else {
        print_summary(&result);
    }
    Ok(())
}

async fn run_burst(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    let (coordinates, radius) = location(args)?;
    let callers = args.get_one::<usize>("callers").copied().unwrap_or(16);

    let radius = radius.unwrap_or(config.default_radius_km);
    let query = AnalysisQuery::new(coordinates).with_radius(radius);
    let coordinator = AnalysisCoordinator::new(config);

    let started = Instant::now();
    let outcomes = futures::future::join_all((0..callers).map(|_| coordinator.analyze(query))).await;
    let elapsed = started.elapsed();

    let mut results = Vec::with_capacity(callers);
    for outcome in outcomes {
        results.push(outcome?);
    }
    let shared = results
        .windows(2)
        .all(|pair| Arc::ptr_eq(&pair[0], &pair[1]));

    println!("Callers: {callers}");
    println!("Pipeline executions: {}", coordinator.executions());
    println!("Shared result: {shared}");
    println!("Completed in {:.2}s", elapsed.as_secs_f64());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("analyze", args)) => run_analyze(args).await,
        Some(("burst", args)) => run_burst(args).await,
        _ => {
            cli().print_help()?;
            Ok(())
        }
    }
}
