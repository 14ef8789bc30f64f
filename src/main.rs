use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use smart_routage::config::PlannerConfig;
use smart_routage::error::PlanError;
use smart_routage::io::{read_cities_file, read_orders_file, write_routes_file};
use smart_routage::planner::{Planner, Progress};

/// Plans same-day delivery routes per warehouse and date.
#[derive(Debug, Parser)]
#[command(name = "smart-routage", version)]
struct Args {
    /// Orders CSV.
    #[arg(long)]
    orders: PathBuf,

    /// City reference CSV (`city,lat,lng`).
    #[arg(long)]
    cities: PathBuf,

    /// Route output CSV.
    #[arg(long, default_value = "routes.csv")]
    output: PathBuf,

    /// Warehouse to plan; repeat for several. Plans all when absent.
    #[arg(long = "warehouse")]
    warehouses: Vec<String>,

    /// Batch width in days.
    #[arg(long)]
    delay: Option<usize>,

    /// Vehicle capacity in volume units.
    #[arg(long)]
    capacity: Option<f64>,

    /// Solver time budget per instance.
    #[arg(long)]
    time_budget_ms: Option<u64>,

    /// JSON configuration file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(kind = ?err.kind(), "{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), PlanError> {
    let mut config = match &args.config {
        Some(path) => PlannerConfig::from_json_file(path)?,
        None => PlannerConfig::default(),
    };
    if let Some(delay) = args.delay {
        config.delay = delay;
    }
    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    if let Some(ms) = args.time_budget_ms {
        config.solver.time_budget_ms = ms;
    }

    let cities = Arc::new(read_cities_file(&args.cities)?);
    let orders = read_orders_file(&args.orders)?;
    let delay = config.delay;
    let planner = Planner::new(config, cities)?;

    let selection = (!args.warehouses.is_empty()).then_some(args.warehouses.as_slice());
    let progress = |p: &Progress| {
        tracing::info!(
            completed = p.completed,
            total = p.total,
            date = %p.date,
            warehouse = %p.warehouse,
            "instance done"
        );
    };
    let outcome = planner.plan(&orders, selection, delay, &progress)?;

    println!("{} routes", outcome.routes.len());
    for (i, route) in outcome.routes.iter().enumerate() {
        println!("[{} {}] {}", route.date, route.warehouse, route.summary(i + 1));
    }
    for failure in &outcome.failures {
        println!(
            "no solution for {} on {}: {}",
            failure.warehouse, failure.date, failure.reason
        );
    }
    if !outcome.unrouted.is_empty() {
        println!(
            "{} order(s) not routed (destination is the warehouse): {}",
            outcome.unrouted.len(),
            outcome.unrouted.join(", ")
        );
    }

    write_routes_file(&args.output, &outcome.routes)?;
    Ok(())
}
