use clap::{Arg, ArgMatches, Command};
use std::fs::File;
use std::io::BufWriter;
use std::process;
use tracing_subscriber::EnvFilter;
use warehouse_network::utils::lanes::write_lanes_csv;
use warehouse_network::utils::loader::{load_candidates, load_demand};
use warehouse_network::{NetworkOptimizer, OptimizationResult, Result, Scenario, ScenarioSettings};

fn get_app() -> Command {
    Command::new("Warehouse Network Optimizer")
        .version("0.1")
        .about("Chooses warehouse count and locations minimizing annual network cost")
        .arg(
            Arg::new("demand")
                .help("Demand CSV with Longitude,Latitude,DemandLbs columns")
                .short('d')
                .long("demand")
                .required(true),
        )
        .arg(
            Arg::new("candidates")
                .help("Candidate site CSV: lon,lat[,cost per sq ft] without header")
                .short('c')
                .long("candidates"),
        )
        .arg(
            Arg::new("config")
                .help("Scenario settings TOML; defaults are used when omitted")
                .long("config"),
        )
        .arg(
            Arg::new("output")
                .help("Write the full result as JSON to this file")
                .short('o')
                .long("output"),
        )
        .arg(
            Arg::new("lanes")
                .help("Write lane-level calculations as CSV to this file")
                .long("lanes"),
        )
}

fn run(matches: &ArgMatches) -> Result<()> {
    let settings = match matches.get_one::<String>("config") {
        Some(path) => ScenarioSettings::load(path)?,
        None => ScenarioSettings::default(),
    };

    let demand = match matches.get_one::<String>("demand") {
        Some(path) => load_demand(path)?,
        None => Vec::new(),
    };
    let candidates = match matches.get_one::<String>("candidates") {
        Some(path) => load_candidates(path)?,
        None => Vec::new(),
    };

    let scenario = Scenario::from_settings(settings, demand, candidates);
    let optimizer = NetworkOptimizer::new(scenario)?;

    let start_time = std::time::Instant::now();
    let result = optimizer.solve()?;
    let elapsed = start_time.elapsed();

    print_summary(&result, elapsed);

    if let Some(path) = matches.get_one::<String>("output") {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &result)?;
        println!("Result written to {}", path);
    }

    if let Some(path) = matches.get_one::<String>("lanes") {
        let lanes = result.lanes(&optimizer.scenario().costs);
        write_lanes_csv(&lanes, BufWriter::new(File::create(path)?))?;
        println!("{} lanes written to {}", lanes.len(), path);
    }

    Ok(())
}

fn print_summary(result: &OptimizationResult, elapsed: std::time::Duration) {
    let best = &result.best;

    println!("Network optimization results (found in {:.2?}):", elapsed);
    println!("------------------------------------------");
    println!("Warehouses: {}", best.k);
    for facility in &best.facilities {
        println!(
            "  #{} ({:.4}, {:.4}) demand {:.0} lbs{}",
            facility.id,
            facility.location.lon,
            facility.location.lat,
            facility.demand,
            if facility.is_fixed { " [fixed]" } else { "" }
        );
    }

    let costs = result.costs();
    println!("Total cost:     ${:.0}", costs.total);
    println!("  Outbound:     ${:.0}", costs.outbound);
    println!("  Inbound:      ${:.0}", costs.inbound);
    println!("  Transfer:     ${:.0}", costs.transfer);
    println!("  Facility:     ${:.0}", costs.facility);

    if result.cost_curve.len() > 1 {
        println!("Cost by warehouse count:");
        for evaluation in &result.cost_curve {
            println!("  k={}: ${:.0}", evaluation.k, evaluation.costs.total);
        }
    }

    for adjustment in &result.adjustments {
        println!(
            "Note: requested {} warehouses, evaluated {} ({:?})",
            adjustment.requested, adjustment.effective, adjustment.reason
        );
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warehouse_network=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let matches = get_app().get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
