use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ixecon_core::{
    cagr, cagr_values, history, years_to_target, CancelToken, Metric, RealTime, Scheduler, SimTime,
    TimeAuthority,
};
use std::path::PathBuf;

mod loader;

#[derive(Parser, Debug)]
#[command(name = "ixecon")]
#[command(author, version, about = "IxTime economy administration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace). Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the simulated IxTime for a real instant (default: now)
    Now {
        /// Real time (RFC 3339)
        #[arg(long)]
        real: Option<String>,
    },

    /// Recalculate every country from its baseline
    Recalc {
        /// JSON array of country records
        #[arg(long)]
        countries: PathBuf,
        /// Growth config JSON (built-in defaults if omitted)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Simulated time to recalculate to (RFC 3339, default: current IxTime)
        #[arg(long)]
        at: Option<String>,
        /// Print the full batch report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Project one country's trajectory from its baseline
    Project {
        #[arg(long)]
        countries: PathBuf,
        /// Country id
        #[arg(long)]
        country: String,
        /// Simulated end time (RFC 3339)
        #[arg(long)]
        to: String,
        /// Step size in simulated years
        #[arg(long, default_value_t = 1.0)]
        step: f64,
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compound annual growth rate between two values
    Cagr {
        #[arg(long)]
        from: f64,
        #[arg(long)]
        to: f64,
        #[arg(long)]
        years: f64,
    },

    /// Years until a value reaches a target at a constant rate
    Target {
        #[arg(long)]
        current: f64,
        #[arg(long)]
        target: f64,
        #[arg(long)]
        rate: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();

    // RUST_LOG may come from .env
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = &cli.log_level {
        let level = std::str::FromStr::from_str(level).unwrap_or(log::LevelFilter::Info);
        logger.filter_level(level);
    }
    logger.format_timestamp(None).init();

    #[cfg(feature = "tracy")]
    ixecon_core::profiling::init_tracy(ixecon_core::profiling::TraceLevel::Info);

    match cli.command {
        Commands::Now { real } => run_now(real),
        Commands::Recalc {
            countries,
            config,
            at,
            json,
        } => run_recalc(countries, config, at, json),
        Commands::Project {
            countries,
            country,
            to,
            step,
            config,
        } => run_project(countries, country, to, step, config),
        Commands::Cagr { from, to, years } => {
            let rate = cagr_values(from, to, years)?;
            println!("CAGR: {:.4}%", rate * 100.0);
            Ok(())
        }
        Commands::Target {
            current,
            target,
            rate,
        } => {
            let years = years_to_target(current, target, rate)?;
            println!("Years to target: {:.2}", years);
            Ok(())
        }
    }
}

fn run_now(real: Option<String>) -> Result<()> {
    let clock = TimeAuthority::ixtime();
    let real = match real {
        Some(s) => RealTime::parse_rfc3339(&s)?,
        None => RealTime::now(),
    };
    let sim = clock.simulated(real);
    println!("Real:       {}", real);
    println!("IxTime:     {}", sim);
    println!("Multiplier: {}x", clock.current_multiplier().get());
    log::debug!("round trip: {}", clock.real(sim));
    Ok(())
}

fn sim_time_or_now(at: Option<String>) -> Result<SimTime> {
    match at {
        Some(s) => Ok(SimTime::parse_rfc3339(&s)?),
        None => Ok(TimeAuthority::ixtime().now()),
    }
}

fn run_recalc(
    countries: PathBuf,
    config: Option<PathBuf>,
    at: Option<String>,
    json: bool,
) -> Result<()> {
    let config = loader::load_config(config.as_deref())?;
    let book = loader::load_book(&countries)?;
    let now = sim_time_or_now(at)?;
    log::info!("Recalculating {} countries to {}", book.len(), now);

    let report = Scheduler::run_all(&book, &config, now, &CancelToken::new())
        .context("recalculation batch failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for econ in &report.results {
        println!(
            "{:<16} gdp/capita {:>12.2} [{}]  population {:>14.0} [{}]  total {:>18.0}  tax x{:.3}",
            econ.country,
            econ.state.gdp_per_capita,
            econ.gdp_tier.label,
            econ.state.population,
            econ.population_tier.label,
            econ.total_gdp,
            econ.tax_multiplier
        );
    }
    for skipped in &report.skipped {
        println!("{:<16} SKIPPED: {}", skipped.country, skipped.error);
    }
    Ok(())
}

fn run_project(
    countries: PathBuf,
    country: String,
    to: String,
    step: f64,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = loader::load_config(config.as_deref())?;
    let records = loader::load_countries(&countries)?;
    let Some(record) = records.iter().find(|r| r.id == country) else {
        bail!("country {} not found in {}", country, countries.display());
    };
    let to = SimTime::parse_rfc3339(&to)?;

    let snapshots = history(record, &config, to, step)
        .with_context(|| format!("projecting {}", record.id))?;
    for snap in &snapshots {
        println!(
            "{}  gdp/capita {:>12.2}  population {:>14.0}  unemployment {:>5.2}%  inflation {:>5.2}%",
            snap.time,
            snap.state.gdp_per_capita,
            snap.state.population,
            snap.state.unemployment_rate * 100.0,
            snap.state.inflation_rate * 100.0
        );
    }

    if let (Some(first), Some(last)) = (snapshots.first(), snapshots.last()) {
        if last.time > first.time {
            let rate = cagr(first, last, Metric::GdpPerCapita)?;
            println!("GDP per capita CAGR: {:.4}%", rate * 100.0);
        }
    }
    Ok(())
}
