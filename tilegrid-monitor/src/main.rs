//! Remote Video Grid - Monitor
//!
//! Drives the grid with a simulated media SDK and shows the slot table live.
//!
//! Usage:
//!   cargo run --release
//!   cargo run --release -- --no-dashboard            # Plain logging mode
//!   cargo run --release -- --seed 7 --attendees 24 --interval-ms 200
//!   cargo run --release -- --no-dashboard --events 500   # Print final grid as JSON

mod dashboard;
mod metrics;
mod simulator;

use parking_lot::RwLock;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use simulator::SimConfig;

/// Command-line options
#[derive(Debug, PartialEq)]
struct Options {
    use_dashboard: bool,
    sim: SimConfig,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        use_dashboard: true,
        sim: SimConfig::default(),
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--no-dashboard" => options.use_dashboard = false,
            "--seed" => options.sim.seed = parse_value(arg, iter.next())?,
            "--attendees" => {
                options.sim.attendees = parse_value(arg, iter.next())?;
                if options.sim.attendees == 0 {
                    return Err("--attendees must be at least 1".to_string());
                }
            }
            "--interval-ms" => {
                options.sim.interval = Duration::from_millis(parse_value(arg, iter.next())?);
            }
            "--events" => {
                let events: u64 = parse_value(arg, iter.next())?;
                options.sim.max_events = (events > 0).then_some(events);
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(options)
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args)?;

    // Shared metrics state
    let metrics = Arc::new(RwLock::new(metrics::Metrics::new(options.sim.seed)));

    if options.use_dashboard {
        // Run with TUI dashboard
        dashboard::run(metrics, options.sim).await
    } else {
        // Run with plain logging
        simulator::run_with_logging(metrics, options.sim).await
    }
}
