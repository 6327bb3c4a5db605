//! Console engine for the Ascent rocket simulator.
//!
//! Wires the simulation context, observers, autonomous clock, and stdin
//! command loop together.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Initialize structured logging (tracing) on stderr
//! 3. Load configuration from `ascent-config.yaml`, apply overrides, and
//!    switch the log filter to the configured level unless `RUST_LOG` is set
//! 4. Create the simulation and register the console and tracing observers
//! 5. Start the clock
//! 6. Run the command loop until `exit` or end of input
//! 7. Stop the clock and log the final state

mod cli;
mod console;
mod error;
mod session;

use std::sync::Arc;

use ascent_core::clock::ClockDriver;
use ascent_core::command::{CommandRouter, FAST_FORWARD};
use ascent_core::config::SimulationConfig;
use ascent_core::context::SimulationContext;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use crate::cli::Cli;
use crate::console::{ConsoleObserver, TracingObserver};
use crate::error::EngineError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, logging setup, reading input, or
/// stopping the clock fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Arguments.
    let cli = Cli::parse();

    // 2. Structured logging. Stdout carries observer output.
    let filter = init_logging()?;

    // 3. Configuration. Override warnings land in the log.
    let config = load_config(&cli)?;
    if let Some(filter) = &filter {
        filter
            .reload(EnvFilter::new(&config.logging.level))
            .map_err(|e| EngineError::Logging {
                message: e.to_string(),
            })?;
    }

    info!(
        config_path = %cli.config.display(),
        clock_enabled = config.clock.enabled,
        tick_interval_ms = config.clock.tick_interval_ms,
        output_format = ?config.output.format,
        "ascent-engine starting"
    );

    // 4. Simulation and observers.
    let sim = Arc::new(SimulationContext::new());
    sim.add_observer(Arc::new(ConsoleObserver::stdout(config.output.format)));
    sim.add_observer(Arc::new(TracingObserver));

    let router = CommandRouter::with_flight_commands();
    println!("Commands: {}", banner(&router));

    // 5. Clock.
    let clock = config.clock.enabled.then(|| {
        ClockDriver::spawn(
            Arc::clone(&sim),
            config.clock.tick_interval(),
            config.clock.start_delay(),
        )
    });

    // 6. Command loop.
    let stdin = BufReader::new(tokio::io::stdin());
    let summary = session::run(stdin, &router, &sim, |e| println!("Error: {e}")).await?;

    // 7. Shutdown.
    if let Some(clock) = clock {
        let report = clock.stop().await?;
        info!(ticks_fired = report.ticks_fired, "clock shut down");
    }

    let last = sim.snapshot();
    info!(
        end = ?summary.end,
        accepted = summary.accepted,
        rejected = summary.rejected,
        tick = last.elapsed_ticks,
        phase = %last.phase,
        fuel = last.fuel,
        altitude = last.altitude,
        speed = last.speed,
        "ascent-engine shutdown complete"
    );

    Ok(())
}

/// Filter used until the configuration has been read.
const BOOT_LOG_LEVEL: &str = "info";

/// Install the stderr subscriber.
///
/// A valid `RUST_LOG` pins the filter and `None` is returned. Otherwise the
/// returned handle swaps the boot filter for the configured level.
fn init_logging() -> Result<Option<reload::Handle<EnvFilter, Registry>>, EngineError> {
    let (filter, pinned) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(BOOT_LOG_LEVEL), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| EngineError::Logging {
            message: e.to_string(),
        })?;

    Ok((!pinned).then_some(handle))
}

/// Command list for the startup banner. `fast_forward` is shown with its
/// argument.
fn banner(router: &CommandRouter) -> String {
    router
        .command_names()
        .map(|name| {
            if name == FAST_FORWARD {
                format!("{name} X")
            } else {
                name.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from the path given on the command line.
///
/// A missing file means defaults. Environment and command-line overrides
/// apply either way.
fn load_config(cli: &Cli) -> Result<SimulationConfig, EngineError> {
    let mut config = if cli.config.exists() {
        SimulationConfig::from_file(&cli.config)?
    } else {
        let mut config = SimulationConfig::default();
        config.apply_env_overrides();
        config
    };
    cli.apply(&mut config);
    config.validate()?;
    Ok(config)
}
