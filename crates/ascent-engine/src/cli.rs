//! Command-line arguments.

use std::path::PathBuf;

use ascent_core::config::{OutputFormat, SimulationConfig};
use clap::Parser;

/// Interactive rocket ascent simulator.
#[derive(Debug, Parser)]
#[command(name = "ascent-engine")]
#[command(about = "Interactive rocket ascent simulator", long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "ascent-config.yaml")]
    pub config: PathBuf,

    /// Override the clock's tick interval in milliseconds
    #[arg(long)]
    pub tick_interval_ms: Option<u64>,

    /// Do not start the autonomous clock
    #[arg(long)]
    pub no_clock: bool,

    /// Console output format (text or json)
    #[arg(long, value_parser = parse_format)]
    pub format: Option<OutputFormat>,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut SimulationConfig) {
        if let Some(ms) = self.tick_interval_ms {
            config.clock.tick_interval_ms = ms;
        }
        if self.no_clock {
            config.clock.enabled = false;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
    }
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(value)
        .ok_or_else(|| format!("unknown format `{value}`, expected text or json"))
}
