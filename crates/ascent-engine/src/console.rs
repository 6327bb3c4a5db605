//! Observers that render notifications for a human or a log pipeline.
//!
//! [`ConsoleObserver`] writes each notification to a writer (stdout in the
//! binary) as text or JSON lines. [`TracingObserver`] mirrors the same
//! notifications into the structured log.

use std::io::{self, Write};

use ascent_core::config::OutputFormat;
use ascent_core::observer::FlightObserver;
use ascent_types::{Notification, Snapshot};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

/// Render a snapshot as the console status line.
pub fn format_snapshot(snapshot: &Snapshot) -> String {
    format!(
        "Stage: {}, Fuel: {}%, Altitude: {:.1} km, Speed: {:.0} km/h",
        snapshot.phase, snapshot.fuel, snapshot.altitude, snapshot.speed
    )
}

/// Writes notifications to a line-oriented sink.
pub struct ConsoleObserver<W> {
    out: Mutex<W>,
    format: OutputFormat,
}

impl ConsoleObserver<io::Stdout> {
    /// A console observer writing to standard output.
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write + Send> ConsoleObserver<W> {
    /// A console observer writing to `out`.
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out: Mutex::new(out),
            format,
        }
    }

    /// Consume the observer and return the writer.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write(&self, notification: &Notification) {
        let line = match self.format {
            OutputFormat::Text => match notification {
                Notification::Snapshot { snapshot } => format_snapshot(snapshot),
                Notification::Info { message } | Notification::Error { message } => {
                    message.clone()
                }
            },
            OutputFormat::Json => match serde_json::to_string(notification) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "failed to serialize notification");
                    return;
                }
            },
        };

        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!(error = %e, "failed to write console output");
        }
    }
}

impl<W: Write + Send> FlightObserver for ConsoleObserver<W> {
    fn on_snapshot(&self, snapshot: &Snapshot) {
        self.write(&Notification::Snapshot {
            snapshot: *snapshot,
        });
    }

    fn on_info(&self, message: &str) {
        self.write(&Notification::info(message));
    }

    fn on_error(&self, message: &str) {
        self.write(&Notification::error(message));
    }
}

/// Mirrors notifications into `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FlightObserver for TracingObserver {
    fn on_snapshot(&self, snapshot: &Snapshot) {
        debug!(
            tick = snapshot.elapsed_ticks,
            phase = %snapshot.phase,
            fuel = snapshot.fuel,
            altitude = snapshot.altitude,
            speed = snapshot.speed,
            "snapshot"
        );
    }

    fn on_info(&self, message: &str) {
        info!(notice = message, "flight notice");
    }

    fn on_error(&self, message: &str) {
        error!(notice = message, "flight alarm");
    }
}
