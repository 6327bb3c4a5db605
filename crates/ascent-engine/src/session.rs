//! Line-oriented command loop.
//!
//! Reads one command per line and feeds it to the [`CommandRouter`]. A
//! rejected command is reported and the loop keeps going; only `exit` or
//! the end of input stops it.

use ascent_core::command::{CommandError, CommandOutcome, CommandRouter};
use ascent_core::context::SimulationContext;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

/// Why the command loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The `exit` command was issued.
    Exit,
    /// The input stream closed.
    EndOfInput,
}

/// Result of a command session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Why the session ended.
    pub end: SessionEnd,
    /// Lines dispatched successfully.
    pub accepted: u64,
    /// Lines rejected with a command error.
    pub rejected: u64,
}

/// Run commands from `input` until `exit` or end of input.
///
/// Each rejected command is passed to `report` and counted; the simulation
/// is left as it was.
///
/// # Errors
///
/// Returns an I/O error if reading from `input` fails.
pub async fn run<R>(
    input: R,
    router: &CommandRouter,
    sim: &SimulationContext,
    mut report: impl FnMut(&CommandError),
) -> std::io::Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut accepted: u64 = 0;
    let mut rejected: u64 = 0;

    while let Some(line) = lines.next_line().await? {
        match router.handle(&line, sim) {
            Ok(CommandOutcome::Continue) => {
                accepted = accepted.saturating_add(1);
            }
            Ok(CommandOutcome::Exit) => {
                debug!("exit requested");
                return Ok(SessionSummary {
                    end: SessionEnd::Exit,
                    accepted: accepted.saturating_add(1),
                    rejected,
                });
            }
            Err(e) => {
                warn!(input = line.trim(), error = %e, "command rejected");
                rejected = rejected.saturating_add(1);
                report(&e);
            }
        }
    }

    Ok(SessionSummary {
        end: SessionEnd::EndOfInput,
        accepted,
        rejected,
    })
}
