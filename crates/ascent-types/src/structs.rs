//! Snapshot and notification payloads delivered to observers.

use serde::{Deserialize, Serialize};

use crate::enums::Phase;

/// Immutable read of the flight state at one point in time.
///
/// Captured under the simulation lock at the end of every tick and handed to
/// each observer unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current flight phase.
    pub phase: Phase,
    /// Remaining fuel in percent (0-100).
    pub fuel: u32,
    /// Altitude in kilometres.
    pub altitude: f64,
    /// Speed in kilometres per hour.
    pub speed: f64,
    /// Number of ticks executed so far.
    pub elapsed_ticks: u64,
}

/// One notification produced by a simulation operation.
///
/// Operations build an ordered outbox of these while holding the simulation
/// lock; the outbox is then delivered to every observer in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Full state after a tick.
    Snapshot {
        /// The captured state.
        snapshot: Snapshot,
    },
    /// Informational message.
    Info {
        /// Message text, passed through unchanged.
        message: String,
    },
    /// Error message.
    Error {
        /// Message text, passed through unchanged.
        message: String,
    },
}

impl Notification {
    /// Build an informational notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info {
            message: message.into(),
        }
    }

    /// Build an error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Message text of a text notification, `None` for snapshots.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Snapshot { .. } => None,
            Self::Info { message } | Self::Error { message } => Some(message),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_notification_is_tagged() {
        let n = Notification::Snapshot {
            snapshot: Snapshot {
                phase: Phase::Stage1,
                fuel: 98,
                altitude: 10.0,
                speed: 1000.0,
                elapsed_ticks: 1,
            },
        };
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["kind"], "snapshot");
        assert_eq!(value["snapshot"]["phase"], "stage1");
        assert_eq!(value["snapshot"]["fuel"], 98);
        assert!(n.message().is_none());
    }

    #[test]
    fn text_notifications_expose_their_message() {
        let info = Notification::info("Launch initiated.");
        assert_eq!(info.message(), Some("Launch initiated."));

        let error = Notification::error("Mission Failed due to insufficient fuel.");
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["kind"], "error");
        assert_eq!(value["message"], "Mission Failed due to insufficient fuel.");
    }
}
