//! Enumeration types for the Ascent simulator.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Flight Phase
// ---------------------------------------------------------------------------

/// One named stage of the ascent state machine.
///
/// Transitions only move forward:
/// `PreLaunch -> Stage1 -> Stage2 -> {Orbit | Failed}`. The variants carry no
/// data; the physics of each phase is a pure function of the flight
/// quantities it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// On the pad, waiting for a launch command.
    PreLaunch,
    /// First stage burn.
    Stage1,
    /// Second stage burn after separation.
    Stage2,
    /// Orbit reached. Terminal.
    Orbit,
    /// Mission lost. Terminal.
    Failed,
}

impl Phase {
    /// All phases in flight order.
    pub const ALL: [Self; 5] = [
        Self::PreLaunch,
        Self::Stage1,
        Self::Stage2,
        Self::Orbit,
        Self::Failed,
    ];

    /// Human-readable phase name shown to observers.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PreLaunch => "Pre-Launch",
            Self::Stage1 => "Stage 1",
            Self::Stage2 => "Stage 2",
            Self::Orbit => "Orbit",
            Self::Failed => "Failed",
        }
    }

    /// Whether no further physics update can happen in this phase.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Orbit | Self::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
