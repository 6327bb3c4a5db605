//! Per-phase physics and transition rules.
//!
//! Each [`Phase`] owns one tick's worth of physics. [`update`] applies the
//! current phase's deltas to the [`Telemetry`], evaluates the phase's exit
//! conditions against the post-delta values, and returns the phase the
//! flight is in afterwards. Notifications raised by a transition are pushed
//! onto the caller's outbox in the order the checks run.
//!
//! `PreLaunch` never leaves on its own; only an explicit launch moves it to
//! `Stage1`. `Orbit` and `Failed` are terminal and their update is a no-op.

use ascent_types::{Notification, Phase};

/// Fuel load at launch, in percent.
pub const FULL_TANK: u32 = 100;

/// Stage 1 fuel burn per tick.
pub const STAGE1_FUEL_BURN: u32 = 2;
/// Stage 1 altitude gain per tick (km).
pub const STAGE1_CLIMB: f64 = 10.0;
/// Stage 1 speed gain per tick (km/h).
pub const STAGE1_THRUST: f64 = 1000.0;
/// Stage 1 separates once fuel drops to this level or below.
pub const STAGE1_SEPARATION_FUEL: u32 = 40;
/// Stage 1 separates once altitude reaches this level.
pub const STAGE1_SEPARATION_ALTITUDE: f64 = 120.0;

/// Stage 2 fuel burn per tick.
pub const STAGE2_FUEL_BURN: u32 = 1;
/// Stage 2 altitude gain per tick (km).
pub const STAGE2_CLIMB: f64 = 5.0;
/// Stage 2 speed gain per tick (km/h).
pub const STAGE2_THRUST: f64 = 400.0;
/// The mission fails once fuel drops to this level or below in Stage 2.
pub const STAGE2_FAILURE_FUEL: u32 = 5;
/// Orbit is reached at this altitude.
pub const ORBIT_ALTITUDE: f64 = 400.0;

/// Message emitted when Stage 1 separates.
pub const STAGE_SEPARATION_MESSAGE: &str = "Stage 1 complete. Separating stage. Entering Stage 2.";
/// Message emitted when Stage 2 runs dry.
pub const MISSION_FAILED_MESSAGE: &str = "Mission Failed due to insufficient fuel.";
/// Message emitted when orbit is reached.
pub const ORBIT_MESSAGE: &str = "Orbit achieved! Mission Successful.";

/// Physical quantities mutated by the active phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    /// Remaining fuel in percent, never below zero.
    pub fuel: u32,
    /// Altitude in kilometres.
    pub altitude: f64,
    /// Speed in kilometres per hour.
    pub speed: f64,
}

impl Telemetry {
    /// A fuelled vehicle at rest on the pad.
    pub const fn on_pad() -> Self {
        Self {
            fuel: FULL_TANK,
            altitude: 0.0,
            speed: 0.0,
        }
    }

    /// Burn `amount` fuel, flooring at zero.
    pub const fn consume_fuel(&mut self, amount: u32) {
        self.fuel = self.fuel.saturating_sub(amount);
    }

    /// Apply one tick of climb and acceleration.
    fn burn(&mut self, fuel: u32, climb: f64, thrust: f64) {
        self.consume_fuel(fuel);
        self.altitude += climb;
        self.speed += thrust;
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::on_pad()
    }
}

/// Run one tick of `phase` against `telemetry` and return the next phase.
pub fn update(phase: Phase, telemetry: &mut Telemetry, outbox: &mut Vec<Notification>) -> Phase {
    match phase {
        Phase::PreLaunch | Phase::Orbit | Phase::Failed => phase,
        Phase::Stage1 => stage1(telemetry, outbox),
        Phase::Stage2 => stage2(telemetry, outbox),
    }
}

fn stage1(telemetry: &mut Telemetry, outbox: &mut Vec<Notification>) -> Phase {
    telemetry.burn(STAGE1_FUEL_BURN, STAGE1_CLIMB, STAGE1_THRUST);

    if telemetry.fuel <= STAGE1_SEPARATION_FUEL
        || telemetry.altitude >= STAGE1_SEPARATION_ALTITUDE
    {
        outbox.push(Notification::info(STAGE_SEPARATION_MESSAGE));
        return Phase::Stage2;
    }
    Phase::Stage1
}

/// Both terminal checks always run, failure first. When both hold in the
/// same tick the orbit check overrides the failure.
fn stage2(telemetry: &mut Telemetry, outbox: &mut Vec<Notification>) -> Phase {
    telemetry.burn(STAGE2_FUEL_BURN, STAGE2_CLIMB, STAGE2_THRUST);

    let mut next = Phase::Stage2;
    if telemetry.fuel <= STAGE2_FAILURE_FUEL {
        next = Phase::Failed;
        outbox.push(Notification::error(MISSION_FAILED_MESSAGE));
    }
    if telemetry.altitude >= ORBIT_ALTITUDE {
        next = Phase::Orbit;
        outbox.push(Notification::info(ORBIT_MESSAGE));
    }
    next
}
