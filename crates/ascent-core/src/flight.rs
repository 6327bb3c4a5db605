//! Flight state: the lock-free core of the simulation.
//!
//! [`FlightState`] holds the current phase, the [`Telemetry`], and the tick
//! counter. Every operation appends the notifications it raises to an
//! outbox instead of delivering them; [`SimulationContext`] owns the lock
//! and the observers and takes care of delivery.
//!
//! [`SimulationContext`]: crate::context::SimulationContext

use ascent_types::{Notification, Phase, Snapshot};
use tracing::{debug, info};

use crate::phase::{self, Telemetry};

/// Message emitted by a successful launch.
pub const LAUNCH_MESSAGE: &str = "Launch initiated.";

/// Message emitted by the pre-launch checks.
pub const CHECKS_MESSAGE: &str = "All systems are 'Go' for launch.";

/// Mutable flight state with no synchronization of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightState {
    phase: Phase,
    telemetry: Telemetry,
    elapsed_ticks: u64,
}

impl FlightState {
    /// A fuelled vehicle on the pad at tick 0.
    pub const fn new() -> Self {
        Self {
            phase: Phase::PreLaunch,
            telemetry: Telemetry::on_pad(),
            elapsed_ticks: 0,
        }
    }

    /// Current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Current physical quantities.
    pub const fn telemetry(&self) -> Telemetry {
        self.telemetry
    }

    /// Number of ticks executed so far.
    pub const fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Capture the current state.
    pub const fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            fuel: self.telemetry.fuel,
            altitude: self.telemetry.altitude,
            speed: self.telemetry.speed,
            elapsed_ticks: self.elapsed_ticks,
        }
    }

    /// Advance one tick.
    ///
    /// Runs the active phase's update, bumps the tick counter, and finishes
    /// the outbox with a snapshot. Terminal phases still count the tick and
    /// still produce a snapshot.
    pub fn tick(&mut self, outbox: &mut Vec<Notification>) -> Snapshot {
        let previous = self.phase;
        self.phase = phase::update(previous, &mut self.telemetry, outbox);
        self.elapsed_ticks = self.elapsed_ticks.saturating_add(1);

        if self.phase != previous {
            info!(
                tick = self.elapsed_ticks,
                from = %previous,
                to = %self.phase,
                fuel = self.telemetry.fuel,
                altitude = self.telemetry.altitude,
                "phase transition"
            );
        }

        let snapshot = self.snapshot();
        debug!(
            tick = snapshot.elapsed_ticks,
            phase = %snapshot.phase,
            fuel = snapshot.fuel,
            altitude = snapshot.altitude,
            speed = snapshot.speed,
            "tick"
        );
        outbox.push(Notification::Snapshot { snapshot });
        snapshot
    }

    /// Tick up to `max_ticks` times, stopping as soon as the phase is
    /// terminal. The terminal check runs before each iteration. Returns the
    /// number of ticks performed.
    ///
    /// Each tick's notifications are handed to `deliver` before the next
    /// tick runs, so memory stays flat however large `max_ticks` is.
    pub fn fast_forward(
        &mut self,
        max_ticks: u64,
        mut deliver: impl FnMut(&[Notification]),
    ) -> u64 {
        let mut outbox = Vec::new();
        let mut performed: u64 = 0;
        while performed < max_ticks && !self.phase.is_terminal() {
            let _ = self.tick(&mut outbox);
            deliver(&outbox);
            outbox.clear();
            performed = performed.saturating_add(1);
        }
        debug!(requested = max_ticks, performed, phase = %self.phase, "fast forward");
        performed
    }

    /// Move from `PreLaunch` to `Stage1`. Returns `false` and does nothing in
    /// any other phase.
    pub fn launch(&mut self, outbox: &mut Vec<Notification>) -> bool {
        if self.phase != Phase::PreLaunch {
            debug!(phase = %self.phase, "launch ignored outside pre-launch");
            return false;
        }
        self.phase = Phase::Stage1;
        info!(tick = self.elapsed_ticks, "launch");
        outbox.push(Notification::info(LAUNCH_MESSAGE));
        true
    }

    /// Run the pre-launch checks. Has no effect on the flight.
    pub fn checks(outbox: &mut Vec<Notification>) {
        outbox.push(Notification::info(CHECKS_MESSAGE));
    }
}

impl Default for FlightState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(
    clippy::float_cmp,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]
mod tests {
    use super::*;

    fn launched() -> FlightState {
        let mut flight = FlightState::new();
        let mut outbox = Vec::new();
        assert!(flight.launch(&mut outbox));
        flight
    }

    #[test]
    fn starts_on_the_pad() {
        let flight = FlightState::new();
        let s = flight.snapshot();
        assert_eq!(s.phase, Phase::PreLaunch);
        assert_eq!(s.fuel, 100);
        assert_eq!(s.altitude, 0.0);
        assert_eq!(s.speed, 0.0);
        assert_eq!(s.elapsed_ticks, 0);
    }

    #[test]
    fn tick_on_the_pad_counts_but_does_not_move() {
        let mut flight = FlightState::new();
        let mut outbox = Vec::new();
        let s = flight.tick(&mut outbox);
        assert_eq!(s.phase, Phase::PreLaunch);
        assert_eq!(s.fuel, 100);
        assert_eq!(s.elapsed_ticks, 1);
        assert_eq!(outbox, [Notification::Snapshot { snapshot: s }]);
    }

    #[test]
    fn launch_only_from_pre_launch() {
        let mut flight = FlightState::new();
        let mut outbox = Vec::new();
        assert!(flight.launch(&mut outbox));
        assert!(!flight.launch(&mut outbox));
        assert_eq!(flight.phase(), Phase::Stage1);
        assert_eq!(outbox, [Notification::info(LAUNCH_MESSAGE)]);
        assert_eq!(flight.elapsed_ticks(), 0);
    }

    #[test]
    fn six_ticks_after_launch() {
        let mut flight = launched();
        let mut outbox = Vec::new();
        for _ in 0..6 {
            let _ = flight.tick(&mut outbox);
        }
        let s = flight.snapshot();
        assert_eq!(s.fuel, 88);
        assert_eq!(s.altitude, 60.0);
        assert_eq!(s.speed, 6000.0);
        assert_eq!(s.phase.name(), "Stage 1");
    }

    #[test]
    fn fast_forward_eight_stays_in_stage1() {
        let mut flight = launched();
        let mut outbox = Vec::new();
        assert_eq!(flight.fast_forward(8, |batch| outbox.extend_from_slice(batch)), 8);
        let s = flight.snapshot();
        assert_eq!(s.fuel, 84);
        assert_eq!(s.altitude, 80.0);
        assert_eq!(s.phase, Phase::Stage1);
        assert_eq!(outbox.len(), 8);
    }

    #[test]
    fn fast_forward_hands_over_one_tick_at_a_time() {
        let mut flight = launched();
        let mut batches: Vec<Vec<Notification>> = Vec::new();
        assert_eq!(flight.fast_forward(14, |batch| batches.push(batch.to_vec())), 14);

        assert_eq!(batches.len(), 14);
        for (tick, batch) in (1..).zip(&batches) {
            let Some(Notification::Snapshot { snapshot }) = batch.last() else {
                panic!("batch {tick} does not end with a snapshot");
            };
            assert_eq!(snapshot.elapsed_ticks, tick);
        }
        // Tick 12 separates the stages.
        assert_eq!(batches[11].len(), 2);
        assert_eq!(batches[11][0].message(), Some(phase::STAGE_SEPARATION_MESSAGE));
    }

    #[test]
    fn fast_forward_on_the_pad_counts_ticks_without_physics() {
        let mut flight = FlightState::new();
        let mut delivered: u64 = 0;
        assert_eq!(flight.fast_forward(500, |batch| delivered += batch.len() as u64), 500);

        let s = flight.snapshot();
        assert_eq!(s.phase, Phase::PreLaunch);
        assert_eq!(s.elapsed_ticks, 500);
        assert_eq!(s.fuel, 100);
        assert_eq!(s.altitude, 0.0);
        assert_eq!(s.speed, 0.0);
        assert_eq!(delivered, 500);
    }

    #[test]
    fn fast_forward_zero_does_nothing() {
        let mut flight = launched();
        let mut outbox = Vec::new();
        assert_eq!(flight.fast_forward(0, |batch| outbox.extend_from_slice(batch)), 0);
        assert_eq!(flight.elapsed_ticks(), 0);
        assert!(outbox.is_empty());
    }

    #[test]
    fn full_flight_reaches_orbit_and_stops() {
        let mut flight = launched();
        let mut outbox = Vec::new();
        let performed = flight.fast_forward(1_000, |batch| outbox.extend_from_slice(batch));

        // 12 ticks of Stage 1 to reach 120 km, then 56 ticks of Stage 2.
        assert_eq!(performed, 68);
        let s = flight.snapshot();
        assert_eq!(s.phase, Phase::Orbit);
        assert_eq!(s.altitude, 400.0);
        assert_eq!(s.fuel, 20);
        assert_eq!(s.speed, 12.0 * 1000.0 + 56.0 * 400.0);

        let messages: Vec<&str> = outbox.iter().filter_map(Notification::message).collect();
        assert_eq!(
            messages,
            [phase::STAGE_SEPARATION_MESSAGE, phase::ORBIT_MESSAGE]
        );

        let mut tail = Vec::new();
        assert_eq!(flight.fast_forward(10, |batch| tail.extend_from_slice(batch)), 0);
        assert!(tail.is_empty());
        assert_eq!(flight.elapsed_ticks(), 68);
    }

    #[test]
    fn ticks_after_orbit_keep_counting_without_physics() {
        let mut flight = launched();
        let mut outbox = Vec::new();
        let _ = flight.fast_forward(1_000, |batch| outbox.extend_from_slice(batch));
        let before = flight.snapshot();

        let after = flight.tick(&mut outbox);
        assert_eq!(after.elapsed_ticks, before.elapsed_ticks + 1);
        assert_eq!(after.fuel, before.fuel);
        assert_eq!(after.altitude, before.altitude);
        assert_eq!(after.speed, before.speed);
        assert_eq!(after.phase, Phase::Orbit);
    }

    #[test]
    fn fuel_and_altitude_are_monotonic() {
        let mut flight = launched();
        let mut outbox = Vec::new();
        let mut last = flight.snapshot();
        for _ in 0..100 {
            let s = flight.tick(&mut outbox);
            assert!(s.fuel <= last.fuel);
            assert!(s.altitude >= last.altitude);
            assert!(s.speed >= last.speed);
            last = s;
        }
    }

    #[test]
    fn checks_only_emit_a_message() {
        let flight = FlightState::new();
        let mut outbox = Vec::new();
        FlightState::checks(&mut outbox);
        assert_eq!(outbox, [Notification::info(CHECKS_MESSAGE)]);
        assert_eq!(flight, FlightState::new());
    }
}
