//! The shared simulation context.
//!
//! [`SimulationContext`] is the one mutable resource of the simulator. The
//! clock driver and the command router both hold an `Arc` to it. Every
//! operation acquires the flight lock once, runs its read-modify-write
//! sequence, and delivers the resulting outbox to the observers before
//! releasing the lock. Notifications from concurrent callers are therefore
//! totally ordered and always match the order of the mutations that raised
//! them.

use std::sync::Arc;

use ascent_types::{Notification, Phase, Snapshot};
use parking_lot::Mutex;

use crate::flight::FlightState;
use crate::observer::{FlightObserver, ObserverList};

/// Process-scoped rocket simulation.
#[derive(Debug, Default)]
pub struct SimulationContext {
    flight: Mutex<FlightState>,
    observers: ObserverList,
}

impl SimulationContext {
    /// A fuelled vehicle on the pad with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer at the end of the notification order.
    pub fn add_observer(&self, observer: Arc<dyn FlightObserver>) {
        self.observers.push(observer);
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Advance one tick and notify observers. Returns the post-tick
    /// snapshot.
    pub fn tick(&self) -> Snapshot {
        self.with_flight(|flight, outbox| flight.tick(outbox))
    }

    /// Tick up to `max_ticks` times, stopping early once the flight is in a
    /// terminal phase. The whole run is a single critical section, and
    /// observers are notified after every tick. Returns the number of ticks
    /// performed.
    pub fn fast_forward(&self, max_ticks: u64) -> u64 {
        let mut flight = self.flight.lock();
        flight.fast_forward(max_ticks, |outbox| self.observers.deliver(outbox))
    }

    /// Launch if still on the pad. Returns whether the launch happened;
    /// launching in any other phase is a silent no-op.
    pub fn launch(&self) -> bool {
        self.with_flight(FlightState::launch)
    }

    /// Run the pre-launch checks.
    pub fn checks(&self) {
        self.with_flight(|_, outbox| FlightState::checks(outbox));
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.flight.lock().phase()
    }

    /// Remaining fuel in percent.
    pub fn fuel(&self) -> u32 {
        self.flight.lock().telemetry().fuel
    }

    /// Altitude in kilometres.
    pub fn altitude(&self) -> f64 {
        self.flight.lock().telemetry().altitude
    }

    /// Speed in kilometres per hour.
    pub fn speed(&self) -> f64 {
        self.flight.lock().telemetry().speed
    }

    /// Number of ticks executed so far.
    pub fn elapsed_ticks(&self) -> u64 {
        self.flight.lock().elapsed_ticks()
    }

    /// Consistent read of every quantity at once.
    pub fn snapshot(&self) -> Snapshot {
        self.flight.lock().snapshot()
    }

    fn with_flight<T>(
        &self,
        op: impl FnOnce(&mut FlightState, &mut Vec<Notification>) -> T,
    ) -> T {
        let mut flight = self.flight.lock();
        let mut outbox = Vec::new();
        let result = op(&mut *flight, &mut outbox);
        self.observers.deliver(&outbox);
        result
    }
}

#[cfg(test)]
#[allow(
    clippy::float_cmp,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]
mod tests {
    use super::*;
    use crate::flight::{CHECKS_MESSAGE, LAUNCH_MESSAGE};

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Notification>>,
    }

    impl FlightObserver for Recorder {
        fn on_snapshot(&self, snapshot: &Snapshot) {
            self.seen.lock().push(Notification::Snapshot { snapshot: *snapshot });
        }
        fn on_info(&self, message: &str) {
            self.seen.lock().push(Notification::info(message));
        }
        fn on_error(&self, message: &str) {
            self.seen.lock().push(Notification::error(message));
        }
    }

    #[test]
    fn fresh_context_is_on_the_pad() {
        let sim = SimulationContext::new();
        assert_eq!(sim.phase(), Phase::PreLaunch);
        assert_eq!(sim.fuel(), 100);
        assert_eq!(sim.altitude(), 0.0);
        assert_eq!(sim.speed(), 0.0);
        assert_eq!(sim.elapsed_ticks(), 0);
        assert_eq!(sim.observer_count(), 0);
    }

    #[test]
    fn info_is_delivered_before_the_snapshot_that_follows() {
        let sim = SimulationContext::new();
        let recorder = Arc::new(Recorder::default());
        sim.add_observer(Arc::clone(&recorder) as Arc<dyn FlightObserver>);

        sim.checks();
        assert!(sim.launch());
        let snapshot = sim.tick();

        assert_eq!(
            *recorder.seen.lock(),
            [
                Notification::info(CHECKS_MESSAGE),
                Notification::info(LAUNCH_MESSAGE),
                Notification::Snapshot { snapshot },
            ]
        );
    }

    #[test]
    fn second_launch_is_silent() {
        let sim = SimulationContext::new();
        let recorder = Arc::new(Recorder::default());
        sim.add_observer(Arc::clone(&recorder) as Arc<dyn FlightObserver>);

        assert!(sim.launch());
        assert!(!sim.launch());
        assert_eq!(recorder.seen.lock().len(), 1);
    }

    #[test]
    fn launch_does_not_tick() {
        let sim = SimulationContext::new();
        let _ = sim.launch();
        assert_eq!(sim.elapsed_ticks(), 0);
        assert_eq!(sim.fuel(), 100);
    }

    #[test]
    fn fast_forward_delivers_one_snapshot_per_tick() {
        let sim = SimulationContext::new();
        let recorder = Arc::new(Recorder::default());
        sim.add_observer(Arc::clone(&recorder) as Arc<dyn FlightObserver>);
        let _ = sim.launch();

        assert_eq!(sim.fast_forward(5), 5);
        let snapshots = recorder
            .seen
            .lock()
            .iter()
            .filter(|n| matches!(n, Notification::Snapshot { .. }))
            .count();
        assert_eq!(snapshots, 5);
    }

    /// Counts snapshots, checking they arrive in tick order.
    #[derive(Default)]
    struct Counter {
        snapshots: Mutex<Vec<u64>>,
    }

    impl FlightObserver for Counter {
        fn on_snapshot(&self, snapshot: &Snapshot) {
            let mut seen = self.snapshots.lock();
            assert_eq!(snapshot.elapsed_ticks, seen.len() as u64 + 1);
            seen.push(snapshot.elapsed_ticks);
        }
        fn on_info(&self, _message: &str) {}
        fn on_error(&self, _message: &str) {}
    }

    #[test]
    fn fast_forward_on_the_pad_streams_every_tick() {
        let sim = SimulationContext::new();
        let counter = Arc::new(Counter::default());
        sim.add_observer(Arc::clone(&counter) as Arc<dyn FlightObserver>);

        assert_eq!(sim.fast_forward(10_000), 10_000);
        assert_eq!(sim.phase(), Phase::PreLaunch);
        assert_eq!(sim.fuel(), 100);
        assert_eq!(sim.altitude(), 0.0);
        assert_eq!(sim.elapsed_ticks(), 10_000);
        assert_eq!(counter.snapshots.lock().len(), 10_000);
    }
}
