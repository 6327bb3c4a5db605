//! End-to-end properties of the simulator through its public API.
//!
//! Commands go through the [`CommandRouter`] exactly as the engine feeds
//! them, and observers record what they receive.

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]

use std::sync::Arc;
use std::thread;

use ascent_core::command::{CommandError, CommandOutcome, CommandRouter};
use ascent_core::context::SimulationContext;
use ascent_core::observer::FlightObserver;
use ascent_types::{Phase, Snapshot};
use parking_lot::Mutex;

/// Records snapshots and messages, tagged with the observer's name.
struct Probe {
    name: &'static str,
    calls: Arc<Mutex<Vec<(&'static str, Snapshot)>>>,
    messages: Mutex<Vec<String>>,
}

impl Probe {
    fn new(name: &'static str, calls: &Arc<Mutex<Vec<(&'static str, Snapshot)>>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            calls: Arc::clone(calls),
            messages: Mutex::new(Vec::new()),
        })
    }
}

impl FlightObserver for Probe {
    fn on_snapshot(&self, snapshot: &Snapshot) {
        self.calls.lock().push((self.name, *snapshot));
    }
    fn on_info(&self, message: &str) {
        self.messages.lock().push(format!("info: {message}"));
    }
    fn on_error(&self, message: &str) {
        self.messages.lock().push(format!("error: {message}"));
    }
}

fn run(router: &CommandRouter, sim: &SimulationContext, lines: &[&str]) {
    for line in lines {
        assert_eq!(router.handle(line, sim).unwrap(), CommandOutcome::Continue);
    }
}

#[test]
fn two_observers_see_one_tick_in_registration_order() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sim = SimulationContext::new();
    sim.add_observer(Probe::new("first", &calls));
    sim.add_observer(Probe::new("second", &calls));

    let router = CommandRouter::with_flight_commands();
    run(&router, &sim, &["tick"]);

    let calls = calls.lock();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "first");
    assert_eq!(calls[1].0, "second");
    assert_eq!(calls[0].1, calls[1].1);
    assert_eq!(calls[0].1.elapsed_ticks, 1);
}

#[test]
fn launch_then_six_ticks() {
    let sim = SimulationContext::new();
    let router = CommandRouter::with_flight_commands();
    run(&router, &sim, &["launch", "tick", "tick", "tick", "tick", "tick", "tick"]);

    assert_eq!(sim.fuel(), 88);
    assert_eq!(sim.altitude(), 60.0);
    assert_eq!(sim.speed(), 6000.0);
    assert_eq!(sim.phase().name(), "Stage 1");
}

#[test]
fn launch_then_fast_forward_eight() {
    let sim = SimulationContext::new();
    let router = CommandRouter::with_flight_commands();
    run(&router, &sim, &["start_checks", "launch", "fast_forward 8"]);

    assert_eq!(sim.fuel(), 84);
    assert_eq!(sim.altitude(), 80.0);
    assert_eq!(sim.phase(), Phase::Stage1);
    assert_eq!(sim.elapsed_ticks(), 8);
}

#[test]
fn full_mission_reports_every_milestone() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let probe = Probe::new("console", &calls);
    let sim = SimulationContext::new();
    sim.add_observer(Arc::clone(&probe) as Arc<dyn FlightObserver>);

    let router = CommandRouter::with_flight_commands();
    run(&router, &sim, &["start_checks", "launch", "fast_forward 500"]);

    assert_eq!(sim.phase(), Phase::Orbit);
    assert_eq!(
        *probe.messages.lock(),
        [
            "info: All systems are 'Go' for launch.",
            "info: Launch initiated.",
            "info: Stage 1 complete. Separating stage. Entering Stage 2.",
            "info: Orbit achieved! Mission Successful.",
        ]
    );

    let ticks = sim.elapsed_ticks();
    run(&router, &sim, &["fast_forward 500", "fast_forward 1"]);
    assert_eq!(sim.elapsed_ticks(), ticks);
    assert_eq!(calls.lock().len(), usize::try_from(ticks).unwrap());

    // Single ticks still count in a terminal phase.
    run(&router, &sim, &["tick"]);
    assert_eq!(sim.elapsed_ticks(), ticks + 1);
    assert_eq!(sim.phase(), Phase::Orbit);
}

#[test]
fn rejected_commands_leave_state_unchanged() {
    let sim = SimulationContext::new();
    let router = CommandRouter::with_flight_commands();
    run(&router, &sim, &["launch", "tick"]);
    let before = sim.snapshot();

    let unknown = router.handle("foo", &sim).unwrap_err();
    assert!(matches!(unknown, CommandError::UnknownCommand { ref name } if name == "foo"));

    let invalid = router.handle("fast_forward abc", &sim).unwrap_err();
    assert!(matches!(invalid, CommandError::InvalidArgument { .. }));

    assert_eq!(sim.snapshot(), before);
}

#[test]
fn exit_stops_without_touching_the_flight() {
    let sim = SimulationContext::new();
    let router = CommandRouter::with_flight_commands();
    assert_eq!(router.handle("exit", &sim).unwrap(), CommandOutcome::Exit);
    assert_eq!(sim.elapsed_ticks(), 0);
}

#[test]
fn concurrent_ticks_are_never_lost() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sim = Arc::new(SimulationContext::new());
    sim.add_observer(Probe::new("probe", &calls));
    assert!(sim.launch());

    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..10 {
                let _ = sim.tick();
            }
        });
        scope.spawn(|| {
            for _ in 0..5 {
                let _ = sim.fast_forward(2);
            }
        });
    });

    assert_eq!(sim.elapsed_ticks(), 20);
    assert_eq!(sim.phase(), Phase::Stage2);
    assert_eq!(sim.altitude(), 160.0);

    let calls = calls.lock();
    assert_eq!(calls.len(), 20);
    for (i, (_, snapshot)) in calls.iter().enumerate() {
        assert_eq!(snapshot.elapsed_ticks, u64::try_from(i).unwrap() + 1);
    }
}
