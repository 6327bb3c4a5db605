//! Command registry and the flight command set.
//!
//! A [`CommandRouter`] maps command names to [`CommandHandler`]s. Input is
//! split on whitespace; the first token selects the handler and the
//! remaining tokens are passed to it as arguments. Handlers only translate
//! arguments into [`SimulationContext`] calls and surface failures
//! unchanged.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::context::SimulationContext;

/// Command name for the pre-launch checks.
pub const START_CHECKS: &str = "start_checks";
/// Command name for launch.
pub const LAUNCH: &str = "launch";
/// Command name for fast-forwarding.
pub const FAST_FORWARD: &str = "fast_forward";
/// Command name for a single tick.
pub const TICK: &str = "tick";
/// Command name for leaving the command loop.
pub const EXIT: &str = "exit";

/// Errors surfaced by command handling.
///
/// Both kinds are recoverable: the simulation is left untouched and the
/// caller may keep accepting input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The first token does not name a registered command.
    #[error("Unknown command: {name}")]
    UnknownCommand {
        /// The offending token.
        name: String,
    },

    /// A required argument is missing or malformed.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument.
        reason: String,
    },
}

/// What the caller should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Keep reading commands.
    Continue,
    /// Stop the command loop and shut down.
    Exit,
}

/// A named simulation operation.
pub trait CommandHandler: Send + Sync {
    /// Run the command with the arguments following its name.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidArgument`] if the arguments cannot be
    /// interpreted. The simulation must be left unchanged in that case.
    fn execute(
        &self,
        args: &[&str],
        sim: &SimulationContext,
    ) -> Result<CommandOutcome, CommandError>;
}

/// `start_checks`: emits the go-for-launch message.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartChecks;

impl CommandHandler for StartChecks {
    fn execute(
        &self,
        _args: &[&str],
        sim: &SimulationContext,
    ) -> Result<CommandOutcome, CommandError> {
        sim.checks();
        Ok(CommandOutcome::Continue)
    }
}

/// `launch`: leaves the pad if still on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Launch;

impl CommandHandler for Launch {
    fn execute(
        &self,
        _args: &[&str],
        sim: &SimulationContext,
    ) -> Result<CommandOutcome, CommandError> {
        let _ = sim.launch();
        Ok(CommandOutcome::Continue)
    }
}

/// `fast_forward <seconds>`: ticks up to `seconds` times.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastForward;

impl CommandHandler for FastForward {
    fn execute(
        &self,
        args: &[&str],
        sim: &SimulationContext,
    ) -> Result<CommandOutcome, CommandError> {
        let seconds = parse_seconds(args.first().copied())?;
        let _ = sim.fast_forward(seconds);
        Ok(CommandOutcome::Continue)
    }
}

/// `tick`: advances exactly one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tick;

impl CommandHandler for Tick {
    fn execute(
        &self,
        _args: &[&str],
        sim: &SimulationContext,
    ) -> Result<CommandOutcome, CommandError> {
        let _ = sim.tick();
        Ok(CommandOutcome::Continue)
    }
}

/// `exit`: asks the caller to stop.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exit;

impl CommandHandler for Exit {
    fn execute(
        &self,
        _args: &[&str],
        _sim: &SimulationContext,
    ) -> Result<CommandOutcome, CommandError> {
        Ok(CommandOutcome::Exit)
    }
}

/// Parse the `fast_forward` argument as a non-negative tick count.
fn parse_seconds(arg: Option<&str>) -> Result<u64, CommandError> {
    let raw = arg.ok_or_else(|| CommandError::InvalidArgument {
        reason: format!("usage: {FAST_FORWARD} <seconds>"),
    })?;
    raw.parse::<u64>().map_err(|e| CommandError::InvalidArgument {
        reason: format!("expected a non-negative number of seconds, got `{raw}` ({e})"),
    })
}

/// Registry of commands keyed by name.
#[derive(Default)]
pub struct CommandRouter {
    commands: BTreeMap<String, Box<dyn CommandHandler>>,
    order: Vec<String>,
}

impl CommandRouter {
    /// An empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// A router with `start_checks`, `launch`, `fast_forward`, `tick`, and
    /// `exit` registered.
    pub fn with_flight_commands() -> Self {
        let mut router = Self::new();
        router.register(START_CHECKS, Box::new(StartChecks));
        router.register(LAUNCH, Box::new(Launch));
        router.register(FAST_FORWARD, Box::new(FastForward));
        router.register(TICK, Box::new(Tick));
        router.register(EXIT, Box::new(Exit));
        router
    }

    /// Bind `name` to `handler`, replacing any previous binding. Returns
    /// `true` if a binding was replaced.
    ///
    /// A replaced binding keeps its original position in
    /// [`command_names`](Self::command_names).
    pub fn register(&mut self, name: &str, handler: Box<dyn CommandHandler>) -> bool {
        let replaced = self.commands.insert(name.to_owned(), handler).is_some();
        if !replaced {
            self.order.push(name.to_owned());
        }
        replaced
    }

    /// Registered command names in registration order.
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Parse and dispatch one line of input.
    ///
    /// Blank input is a no-op that returns [`CommandOutcome::Continue`].
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownCommand`] if the first token is not
    /// registered, or whatever the handler returns.
    pub fn handle(
        &self,
        raw: &str,
        sim: &SimulationContext,
    ) -> Result<CommandOutcome, CommandError> {
        let mut tokens = raw.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(CommandOutcome::Continue);
        };
        let args: Vec<&str> = tokens.collect();

        let handler = self
            .commands
            .get(name)
            .ok_or_else(|| CommandError::UnknownCommand {
                name: name.to_owned(),
            })?;

        debug!(command = name, args = ?args, "dispatching command");
        handler.execute(&args, sim)
    }
}

impl fmt::Debug for CommandRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRouter")
            .field("commands", &self.order)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use ascent_types::Phase;

    use super::*;

    fn setup() -> (CommandRouter, SimulationContext) {
        (CommandRouter::with_flight_commands(), SimulationContext::new())
    }

    #[test]
    fn registers_the_flight_commands() {
        let router = CommandRouter::with_flight_commands();
        let names: Vec<&str> = router.command_names().collect();
        assert_eq!(names, ["start_checks", "launch", "fast_forward", "tick", "exit"]);
    }

    #[test]
    fn blank_input_is_a_no_op() {
        let (router, sim) = setup();
        assert_eq!(router.handle("", &sim).unwrap(), CommandOutcome::Continue);
        assert_eq!(router.handle("   \t ", &sim).unwrap(), CommandOutcome::Continue);
        assert_eq!(sim.elapsed_ticks(), 0);
    }

    #[test]
    fn unknown_command_carries_the_token() {
        let (router, sim) = setup();
        let before = sim.snapshot();
        let err = router.handle("foo bar", &sim).unwrap_err();
        assert_eq!(
            err,
            CommandError::UnknownCommand {
                name: "foo".to_owned()
            }
        );
        assert_eq!(err.to_string(), "Unknown command: foo");
        assert_eq!(sim.snapshot(), before);
    }

    #[test]
    fn fast_forward_requires_an_argument() {
        let (router, sim) = setup();
        let err = router.handle("fast_forward", &sim).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArgument { .. }));
        assert!(err.to_string().contains("fast_forward <seconds>"));
    }

    #[test]
    fn fast_forward_rejects_non_numeric_and_negative() {
        let (router, sim) = setup();
        router.handle("launch", &sim).unwrap();
        let before = sim.snapshot();

        for line in ["fast_forward abc", "fast_forward -3", "fast_forward 2.5"] {
            let err = router.handle(line, &sim).unwrap_err();
            assert!(matches!(err, CommandError::InvalidArgument { .. }), "{line}");
            assert_eq!(sim.snapshot(), before);
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let (router, sim) = setup();
        router.handle("  launch  ", &sim).unwrap();
        router.handle("fast_forward   8  extra", &sim).unwrap();
        assert_eq!(sim.phase(), Phase::Stage1);
        assert_eq!(sim.fuel(), 84);
        assert_eq!(sim.altitude(), 80.0);
        assert_eq!(sim.elapsed_ticks(), 8);
    }

    #[test]
    fn tick_and_exit() {
        let (router, sim) = setup();
        assert_eq!(router.handle("tick", &sim).unwrap(), CommandOutcome::Continue);
        assert_eq!(sim.elapsed_ticks(), 1);
        assert_eq!(router.handle("exit", &sim).unwrap(), CommandOutcome::Exit);
        assert_eq!(sim.elapsed_ticks(), 1);
    }

    #[test]
    fn register_replaces_existing_binding() {
        let mut router = CommandRouter::with_flight_commands();
        assert!(router.register(TICK, Box::new(Exit)));
        assert!(!router.register("abort", Box::new(Exit)));
        let names: Vec<&str> = router.command_names().collect();
        assert_eq!(names, ["start_checks", "launch", "fast_forward", "tick", "exit", "abort"]);
        let sim = SimulationContext::new();
        assert_eq!(router.handle("tick", &sim).unwrap(), CommandOutcome::Exit);
        assert_eq!(sim.elapsed_ticks(), 0);
    }
}
