//! Flight state machine, simulation context, and control plane for the
//! Ascent rocket simulator.
//!
//! Two activity sources drive one shared [`SimulationContext`]: the
//! autonomous [`ClockDriver`] and the interactive [`CommandRouter`]. Every
//! state change is fanned out to the registered observers.
//!
//! # Modules
//!
//! - [`phase`] -- Per-phase physics and transition rules.
//! - [`flight`] -- Unsynchronized flight state and its operations.
//! - [`observer`] -- [`FlightObserver`] trait and ordered fan-out.
//! - [`context`] -- [`SimulationContext`], the locked shared simulation.
//! - [`command`] -- [`CommandRouter`] and the flight command set.
//! - [`clock`] -- [`ClockDriver`], the periodic tick task.
//! - [`config`] -- Configuration loading from `ascent-config.yaml`.
//!
//! [`SimulationContext`]: context::SimulationContext
//! [`ClockDriver`]: clock::ClockDriver
//! [`CommandRouter`]: command::CommandRouter
//! [`FlightObserver`]: observer::FlightObserver

pub mod clock;
pub mod command;
pub mod config;
pub mod context;
pub mod flight;
pub mod observer;
pub mod phase;
