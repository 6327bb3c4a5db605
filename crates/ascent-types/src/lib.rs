//! Shared type definitions for the Ascent simulator.
//!
//! These are the values that cross crate boundaries: the flight phase tag,
//! the immutable snapshot delivered to observers after every tick, and the
//! notifications an operation emits.
//!
//! # Modules
//!
//! - [`enums`] -- Flight phase enumeration
//! - [`structs`] -- Snapshot and notification payloads

pub mod enums;
pub mod structs;

pub use enums::Phase;
pub use structs::{Notification, Snapshot};
