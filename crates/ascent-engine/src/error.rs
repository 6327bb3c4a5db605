//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of startup and shutdown so that
//! `main` can propagate with `?`. Command errors never reach it; they are
//! reported and recovered inside the command loop.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ascent_core::config::ConfigError,
    },

    /// The clock task failed to shut down cleanly.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ascent_core::clock::ClockError,
    },

    /// Reading commands from the input stream failed.
    #[error("input error: {source}")]
    Input {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The log subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
