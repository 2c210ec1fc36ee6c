//! Common types and utilities shared across Threadcast crates.
//!
//! Kept dependency-light so every crate in the workspace can pull it in:
//!
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`ThreadcastError`] and [`Result`]: process-level error handling used by
//!   the binary and the wiring code that glues components together
//!
//! Component crates (`threadcast-http`, `threadcast-llm`, ...) carry their own
//! typed errors; this one is for failures that belong to no single component.
pub mod observability;

/// Process-level errors.
#[derive(thiserror::Error, Debug)]
pub enum ThreadcastError {
    /// Configuration files or overrides could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A client could not be constructed from its configuration.
    #[error("Client setup error: {0}")]
    Setup(String),

    /// The web server failed to bind or serve.
    #[error("Server error: {0}")]
    Server(String),
}

/// Convenient alias for results that use [`ThreadcastError`].
pub type Result<T> = std::result::Result<T, ThreadcastError>;
