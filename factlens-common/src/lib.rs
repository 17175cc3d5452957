//! Common types and utilities shared across Factlens crates.
//!
//! This crate defines the shared error type, observability helpers, and the
//! shutdown handle used throughout the Factlens workspace. It is intentionally
//! lightweight so that all crates can depend on it without introducing heavy
//! transitive costs.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`shutdown`]: Broadcast-based cooperative shutdown
//! - [`FactlensError`] and [`Result`]: Shared error handling

pub mod observability;
pub mod shutdown;

pub use shutdown::ShutdownHandle;

/// Error types used across the Factlens system.
#[derive(thiserror::Error, Debug)]
pub enum FactlensError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The terminal could not be set up or restored.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Convenient alias for results that use [`FactlensError`].
pub type Result<T> = std::result::Result<T, FactlensError>;
