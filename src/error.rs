//! Error types for effect configuration.

use std::io;
use thiserror::Error;

/// Result type alias for fallible effect operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or configuring the effects.
///
/// The engines never fail once mounted; everything here surfaces before that.
#[derive(Debug, Error)]
pub enum Error {
    /// A text rotator needs at least one phrase to cycle through
    #[error("phrase list is empty")]
    EmptyPhrases,

    /// Color literal is not `#rrggbb` or `#rrggbbaa`
    #[error("invalid color {0:?}: expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error while reading a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration file is not valid TOML for this schema
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
