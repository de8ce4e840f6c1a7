//! Firmware Version Stamping Library
//!
//! This library derives a firmware version from git metadata, injects it into a
//! build's flag list as a preprocessor define, and archives the produced binary
//! under a versioned, timestamped name once the build has finished.

pub mod cli;
pub mod io;
pub mod models;
pub mod services;

pub use models::{
    ArchiveReport, ArchiveStatus, BuildContext, CleanupOutcome, CopyOutcome, DestinationKind,
    ResolvedVersion, VersionOrigin,
};
pub use services::archive::{ArchiveOptions, WaitPolicy, archive_artifact};
pub use services::hooks::PostActionRegistry;
pub use services::inject::{DEFAULT_VERSION_SYMBOL, inject_version_flag};
pub use services::version::{FALLBACK_VERSION, VersionResolver};

use std::result;

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    InvalidInput(String),
    Context(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::Context(msg) => write!(f, "Invalid build context: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Context(err.to_string())
    }
}

pub type Result<T> = result::Result<T, Error>;
