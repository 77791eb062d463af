//! Error types shared across the coach
//!
//! Each I/O boundary has its own error: catalog loading, the coaching
//! service, and progress persistence. [`Error`] gathers them so callers
//! can branch on what went wrong instead of assuming success.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CatalogLoadError;
use crate::coach::CoachError;

/// Errors that can occur while running a coaching session
#[derive(Debug, Error)]
pub enum Error {
    /// Required configuration (such as the API key) is unavailable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The challenge catalog could not be loaded
    #[error(transparent)]
    CatalogLoad(#[from] CatalogLoadError),

    /// The coaching service call failed
    #[error("Coaching service failed: {0}")]
    Upstream(#[from] CoachError),

    /// Progress could not be written to disk
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Requested week is outside the catalog
    #[error("Week {week} does not exist (the catalog has {count} weeks)")]
    UnknownWeek {
        /// Requested week number
        week: u32,
        /// Number of weeks in the catalog
        count: usize,
    },

    /// Requested problem is not part of the week
    #[error("Problem '{problem}' is not part of week {week}")]
    UnknownProblem {
        /// Week number
        week: u32,
        /// Requested problem identifier
        problem: String,
    },

    /// Every problem in the week has already been completed
    #[error("All problems for week {0} are completed")]
    WeekComplete(u32),

    /// Validation was requested without any code
    #[error("Nothing to validate: the submitted code is empty")]
    EmptySubmission,
}

impl Error {
    /// Whether this error must stop the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Configuration(_) | Error::CatalogLoad(_))
    }

    /// Build a configuration error from a coaching client failure
    pub(crate) fn configuration(err: CoachError) -> Self {
        Error::Configuration(err.to_string())
    }
}

/// Failure to persist a document to disk
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem operation failed
    #[error("Failed to write {path:?}: {source}")]
    Io {
        /// File or directory being written
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Document could not be serialized
    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        /// Which document was being serialized
        what: &'static str,
        /// Underlying serde error
        source: serde_json::Error,
    },
}

/// Write `value` as pretty JSON to `path`, replacing any previous contents
pub(crate) fn write_json<T: serde::Serialize>(
    path: &std::path::Path,
    value: &T,
    what: &'static str,
) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|source| PersistenceError::Io { path: parent.to_path_buf(), source })?;
    }

    let contents = serde_json::to_string_pretty(value)
        .map_err(|source| PersistenceError::Serialize { what, source })?;

    std::fs::write(path, contents)
        .map_err(|source| PersistenceError::Io { path: path.to_path_buf(), source })
}
