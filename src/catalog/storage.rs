//! Catalog loading
//!
//! The catalog file has the shape `{ "weeks": [ { "topics": [..], "problems": [..] } ] }`.
//! It is read once at startup and never written.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::Catalog;

/// Errors raised while loading the challenge catalog
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// The catalog file could not be read
    #[error("Failed to read challenge catalog from {path:?}: {source}")]
    Read {
        /// Catalog path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The catalog file is not valid
    #[error("Failed to parse challenge catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog has no weeks at all
    #[error("Challenge catalog contains no weeks")]
    Empty,

    /// A problem identifier appears twice within one week
    #[error("Problem '{problem}' is listed more than once in week {week}")]
    DuplicateProblem {
        /// Week number
        week: u32,
        /// Repeated identifier
        problem: String,
    },
}

impl Catalog {
    /// Load the catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| CatalogLoadError::Read { path: path.to_path_buf(), source })?;
        let catalog = Self::from_json(&contents)?;

        tracing::debug!(
            "Loaded catalog from {:?}: {} weeks, {} problems",
            path,
            catalog.week_count(),
            catalog.weeks.iter().map(|w| w.problems.len()).sum::<usize>()
        );

        Ok(catalog)
    }

    /// Parse and validate a catalog from JSON text
    pub fn from_json(contents: &str) -> Result<Self, CatalogLoadError> {
        let mut catalog: Catalog = serde_json::from_str(contents)?;
        catalog.renumber();
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogLoadError> {
        if self.weeks.is_empty() {
            return Err(CatalogLoadError::Empty);
        }

        for week in &self.weeks {
            let mut seen = HashSet::new();
            for problem in &week.problems {
                if !seen.insert(problem.as_str()) {
                    return Err(CatalogLoadError::DuplicateProblem {
                        week: week.number,
                        problem: problem.clone(),
                    });
                }
            }
            if week.problems.is_empty() {
                tracing::warn!("Week {} has no problems", week.number);
            }
        }

        Ok(())
    }
}
