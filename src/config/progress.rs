//! Progress tracking for the learner
//!
//! The progress document is the single persisted record of cumulative
//! learner state. It is read once when a session opens and rewritten in
//! full after every credited validation.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{PersistenceError, write_json};
use crate::learning::xp_level;

/// Cumulative learner state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressDocument {
    /// Problems marked done, in completion order (repeats allowed)
    pub completed_problems: Vec<String>,

    /// Cumulative score
    pub points: u32,

    /// Consecutive days with at least one validation
    pub streak: u32,

    /// Date of the last validation
    pub last_solved_date: Option<NaiveDate>,

    /// Earned milestone labels
    pub badges: Vec<String>,

    /// Topic -> number of reviews that reported problems
    pub weak_topics: BTreeMap<String, u32>,

    /// Problem -> minutes spent on the last attempt
    pub time_spent: BTreeMap<String, f64>,

    /// Level derived from points
    pub xp_level: u32,
}

impl Default for ProgressDocument {
    fn default() -> Self {
        Self {
            completed_problems: Vec::new(),
            points: 0,
            streak: 0,
            last_solved_date: None,
            badges: Vec::new(),
            weak_topics: BTreeMap::new(),
            time_spent: BTreeMap::new(),
            xp_level: 1,
        }
    }
}

/// Why a progress document could not be loaded
#[derive(Debug, Error)]
pub enum ProgressLoadError {
    /// No progress file yet (first run)
    #[error("Progress file does not exist")]
    Missing,

    /// The file exists but could not be read
    #[error("Failed to read progress: {0}")]
    Read(#[source] std::io::Error),

    /// The file is not a valid progress document
    #[error("Failed to parse progress.json: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ProgressDocument {
    /// Load progress from disk
    pub fn load(path: &Path) -> Result<Self, ProgressLoadError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ProgressLoadError::Missing,
            _ => ProgressLoadError::Read(e),
        })?;
        let mut progress: Self = serde_json::from_str(&contents)?;
        // The level is derived, so a stale or missing value is corrected here
        progress.xp_level = xp_level(progress.points);
        Ok(progress)
    }

    /// Load progress from disk, falling back to a fresh document
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(progress) => {
                tracing::debug!("Loaded progress from {:?}", path);
                progress
            }
            Err(ProgressLoadError::Missing) => {
                tracing::debug!("No progress at {:?}, starting fresh", path);
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable progress at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save progress to disk, replacing the previous document
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        write_json(path, self, "progress")
    }

    /// Has the problem been completed at least once?
    pub fn has_completed(&self, problem: &str) -> bool {
        self.completed_problems.iter().any(|p| p == problem)
    }

    /// Has the badge been earned?
    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.iter().any(|b| b == badge)
    }

    /// Weak topics sorted by descending count
    pub fn weakest_topics(&self) -> Vec<(&str, u32)> {
        let mut topics: Vec<_> = self.weak_topics.iter().map(|(t, c)| (t.as_str(), *c)).collect();
        topics.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        topics
    }

    /// Total minutes recorded across problems
    pub fn total_minutes(&self) -> f64 {
        self.time_spent.values().sum()
    }
}
