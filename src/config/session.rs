//! Session state persistence
//!
//! Remembers the last selected week and language, and pins the problem of
//! the day per week so it stays stable across invocations.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::coach::Language;
use crate::error::{PersistenceError, write_json};

/// Problem chosen for a week on a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedProblem {
    /// Problem identifier
    pub problem: String,
    /// Calendar day the pin is valid for
    pub date: NaiveDate,
    /// When the problem was first presented
    pub started_at: DateTime<Utc>,
}

/// All session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Last selected week
    #[serde(default = "default_week")]
    pub week: u32,
    /// Last selected language
    #[serde(default)]
    pub language: Option<Language>,
    /// Pinned daily problem per week number
    #[serde(default)]
    pub pins: BTreeMap<u32, PinnedProblem>,
}

fn default_week() -> u32 {
    1
}

impl Default for SessionState {
    fn default() -> Self {
        Self { week: default_week(), language: None, pins: BTreeMap::new() }
    }
}

impl SessionState {
    /// Load session from disk, starting fresh if it is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to read session from {:?}: {}", path, e);
                }
                return Self::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable session at {:?}: {}", path, e);
            Self::default()
        })
    }

    /// Save session to disk
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        write_json(path, self, "session")
    }

    /// Get the pin for a week if it was made on `today`
    pub fn pinned(&self, week: u32, today: NaiveDate) -> Option<&PinnedProblem> {
        self.pins.get(&week).filter(|pin| pin.date == today)
    }

    /// Get the pin for a week whatever day it was made
    pub fn presented(&self, week: u32) -> Option<&PinnedProblem> {
        self.pins.get(&week)
    }

    /// Pin a problem for a week
    pub fn pin(
        &mut self,
        week: u32,
        problem: impl Into<String>,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) {
        let pin = PinnedProblem { problem: problem.into(), date: today, started_at: now };
        self.pins.insert(week, pin);
    }

    /// Remove the pin for a week, returning whether one existed
    pub fn unpin(&mut self, week: u32) -> bool {
        self.pins.remove(&week).is_some()
    }
}
