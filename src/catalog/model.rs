//! Catalog model
//!
//! Weeks are numbered from 1 by their position in the catalog file, so the
//! numbering is always contiguous.

use serde::{Deserialize, Serialize};

/// A single weekly unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    /// Week number (1-indexed, assigned from position)
    #[serde(skip)]
    pub number: u32,
    /// Topics practiced this week
    #[serde(default)]
    pub topics: Vec<String>,
    /// Problem identifiers, in catalog order
    #[serde(default)]
    pub problems: Vec<String>,
}

impl Week {
    /// Create a new week
    pub fn new<T, P>(number: u32, topics: T, problems: P) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            number,
            topics: topics.into_iter().map(Into::into).collect(),
            problems: problems.into_iter().map(Into::into).collect(),
        }
    }

    /// Does this week contain the given problem?
    pub fn contains(&self, problem: &str) -> bool {
        self.problems.iter().any(|p| p == problem)
    }

    /// Label used for the completion badge of this week
    pub fn badge(&self) -> String {
        format!("Week {} Complete", self.number)
    }

    /// Comma-separated topic list for display
    pub fn topic_summary(&self) -> String {
        self.topics.join(", ")
    }
}

/// The full challenge catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Weeks in order
    pub weeks: Vec<Week>,
}

impl Catalog {
    /// Build a catalog, numbering weeks by position
    pub fn new(weeks: Vec<Week>) -> Self {
        let mut catalog = Self { weeks };
        catalog.renumber();
        catalog
    }

    /// Assign contiguous 1-based week numbers
    pub(crate) fn renumber(&mut self) {
        for (idx, week) in self.weeks.iter_mut().enumerate() {
            week.number = idx as u32 + 1;
        }
    }

    /// Number of weeks
    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    /// Get a week by its 1-based number
    pub fn week(&self, number: u32) -> Option<&Week> {
        let idx = (number as usize).checked_sub(1)?;
        self.weeks.get(idx)
    }
}
