//! Crediting a completed validation
//!
//! Applies points, streak, weak-topic, level, time and badge changes to the
//! progress document. Persisting the result is the caller's job.

use std::time::Duration;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::Week;
use crate::config::progress::ProgressDocument;

/// Points granted for each credited validation
pub const POINTS_PER_VALIDATION: u32 = 10;

/// Points needed per level
pub const POINTS_PER_LEVEL: u32 = 50;

/// Review wording that marks a submission as flawed (compiled once)
static REVIEW_FLAW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)incorrect|error").unwrap());

/// A validation that the coach has reviewed
#[derive(Debug, Clone)]
pub struct ValidationEvent<'a> {
    /// Week the problem belongs to
    pub week: &'a Week,
    /// Problem that was validated
    pub problem: &'a str,
    /// Review text returned by the coach
    pub review: &'a str,
    /// Time between presenting the problem and submitting code
    pub elapsed: Duration,
    /// Local calendar day of the validation
    pub today: NaiveDate,
}

/// What changed as a result of a validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    /// Points added
    pub points_awarded: u32,
    /// Streak after the update
    pub streak: u32,
    /// Minutes recorded for the problem
    pub minutes: f64,
    /// Topics whose weakness counter was incremented
    pub flagged_topics: Vec<String>,
    /// Level after the update, if it increased
    pub new_level: Option<u32>,
    /// Badge earned by this validation
    pub badge: Option<String>,
}

/// Level for a point total
pub fn xp_level(points: u32) -> u32 {
    1 + points / POINTS_PER_LEVEL
}

/// Streak after solving on `today`
///
/// Solving the day after the previous solve extends the streak; anything
/// else (first solve, same day, or a gap) starts over at 1.
pub fn next_streak(last_solved: Option<NaiveDate>, streak: u32, today: NaiveDate) -> u32 {
    match last_solved {
        Some(last) if last.succ_opt() == Some(today) => streak.saturating_add(1),
        _ => 1,
    }
}

/// Does the review text point out a mistake?
pub fn review_reports_errors(review: &str) -> bool {
    REVIEW_FLAW_RE.is_match(review)
}

/// Minutes rounded to two decimals
fn rounded_minutes(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() / 60.0 * 100.0).round() / 100.0
}

/// Apply a reviewed validation to the progress document
pub fn apply_validation(
    progress: &mut ProgressDocument,
    event: &ValidationEvent<'_>,
) -> ValidationOutcome {
    let previous_level = progress.xp_level;

    progress.completed_problems.push(event.problem.to_string());
    progress.points = progress.points.saturating_add(POINTS_PER_VALIDATION);

    let minutes = rounded_minutes(event.elapsed);
    progress.time_spent.insert(event.problem.to_string(), minutes);

    progress.streak = next_streak(progress.last_solved_date, progress.streak, event.today);
    progress.last_solved_date = Some(event.today);

    let mut flagged_topics = Vec::new();
    if review_reports_errors(event.review) {
        for topic in &event.week.topics {
            *progress.weak_topics.entry(topic.clone()).or_insert(0) += 1;
            flagged_topics.push(topic.clone());
        }
    }

    progress.xp_level = xp_level(progress.points);

    let mut badge = None;
    let week_done = event.week.problems.iter().all(|p| progress.has_completed(p));
    if week_done {
        let label = event.week.badge();
        if !progress.has_badge(&label) {
            progress.badges.push(label.clone());
            badge = Some(label);
        }
    }

    ValidationOutcome {
        points_awarded: POINTS_PER_VALIDATION,
        streak: progress.streak,
        minutes,
        flagged_topics,
        new_level: (progress.xp_level > previous_level).then_some(progress.xp_level),
        badge,
    }
}
