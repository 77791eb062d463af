//! Plain-text reports for the command line and shell

use std::fmt::Write;

use textwrap::{Options, wrap};

use crate::app::session::{Hints, ValidationReport};
use crate::catalog::{Catalog, Week};
use crate::config::progress::ProgressDocument;
use crate::learning::remaining_problems;

/// Default wrap width for coach text
pub const DEFAULT_WIDTH: usize = 88;

/// Wrap free text, keeping existing line breaks and indentation
pub fn wrap_text(text: &str, width: usize) -> String {
    let mut out = String::new();
    for line in text.lines() {
        let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
        let opts = Options::new(width.max(20)).subsequent_indent(&indent);
        let wrapped = wrap(line, opts);
        if wrapped.is_empty() {
            out.push('\n');
        }
        for piece in wrapped {
            out.push_str(&piece);
            out.push('\n');
        }
    }
    out
}

/// Heading for the selected week and its problem of the day
pub fn daily_problem(week: &Week, problem: Option<&str>) -> String {
    match problem {
        Some(problem) => {
            let topics = week.topic_summary();
            format!("Week {}: {}\nToday's Problem: {}\n", week.number, topics, problem)
        }
        None => format!("All problems for week {} are completed!\n", week.number),
    }
}

/// Hints section
pub fn hints(hints: &Hints, width: usize) -> String {
    format!("Step-by-Step Hints for '{}'\n\n{}", hints.problem, wrap_text(&hints.text, width))
}

/// Review section followed by what changed in progress
pub fn validation(report: &ValidationReport, width: usize) -> String {
    let mut out = format!("Code Review & Feedback\n\n{}\n", wrap_text(&report.review, width));

    match &report.outcome {
        None => {
            let _ = writeln!(
                out,
                "'{}' was already completed; this attempt earned no points.",
                report.problem
            );
        }
        Some(outcome) => {
            let _ = writeln!(
                out,
                "'{}' marked as completed! +{} points ({:.2} min)",
                report.problem, outcome.points_awarded, outcome.minutes
            );
            let _ = writeln!(out, "Streak: {} days", outcome.streak);
            if !outcome.flagged_topics.is_empty() {
                let _ = writeln!(out, "Weak topics noted: {}", outcome.flagged_topics.join(", "));
            }
            if let Some(level) = outcome.new_level {
                let _ = writeln!(out, "Level up! You are now level {}", level);
            }
            if let Some(badge) = &outcome.badge {
                let _ = writeln!(out, "*** Badge earned: {}! ***", badge);
            }
        }
    }

    out
}

/// Progress overview with weak topics and time spent
pub fn stats(progress: &ProgressDocument) -> String {
    let mut out = String::from("Progress Overview\n");
    let _ = writeln!(out, "Points: {}, XP Level: {}", progress.points, progress.xp_level);
    let _ = writeln!(out, "Streak: {} days", progress.streak);
    let badges =
        if progress.badges.is_empty() { "None".to_string() } else { progress.badges.join(", ") };
    let _ = writeln!(out, "Badges: {}", badges);

    if !progress.weak_topics.is_empty() {
        out.push_str("\nWeak Topics\n");
        let width = progress.weak_topics.keys().map(|k| k.len()).max().unwrap_or(0);
        for (topic, count) in progress.weakest_topics() {
            let _ = writeln!(out, "  {:<width$}  {:>3} {}", topic, count, bar(count as f64, 1.0));
        }
    }

    if !progress.time_spent.is_empty() {
        out.push_str("\nTime Spent per Problem (minutes)\n");
        let width = progress.time_spent.keys().map(|k| k.len()).max().unwrap_or(0);
        for (problem, minutes) in &progress.time_spent {
            let _ = writeln!(out, "  {:<width$}  {:>6.2} {}", problem, minutes, bar(*minutes, 1.0));
        }
        let _ = writeln!(out, "  Total: {:.2} min", progress.total_minutes());
    }

    out
}

/// One line per week with completion counts
pub fn weeks(catalog: &Catalog, progress: &ProgressDocument) -> String {
    let mut out = String::new();
    for week in &catalog.weeks {
        let total = week.problems.len();
        let done = total - remaining_problems(week, &progress.completed_problems).len();
        let marker = if progress.has_badge(&week.badge()) { " *" } else { "" };
        let _ = writeln!(
            out,
            "Week {}: {} ({}/{} done){}",
            week.number,
            week.topic_summary(),
            done,
            total,
            marker
        );
    }
    out
}

/// Text bar, one block per `unit`, capped at 40
fn bar(value: f64, unit: f64) -> String {
    let blocks = ((value / unit).round().max(0.0) as usize).min(40);
    "#".repeat(blocks)
}
