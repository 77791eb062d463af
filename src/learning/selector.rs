//! Problem of the day selection
//!
//! Problems whose identifier mentions a weak topic are preferred; otherwise
//! any remaining problem of the week is equally likely.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::catalog::Week;
use crate::config::progress::ProgressDocument;

/// Result of selecting a problem for a week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// Every problem of the week is completed
    WeekComplete,
    /// Problem to work on
    Problem(&'a str),
}

impl<'a> Selection<'a> {
    /// The selected problem, if any
    pub fn problem(&self) -> Option<&'a str> {
        match self {
            Selection::WeekComplete => None,
            Selection::Problem(p) => Some(*p),
        }
    }
}

/// Problems of the week not yet completed, in catalog order
pub fn remaining_problems<'a>(week: &'a Week, completed: &[String]) -> Vec<&'a str> {
    week.problems
        .iter()
        .filter(|p| !completed.contains(*p))
        .map(String::as_str)
        .collect()
}

/// Remaining problems whose identifier contains a weak topic
fn weak_topic_candidates<'a>(remaining: &[&'a str], progress: &ProgressDocument) -> Vec<&'a str> {
    remaining
        .iter()
        .copied()
        .filter(|p| progress.weak_topics.keys().any(|topic| p.contains(topic.as_str())))
        .collect()
}

/// Choose a problem for the week
pub fn select_problem<'a, R: Rng + ?Sized>(
    week: &'a Week,
    progress: &ProgressDocument,
    rng: &mut R,
) -> Selection<'a> {
    let remaining = remaining_problems(week, &progress.completed_problems);
    if remaining.is_empty() {
        return Selection::WeekComplete;
    }

    let weak = weak_topic_candidates(&remaining, progress);
    let pool = if weak.is_empty() { &remaining } else { &weak };

    match pool.choose(rng) {
        Some(problem) => Selection::Problem(*problem),
        None => Selection::WeekComplete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn week() -> Week {
        Week::new(1, ["arrays", "stack"], ["two-sum", "valid-parentheses", "min-stack"])
    }

    #[test]
    fn remaining_preserves_catalog_order() {
        let completed = vec!["valid-parentheses".to_string()];
        assert_eq!(remaining_problems(&week(), &completed), vec!["two-sum", "min-stack"]);
    }

    #[test]
    fn all_completed_means_week_complete() {
        let week = week();
        let progress =
            ProgressDocument { completed_problems: week.problems.clone(), ..Default::default() };
        let mut rng = StdRng::seed_from_u64(7);

        let selection = select_problem(&week, &progress, &mut rng);
        assert_eq!(selection, Selection::WeekComplete);
        assert!(selection.problem().is_none());
    }

    #[test]
    fn completed_problems_are_never_selected() {
        let week = week();
        let progress = ProgressDocument {
            completed_problems: vec!["two-sum".into(), "min-stack".into()],
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..50 {
            assert_eq!(
                select_problem(&week, &progress, &mut rng),
                Selection::Problem("valid-parentheses")
            );
        }
    }

    #[test]
    fn weak_topics_bias_selection() {
        let week = week();
        let mut progress = ProgressDocument::default();
        progress.weak_topics.insert("stack".into(), 2);
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..50 {
            assert_eq!(select_problem(&week, &progress, &mut rng), Selection::Problem("min-stack"));
        }
    }

    #[test]
    fn weak_topics_without_matching_problems_fall_back_to_all() {
        let week = week();
        let mut progress = ProgressDocument::default();
        progress.weak_topics.insert("graphs".into(), 5);
        let mut rng = StdRng::seed_from_u64(11);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(select_problem(&week, &progress, &mut rng).problem().unwrap());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn selection_is_uniform_without_weak_topics() {
        let week = week();
        let progress = ProgressDocument::default();
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 9_000;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for _ in 0..draws {
            let problem = select_problem(&week, &progress, &mut rng).problem().unwrap();
            *counts.entry(problem).or_default() += 1;
        }

        assert_eq!(counts.len(), 3);
        for (problem, count) in counts {
            let frequency = count as f64 / draws as f64;
            assert!(
                (frequency - 1.0 / 3.0).abs() < 0.03,
                "{} drawn with frequency {}",
                problem,
                frequency
            );
        }
    }
}
