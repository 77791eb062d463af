//! Coaching session
//!
//! A [`Session`] owns everything one learner interaction needs: the
//! configuration, the coach, the catalog, the progress document and the
//! session state. It is opened once at startup and passed to every action.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};

use crate::catalog::{Catalog, Week};
use crate::coach::{ApiKeyManager, Coach, CoachClient, Language};
use crate::config::progress::ProgressDocument;
use crate::config::session::SessionState;
use crate::config::{self, Config};
use crate::error::Error;
use crate::learning::{
    Selection, ValidationEvent, ValidationOutcome, apply_validation, select_problem,
};

/// Hints generated for the problem of the day
#[derive(Debug, Clone)]
pub struct Hints {
    /// Week number
    pub week: u32,
    /// Problem the hints are for
    pub problem: String,
    /// Text returned by the coach
    pub text: String,
}

/// Result of validating submitted code
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Week number
    pub week: u32,
    /// Problem that was validated
    pub problem: String,
    /// Review text returned by the coach
    pub review: String,
    /// Progress changes, or `None` when the attempt was not credited
    pub outcome: Option<ValidationOutcome>,
}

/// A learner's coaching session
pub struct Session<C> {
    config: Config,
    coach: C,
    catalog: Catalog,
    progress: ProgressDocument,
    state: SessionState,
    progress_path: PathBuf,
    session_path: PathBuf,
    clock: fn() -> DateTime<Local>,
}

impl Session<CoachClient> {
    /// Open a session backed by the remote coaching service
    ///
    /// The API key is resolved before anything else is touched; without it
    /// the session cannot start.
    pub fn open(config: Config, data_dir: &Path) -> Result<Self, Error> {
        let api_key = ApiKeyManager::resolve(&config.api_key_env, config.use_keyring)
            .map_err(Error::configuration)?;
        let coach = CoachClient::new(api_key, &config).map_err(Error::configuration)?;
        Self::with_coach(coach, config, data_dir)
    }
}

impl<C: Coach> Session<C> {
    /// Open a session with the given coach
    pub fn with_coach(coach: C, config: Config, data_dir: &Path) -> Result<Self, Error> {
        let catalog = Catalog::load(&config.catalog_path)?;

        let progress_path = config::progress_path(data_dir);
        let session_path = config::session_path(data_dir);
        let progress = ProgressDocument::load_or_default(&progress_path);
        let state = SessionState::load_or_default(&session_path);

        tracing::debug!(
            "Session opened: {} weeks, {} points, level {}",
            catalog.week_count(),
            progress.points,
            progress.xp_level
        );

        Ok(Self {
            config,
            coach,
            catalog,
            progress,
            state,
            progress_path,
            session_path,
            clock: Local::now,
        })
    }

    /// Replace the clock used for dates and elapsed time
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    /// Session configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Challenge catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current progress
    pub fn progress(&self) -> &ProgressDocument {
        &self.progress
    }

    /// Persisted session state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Get a week by number
    pub fn week(&self, number: u32) -> Result<&Week, Error> {
        lookup_week(&self.catalog, number)
    }

    /// Last selected week, clamped to the catalog
    pub fn current_week(&self) -> u32 {
        if self.catalog.week(self.state.week).is_some() { self.state.week } else { 1 }
    }

    /// Last selected language, or the configured default
    pub fn current_language(&self) -> Language {
        self.state.language.unwrap_or(self.config.default_language)
    }

    /// Remember the selected week
    pub fn select_week(&mut self, number: u32) -> Result<(), Error> {
        lookup_week(&self.catalog, number)?;
        if self.state.week != number {
            self.state.week = number;
            self.state.save(&self.session_path)?;
        }
        Ok(())
    }

    /// Remember the selected language
    pub fn select_language(&mut self, language: Language) -> Result<(), Error> {
        if self.state.language != Some(language) {
            self.state.language = Some(language);
            self.state.save(&self.session_path)?;
        }
        Ok(())
    }

    /// Problem of the day for a week, or `None` when the week is complete
    ///
    /// The choice is pinned for the rest of the day and only re-rolled once
    /// the pinned problem has been completed.
    pub fn daily_problem(&mut self, number: u32) -> Result<Option<String>, Error> {
        let now = (self.clock)();
        let today = now.date_naive();
        let week = lookup_week(&self.catalog, number)?;

        if let Some(pin) = self.state.pinned(number, today) {
            if week.contains(&pin.problem) && !self.progress.has_completed(&pin.problem) {
                return Ok(Some(pin.problem.clone()));
            }
        }

        match select_problem(week, &self.progress, &mut rand::rng()) {
            Selection::WeekComplete => {
                if self.state.unpin(number) {
                    self.state.save(&self.session_path)?;
                }
                Ok(None)
            }
            Selection::Problem(problem) => {
                let problem = problem.to_string();
                self.state.pin(number, problem.clone(), now.with_timezone(&Utc), today);
                self.state.save(&self.session_path)?;
                tracing::info!(week = number, problem = %problem, "Pinned problem of the day");
                Ok(Some(problem))
            }
        }
    }

    /// Ask the coach for hints on the problem of the day
    pub async fn hints(&mut self, number: u32, language: Language) -> Result<Hints, Error> {
        let problem = self.daily_problem(number)?.ok_or(Error::WeekComplete(number))?;

        let text = self.coach.hints(&problem, language).await.inspect_err(|e| {
            tracing::warn!(problem = %problem, "Hint request failed: {}", e);
        })?;

        Ok(Hints { week: number, problem, text })
    }

    /// Have the coach review code and credit the attempt
    ///
    /// Without `problem`, the problem of the day is validated. Progress is
    /// only changed after the review arrives and the document has been
    /// written; any failure leaves the in-memory progress untouched.
    pub async fn validate(
        &mut self,
        number: u32,
        language: Language,
        code: &str,
        problem: Option<&str>,
    ) -> Result<ValidationReport, Error> {
        if code.trim().is_empty() {
            return Err(Error::EmptySubmission);
        }

        let problem = match problem {
            Some(problem) => {
                if !lookup_week(&self.catalog, number)?.contains(problem) {
                    let problem = problem.to_string();
                    return Err(Error::UnknownProblem { week: number, problem });
                }
                problem.to_string()
            }
            None => match self.presented_problem(number)? {
                Some(problem) => problem,
                None => self.daily_problem(number)?.ok_or(Error::WeekComplete(number))?,
            },
        };

        let review = self.coach.review(&problem, code, language).await.inspect_err(|e| {
            tracing::warn!(problem = %problem, "Review request failed: {}", e);
        })?;

        if !self.config.allow_repeat_credit && self.progress.has_completed(&problem) {
            tracing::info!(problem = %problem, "Repeat validation not credited");
            return Ok(ValidationReport { week: number, problem, review, outcome: None });
        }

        let now = (self.clock)();
        let elapsed = self
            .state
            .pins
            .get(&number)
            .filter(|pin| pin.problem == problem)
            .and_then(|pin| (now.with_timezone(&Utc) - pin.started_at).to_std().ok())
            .unwrap_or_default();

        let week = lookup_week(&self.catalog, number)?;
        let mut updated = self.progress.clone();
        let outcome = apply_validation(
            &mut updated,
            &ValidationEvent {
                week,
                problem: &problem,
                review: &review,
                elapsed,
                today: now.date_naive(),
            },
        );

        updated.save(&self.progress_path)?;
        self.progress = updated;

        tracing::info!(
            problem = %problem,
            points = self.progress.points,
            streak = self.progress.streak,
            "Validation recorded"
        );

        if self.state.pins.get(&number).is_some_and(|pin| pin.problem == problem) {
            self.state.unpin(number);
            if let Err(e) = self.state.save(&self.session_path) {
                tracing::warn!("Failed to save session state: {}", e);
            }
        }

        Ok(ValidationReport { week: number, problem, review, outcome: Some(outcome) })
    }

    /// Problem last shown for a week, even if it was pinned on an earlier day
    fn presented_problem(&self, number: u32) -> Result<Option<String>, Error> {
        let week = lookup_week(&self.catalog, number)?;
        Ok(self
            .state
            .presented(number)
            .filter(|pin| week.contains(&pin.problem) && !self.progress.has_completed(&pin.problem))
            .map(|pin| pin.problem.clone()))
    }

    /// Flush session state to disk
    ///
    /// Progress is written by each credited validation and never here, so a
    /// document that failed to load is left as it was.
    pub fn close(self) -> Result<(), Error> {
        self.state.save(&self.session_path)?;
        tracing::debug!("Session closed");
        Ok(())
    }
}

fn lookup_week(catalog: &Catalog, number: u32) -> Result<&Week, Error> {
    catalog.week(number).ok_or(Error::UnknownWeek { week: number, count: catalog.week_count() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coach::CoachError;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const CATALOG: &str = r#"{
        "weeks": [
            { "topics": ["arrays", "linked-list"], "problems": ["two-sum", "reverse-list"] },
            { "topics": ["trees"], "problems": ["tree-depth"] }
        ]
    }"#;

    /// Coach that replays canned replies and records prompts
    #[derive(Default)]
    struct ScriptedCoach {
        replies: Mutex<VecDeque<Result<String, CoachError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedCoach {
        fn replying(replies: Vec<Result<String, CoachError>>) -> Self {
            Self { replies: Mutex::new(replies.into()), prompts: Mutex::default() }
        }

        fn prompt_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    impl Coach for ScriptedCoach {
        async fn complete(&self, prompt: &str, _language: Language) -> Result<String, CoachError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies.lock().unwrap().pop_front().unwrap_or(Err(CoachError::EmptyCompletion))
        }
    }

    fn morning() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()
    }

    fn quarter_hour_later() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 10, 9, 15, 0).unwrap()
    }

    fn late() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 10, 23, 50, 0).unwrap()
    }

    fn after_midnight() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 11, 0, 10, 0).unwrap()
    }

    fn next_morning() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 11, 9, 0, 0).unwrap()
    }

    struct Fixture {
        dir: TempDir,
        config: Config,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let catalog_path = dir.path().join("challenges.json");
            std::fs::write(&catalog_path, CATALOG).unwrap();
            let config = Config { catalog_path, use_keyring: false, ..Config::default() };
            Self { dir, config }
        }

        fn data_dir(&self) -> PathBuf {
            self.dir.path().join("data")
        }

        fn session(&self, coach: ScriptedCoach) -> Session<ScriptedCoach> {
            Session::with_coach(coach, self.config.clone(), &self.data_dir())
                .unwrap()
                .with_clock(morning)
        }
    }

    fn ok(text: &str) -> Result<String, CoachError> {
        Ok(text.to_string())
    }

    #[test]
    fn missing_credential_fails_before_catalog_is_loaded() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            api_key_env: "DSA_COACH_TEST_KEY_THAT_IS_NEVER_SET".into(),
            use_keyring: false,
            catalog_path: dir.path().join("missing-catalog.json"),
            ..Config::default()
        };

        let err = Session::open(config, &dir.path().join("data")).err().unwrap();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.is_fatal());
        assert!(!dir.path().join("data").exists());
    }

    #[test]
    fn missing_catalog_is_fatal() {
        let fixture = Fixture::new();
        let config = Config {
            catalog_path: fixture.dir.path().join("nope.json"),
            ..fixture.config.clone()
        };

        let err = Session::with_coach(ScriptedCoach::default(), config, &fixture.data_dir())
            .err()
            .unwrap();
        assert!(matches!(err, Error::CatalogLoad(_)));
    }

    #[test]
    fn fresh_session_starts_with_default_progress() {
        let fixture = Fixture::new();
        let session = fixture.session(ScriptedCoach::default());

        assert_eq!(session.progress(), &ProgressDocument::default());
        assert_eq!(session.current_week(), 1);
        assert_eq!(session.current_language(), Language::Python);
    }

    #[test]
    fn unknown_week_is_rejected() {
        let fixture = Fixture::new();
        let mut session = fixture.session(ScriptedCoach::default());

        assert!(matches!(session.week(3), Err(Error::UnknownWeek { week: 3, count: 2 })));
        assert!(matches!(session.daily_problem(0), Err(Error::UnknownWeek { .. })));
        assert!(matches!(session.select_week(9), Err(Error::UnknownWeek { .. })));
    }

    #[test]
    fn daily_problem_is_stable_within_a_day() {
        let fixture = Fixture::new();
        let mut session = fixture.session(ScriptedCoach::default());

        let first = session.daily_problem(1).unwrap().unwrap();
        for _ in 0..20 {
            assert_eq!(session.daily_problem(1).unwrap().unwrap(), first);
        }

        // A reopened session sees the same pin
        let mut reopened = fixture.session(ScriptedCoach::default());
        assert_eq!(reopened.daily_problem(1).unwrap().unwrap(), first);
    }

    #[test]
    fn pin_is_replaced_the_next_day() {
        let fixture = Fixture::new();
        let mut session = fixture.session(ScriptedCoach::default());
        session.daily_problem(1).unwrap();

        let mut session = session.with_clock(next_morning);
        session.daily_problem(1).unwrap();
        let pin = session.state().pins.get(&1).unwrap();
        assert_eq!(pin.date, next_morning().date_naive());
    }

    #[tokio::test]
    async fn two_step_week_scenario() {
        let fixture = Fixture::new();
        let coach = ScriptedCoach::replying(vec![ok("Looks good."), ok("Error: off-by-one")]);
        let mut session = fixture.session(coach);

        let first = session
            .validate(1, Language::Python, "def two_sum(): pass", Some("two-sum"))
            .await
            .unwrap();
        let outcome = first.outcome.unwrap();
        assert_eq!(session.progress().points, 10);
        assert_eq!(session.progress().completed_problems, vec!["two-sum"]);
        assert_eq!(session.progress().streak, 1);
        assert!(session.progress().weak_topics.is_empty());
        assert_eq!(outcome.badge, None);

        let second = session
            .validate(1, Language::Python, "def reverse(): pass", Some("reverse-list"))
            .await
            .unwrap();
        assert_eq!(second.review, "Error: off-by-one");
        assert_eq!(second.outcome.unwrap().badge.as_deref(), Some("Week 1 Complete"));
        assert_eq!(session.progress().points, 20);
        assert_eq!(session.progress().weak_topics.get("arrays"), Some(&1));
        assert_eq!(session.progress().weak_topics.get("linked-list"), Some(&1));
        assert_eq!(session.progress().badges, vec!["Week 1 Complete"]);

        // Every credited validation is on disk
        let on_disk =
            ProgressDocument::load(&config::progress_path(&fixture.data_dir())).unwrap();
        assert_eq!(&on_disk, session.progress());

        // Nothing left to do this week
        assert_eq!(session.daily_problem(1).unwrap(), None);
        let err = session.validate(1, Language::Python, "x = 1", None).await.unwrap_err();
        assert!(matches!(err, Error::WeekComplete(1)));
    }

    #[tokio::test]
    async fn validating_the_daily_problem_rolls_to_the_next() {
        let fixture = Fixture::new();
        let coach = ScriptedCoach::replying(vec![ok("fine")]);
        let mut session = fixture.session(coach);

        let pinned = session.daily_problem(1).unwrap().unwrap();
        let report = session.validate(1, Language::Java, "class A {}", None).await.unwrap();
        assert_eq!(report.problem, pinned);
        assert!(session.state().pins.get(&1).is_none());

        let next = session.daily_problem(1).unwrap().unwrap();
        assert_ne!(next, pinned);
    }

    #[tokio::test]
    async fn elapsed_time_runs_from_presentation() {
        let fixture = Fixture::new();
        let coach = ScriptedCoach::replying(vec![ok("fine")]);
        let mut session = fixture.session(coach);

        let problem = session.daily_problem(2).unwrap().unwrap();
        let mut session = session.with_clock(quarter_hour_later);
        session.validate(2, Language::Python, "print(1)", None).await.unwrap();

        assert_eq!(session.progress().time_spent.get(&problem), Some(&15.0));
    }

    #[tokio::test]
    async fn upstream_failure_leaves_progress_untouched() {
        let fixture = Fixture::new();
        let coach = ScriptedCoach::replying(vec![Err(CoachError::ApiError {
            status: 503,
            message: "unavailable".into(),
        })]);
        let mut session = fixture.session(coach);

        let err = session
            .validate(1, Language::Python, "code", Some("two-sum"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
        assert_eq!(session.progress(), &ProgressDocument::default());
        assert!(!config::progress_path(&fixture.data_dir()).exists());
    }

    #[tokio::test]
    async fn persistence_failure_is_reported_and_not_committed() {
        let fixture = Fixture::new();
        // A directory where the progress file should be makes every write fail
        std::fs::create_dir_all(config::progress_path(&fixture.data_dir())).unwrap();
        let coach = ScriptedCoach::replying(vec![ok("fine")]);
        let mut session = fixture.session(coach);

        let err = session
            .validate(1, Language::Python, "code", Some("two-sum"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert_eq!(session.progress().points, 0);
        assert!(session.progress().completed_problems.is_empty());
    }

    #[tokio::test]
    async fn repeat_validation_credits_again_by_default() {
        let fixture = Fixture::new();
        let coach = ScriptedCoach::replying(vec![ok("fine"), ok("fine")]);
        let mut session = fixture.session(coach);

        session.validate(2, Language::Python, "a", Some("tree-depth")).await.unwrap();
        let again = session.validate(2, Language::Python, "b", Some("tree-depth")).await.unwrap();

        assert!(again.outcome.is_some());
        assert_eq!(session.progress().points, 20);
        assert_eq!(session.progress().completed_problems, vec!["tree-depth", "tree-depth"]);
        assert_eq!(session.progress().badges, vec!["Week 2 Complete"]);
    }

    #[tokio::test]
    async fn repeat_validation_not_credited_when_disabled() {
        let mut fixture = Fixture::new();
        fixture.config.allow_repeat_credit = false;
        let coach = ScriptedCoach::replying(vec![ok("fine"), ok("still fine")]);
        let mut session = fixture.session(coach);

        session.validate(2, Language::Python, "a", Some("tree-depth")).await.unwrap();
        let again = session.validate(2, Language::Python, "b", Some("tree-depth")).await.unwrap();

        assert_eq!(again.review, "still fine");
        assert!(again.outcome.is_none());
        assert_eq!(session.progress().points, 10);
        assert_eq!(session.progress().completed_problems, vec!["tree-depth"]);
    }

    #[tokio::test]
    async fn empty_code_is_rejected_without_calling_coach() {
        let fixture = Fixture::new();
        let mut session = fixture.session(ScriptedCoach::replying(vec![ok("fine")]));

        let err = session.validate(1, Language::Python, "  \n ", None).await.unwrap_err();
        assert!(matches!(err, Error::EmptySubmission));
        assert_eq!(session.coach.prompt_count(), 0);
    }

    #[tokio::test]
    async fn problem_must_belong_to_week() {
        let fixture = Fixture::new();
        let mut session = fixture.session(ScriptedCoach::replying(vec![ok("fine")]));

        let err = session
            .validate(1, Language::Python, "code", Some("tree-depth"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownProblem { week: 1, .. }));
    }

    #[tokio::test]
    async fn hints_target_the_daily_problem() {
        let fixture = Fixture::new();
        let mut session = fixture.session(ScriptedCoach::replying(vec![ok("1. Use a map")]));

        let hints = session.hints(2, Language::Cpp).await.unwrap();
        assert_eq!(hints.problem, "tree-depth");
        assert_eq!(hints.text, "1. Use a map");

        let prompts = session.coach.prompts.lock().unwrap();
        assert!(prompts[0].contains("'tree-depth'"));
        assert!(prompts[0].ends_with("in C++."));
    }

    #[test]
    fn selections_are_remembered() {
        let fixture = Fixture::new();
        let mut session = fixture.session(ScriptedCoach::default());
        session.select_week(2).unwrap();
        session.select_language(Language::JavaScript).unwrap();

        let reopened = fixture.session(ScriptedCoach::default());
        assert_eq!(reopened.current_week(), 2);
        assert_eq!(reopened.current_language(), Language::JavaScript);
    }

    #[test]
    fn close_flushes_session_state_only() {
        let fixture = Fixture::new();
        let session = fixture.session(ScriptedCoach::default());
        session.close().unwrap();

        let data_dir = fixture.data_dir();
        assert!(config::session_path(&data_dir).exists());
        assert!(!config::progress_path(&data_dir).exists());
    }

    #[test]
    fn unreadable_progress_survives_a_read_only_session() {
        let fixture = Fixture::new();
        let progress_path = config::progress_path(&fixture.data_dir());
        std::fs::create_dir_all(fixture.data_dir()).unwrap();
        let truncated = r#"{"points": 500, "completed_problems": ["x"], "streak": 3,"#;
        std::fs::write(&progress_path, truncated).unwrap();

        let mut session = fixture.session(ScriptedCoach::default());
        assert_eq!(session.progress(), &ProgressDocument::default());
        session.daily_problem(1).unwrap();
        session.close().unwrap();

        assert_eq!(std::fs::read_to_string(&progress_path).unwrap(), truncated);
    }

    #[tokio::test]
    async fn validation_after_midnight_credits_the_problem_shown() {
        for _ in 0..10 {
            let fixture = Fixture::new();
            let coach = ScriptedCoach::replying(vec![ok("fine")]);
            let mut session = fixture.session(coach).with_clock(late);
            let shown = session.daily_problem(1).unwrap().unwrap();

            let mut session = session.with_clock(after_midnight);
            let report = session.validate(1, Language::Python, "code", None).await.unwrap();

            assert_eq!(report.problem, shown);
            assert_eq!(session.progress().completed_problems, vec![shown.clone()]);
            assert_eq!(session.progress().time_spent.get(&shown), Some(&20.0));
            assert!(session.state().presented(1).is_none());
        }
    }
}
