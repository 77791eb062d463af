//! Interactive shell and the session it drives

pub mod command;
pub mod session;

use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::coach::{Coach, Language};
use crate::error::Error;
use crate::ui::report;
use command::{Command, HELP, ParseResult, parse_command};
use session::Session;

pub use session::{Hints, ValidationReport};

/// Line that ends inline code entry
const END_OF_CODE: &str = ".";

/// The interactive coaching shell
pub struct App<C> {
    /// Session being driven
    session: Session<C>,

    /// Selected week
    week: u32,

    /// Selected language
    language: Language,

    /// Wrap width for coach text
    width: usize,
}

impl<C: Coach> App<C> {
    /// Create a shell over an open session
    pub fn new(session: Session<C>) -> Self {
        let week = session.current_week();
        let language = session.current_language();
        Self { session, week, language, width: report::DEFAULT_WIDTH }
    }

    /// Select a week and language, remembering them like `week` and `lang` do
    pub fn with_selection(
        mut self,
        week: Option<u32>,
        language: Option<Language>,
    ) -> Result<Self, Error> {
        if let Some(week) = week {
            self.session.select_week(week)?;
            self.week = week;
        }
        if let Some(language) = language {
            self.session.select_language(language)?;
            self.language = language;
        }
        Ok(self)
    }

    /// Give the session back, e.g. to close it
    pub fn into_session(self) -> Session<C> {
        self.session
    }

    /// Read commands from `input` until `quit` or end of input
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        writeln!(out, "DSA Coach. Type 'help' for commands.")?;
        self.print_today(out)?;

        loop {
            write!(out, "[week {} | {}]> ", self.week, self.language)?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };

            let command = match parse_command(&line) {
                ParseResult::Ok(command) => command,
                ParseResult::UnknownCommand(cmd) => {
                    writeln!(out, "Unknown command: {} (type 'help')", cmd)?;
                    continue;
                }
                ParseResult::MissingArgument(cmd) => {
                    writeln!(out, "'{}' needs an argument", cmd)?;
                    continue;
                }
                ParseResult::InvalidArgument { command, reason } => {
                    writeln!(out, "{}: {}", command, reason)?;
                    continue;
                }
            };

            let code = match &command {
                Command::Validate(Some(path)) => match std::fs::read_to_string(path) {
                    Ok(code) => Some(code),
                    Err(e) => {
                        writeln!(out, "Failed to read {}: {}", path.display(), e)?;
                        continue;
                    }
                },
                Command::Validate(None) => {
                    let prompt = "Paste your solution, then a line containing only";
                    writeln!(out, "{} '{}':", prompt, END_OF_CODE)?;
                    out.flush()?;
                    Some(read_code_block(&mut lines).await?)
                }
                _ => None,
            };

            match &command {
                Command::Hint => writeln!(out, "Generating hints...")?,
                Command::Validate(_) => writeln!(out, "Validating code...")?,
                _ => {}
            }

            match self.execute(command, code).await {
                Ok(Some(text)) => write!(out, "{}", text)?,
                Ok(None) => break,
                Err(e) => writeln!(out, "{}", describe_error(&e))?,
            }
        }

        Ok(())
    }

    /// Execute one command, returning its output or `None` to quit
    async fn execute(
        &mut self,
        command: Command,
        code: Option<String>,
    ) -> Result<Option<String>, Error> {
        let text = match command {
            Command::Nop => String::new(),
            Command::Quit => return Ok(None),
            Command::Help => format!("{}\n", HELP),
            Command::Today => {
                let problem = self.session.daily_problem(self.week)?;
                report::daily_problem(self.session.week(self.week)?, problem.as_deref())
            }
            Command::Hint => {
                let hints = self.session.hints(self.week, self.language).await?;
                report::hints(&hints, self.width)
            }
            Command::Validate(_) => {
                let code = code.unwrap_or_default();
                let report = self.session.validate(self.week, self.language, &code, None).await?;
                report::validation(&report, self.width)
            }
            Command::Week(week) => {
                self.session.select_week(week)?;
                self.week = week;
                let problem = self.session.daily_problem(week)?;
                report::daily_problem(self.session.week(week)?, problem.as_deref())
            }
            Command::Language(language) => {
                self.session.select_language(language)?;
                self.language = language;
                format!("Language set to {}\n", language)
            }
            Command::Stats => report::stats(self.session.progress()),
            Command::Weeks => report::weeks(self.session.catalog(), self.session.progress()),
        };

        Ok(Some(text))
    }

    fn print_today<W: Write>(&mut self, out: &mut W) -> Result<()> {
        match self.session.daily_problem(self.week) {
            Ok(problem) => {
                let week = self.session.week(self.week)?;
                write!(out, "{}", report::daily_problem(week, problem.as_deref()))?;
            }
            Err(e) => writeln!(out, "{}", describe_error(&e))?,
        }
        Ok(())
    }
}

/// Read lines until the end-of-code marker or end of input
async fn read_code_block<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> Result<String> {
    let mut code = String::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim_end() == END_OF_CODE {
            break;
        }
        code.push_str(&line);
        code.push('\n');
    }
    Ok(code)
}

/// User-facing message for a failed action
pub fn describe_error(err: &Error) -> String {
    match err {
        Error::Upstream(e) if e.requires_reauth() => {
            format!("Error: {}\nCheck your API key (`dsa-coach auth status`).", err)
        }
        Error::Upstream(e) if e.is_recoverable() => {
            format!("Error: {}\nNo progress was recorded. Please try again.", err)
        }
        Error::Upstream(_) => format!("Error: {}\nNo progress was recorded.", err),
        Error::Persistence(_) => {
            format!("Error: {}\nYour progress for this attempt was NOT saved.", err)
        }
        _ => format!("Error: {}", err),
    }
}
