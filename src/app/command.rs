//! Command parsing for the interactive shell

use std::path::PathBuf;

use crate::coach::Language;

/// Parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the problem of the day: today
    Today,
    /// Ask for hints: hint
    Hint,
    /// Validate code from a file, or typed inline when no path is given: validate [path]
    Validate(Option<PathBuf>),
    /// Switch week: week <n>
    Week(u32),
    /// Switch language: lang <language>
    Language(Language),
    /// Show progress summary: stats
    Stats,
    /// List weeks in the catalog: weeks
    Weeks,
    /// Show help: help or ?
    Help,
    /// Quit the shell: quit or q
    Quit,
    /// Empty line
    Nop,
}

/// Result of parsing a command
#[derive(Debug)]
pub enum ParseResult {
    /// Successfully parsed command
    Ok(Command),
    /// Unknown command
    UnknownCommand(String),
    /// Command needs an argument
    MissingArgument(String),
    /// Argument could not be understood
    InvalidArgument {
        /// Command name
        command: String,
        /// Explanation
        reason: String,
    },
}

/// Parse a shell input line
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();

    if input.is_empty() {
        return ParseResult::Ok(Command::Nop);
    }

    // Split into command and arguments
    let mut parts = input.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim()).unwrap_or("");

    match cmd.to_lowercase().as_str() {
        "today" | "t" => ParseResult::Ok(Command::Today),
        "hint" | "hints" => ParseResult::Ok(Command::Hint),
        "validate" | "v" | "submit" => {
            let path = (!args.is_empty()).then(|| PathBuf::from(args));
            ParseResult::Ok(Command::Validate(path))
        }
        "week" | "w" => {
            if args.is_empty() {
                ParseResult::MissingArgument("week".to_string())
            } else {
                match args.parse::<u32>() {
                    Ok(n) => ParseResult::Ok(Command::Week(n)),
                    Err(_) => ParseResult::InvalidArgument {
                        command: "week".to_string(),
                        reason: format!("'{}' is not a week number", args),
                    },
                }
            }
        }
        "lang" | "l" | "language" => {
            if args.is_empty() {
                ParseResult::MissingArgument("lang".to_string())
            } else {
                match args.parse::<Language>() {
                    Ok(language) => ParseResult::Ok(Command::Language(language)),
                    Err(reason) => {
                        ParseResult::InvalidArgument { command: "lang".to_string(), reason }
                    }
                }
            }
        }
        "stats" | "s" => ParseResult::Ok(Command::Stats),
        "weeks" => ParseResult::Ok(Command::Weeks),
        "help" | "h" | "?" => ParseResult::Ok(Command::Help),
        "quit" | "q" | "exit" => ParseResult::Ok(Command::Quit),
        _ => ParseResult::UnknownCommand(cmd.to_string()),
    }
}

/// Help text listing shell commands
pub const HELP: &str = "\
Commands:
  today, t              Show the problem of the day
  hint                  Ask the coach for step-by-step hints
  validate, v [path]    Submit code from a file, or type it and end with a line containing '.'
  week, w <n>           Switch to week n
  lang, l <language>    Switch language (python, cpp, java, javascript)
  stats, s              Show points, level, streak and badges
  weeks                 List the weeks in the catalog
  help, h, ?            Show this help
  quit, q               Leave the shell";
