use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dsa_coach::app::describe_error;
use dsa_coach::coach::{ApiKeyManager, Language};
use dsa_coach::ui::{dashboard, report};
use dsa_coach::{App, Config, Session};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dsa-coach")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Challenge catalog to use instead of the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Directory holding progress and session state
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Week to work on
    #[arg(short, long, global = true)]
    week: Option<u32>,

    /// Programming language for hints and reviews
    #[arg(short, long, global = true, value_enum)]
    language: Option<Language>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the problem of the day
    Today,
    /// Ask the coach for step-by-step hints
    Hint,
    /// Submit code for review and record progress
    Validate {
        /// File containing the solution (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Problem to validate instead of the problem of the day
        #[arg(short, long)]
        problem: Option<String>,
    },
    /// Show points, level, streak, badges and weak topics
    Stats,
    /// List the weeks in the catalog
    Weeks,
    /// Open the analytics dashboard
    Dashboard,
    /// Start the interactive shell (default)
    Shell,
    /// Manage the stored API key
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Store an API key in the system keyring
    Set {
        /// Groq API key
        key: String,
    },
    /// Remove the stored API key
    Clear,
    /// Show where the API key comes from
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so reports on stdout stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dsa_coach=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(catalog) = cli.catalog {
        config.catalog_path = catalog;
    }

    let command = match cli.command.unwrap_or(Commands::Shell) {
        Commands::Auth { action } => return auth(action, &config),
        command => command,
    };

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => Config::data_dir()?,
    };
    let theme = config.active_theme();

    let mut session = Session::open(config, &data_dir).map_err(friendly)?;

    let week = cli.week.unwrap_or_else(|| session.current_week());
    let language = cli.language.unwrap_or_else(|| session.current_language());

    match command {
        Commands::Today => {
            let problem = session.daily_problem(week)?;
            print!("{}", report::daily_problem(session.week(week)?, problem.as_deref()));
        }
        Commands::Hint => {
            eprintln!("Generating hints...");
            let hints = session.hints(week, language).await.map_err(friendly)?;
            print!("{}", report::hints(&hints, report::DEFAULT_WIDTH));
        }
        Commands::Validate { file, problem } => {
            let code = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {:?}", path))?,
                None => {
                    let mut code = String::new();
                    io::stdin().read_to_string(&mut code).context("Failed to read stdin")?;
                    code
                }
            };

            eprintln!("Validating code...");
            let report = session
                .validate(week, language, &code, problem.as_deref())
                .await
                .map_err(friendly)?;
            print!("{}", report::validation(&report, report::DEFAULT_WIDTH));
        }
        Commands::Stats => print!("{}", report::stats(session.progress())),
        Commands::Weeks => print!("{}", report::weeks(session.catalog(), session.progress())),
        Commands::Dashboard => dashboard::run(session.progress(), &theme)?,
        Commands::Shell => {
            let mut app =
                App::new(session).with_selection(cli.week, cli.language).map_err(friendly)?;
            let stdin = BufReader::new(tokio::io::stdin());
            app.run(stdin, &mut io::stdout()).await?;
            session = app.into_session();
        }
        Commands::Auth { .. } => unreachable!("handled before the session is opened"),
    }

    session.close()?;
    Ok(())
}

/// Attach advice to errors from session actions
fn friendly(err: dsa_coach::Error) -> anyhow::Error {
    anyhow::anyhow!(describe_error(&err).trim_start_matches("Error: ").to_string())
}

fn auth(action: AuthAction, config: &Config) -> Result<()> {
    match action {
        AuthAction::Set { key } => {
            ApiKeyManager::set_api_key(key.trim())?;
            println!("API key stored ({})", ApiKeyManager::mask_key(key.trim()));
        }
        AuthAction::Clear => {
            ApiKeyManager::delete_api_key()?;
            println!("API key removed from keyring");
        }
        AuthAction::Status => {
            if let Ok(key) = std::env::var(&config.api_key_env) {
                if !key.trim().is_empty() {
                    let masked = ApiKeyManager::mask_key(key.trim());
                    println!("Using {} ({})", config.api_key_env, masked);
                    return Ok(());
                }
            }
            match ApiKeyManager::get_api_key() {
                Ok(key) => println!("Using system keyring ({})", ApiKeyManager::mask_key(&key)),
                Err(_) => bail!(
                    "No API key found. Set {} or run `dsa-coach auth set <key>`",
                    config.api_key_env
                ),
            }
        }
    }
    Ok(())
}
