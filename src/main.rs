// Quiz Funnel - terminal entry point

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quiz_funnel::models::settings::{FunnelSettings, QuestionSource, SettingsUpdate};
use quiz_funnel::services::recommendation::fixed_questions;
use quiz_funnel::storage::{resolve_api_key, ConfigService};
use quiz_funnel::terminal::Terminal;
use quiz_funnel::utils::paths::settings_path;
use quiz_funnel::state::TRACKING_FLUSH_TIMEOUT;
use quiz_funnel::FunnelApp;

#[derive(Parser)]
#[command(name = "quiz-funnel")]
#[command(about = "Product recommendation quiz backed by Gemini", version)]
struct Cli {
    /// Settings file (default: <config dir>/quiz-funnel/settings.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the built-in questions instead of generating them
    #[arg(long, global = true)]
    fixed_questions: bool,

    /// Disable funnel tracking for this run
    #[arg(long, global = true)]
    no_tracking: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Take the quiz interactively (default)
    Run,
    /// Fetch one question set and print it as JSON
    Questions,
    /// Print the product catalog as JSON
    Catalog,
    /// Write a default settings file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut cli = Cli::parse();

    match cli.command.take().unwrap_or(Commands::Run) {
        Commands::InitConfig { force } => {
            let path = match &cli.config {
                Some(path) => path.clone(),
                None => settings_path()?,
            };
            ConfigService::write_default(&path, force)?;
            println!("Wrote {}", path.display());
        }
        Commands::Catalog => {
            let settings = load_settings(&cli)?;
            println!("{}", serde_json::to_string_pretty(&settings.resolved_catalog())?);
        }
        Commands::Questions => {
            let settings = load_settings(&cli)?;
            if settings.question_source == QuestionSource::Fixed {
                println!("{}", serde_json::to_string_pretty(&fixed_questions())?);
                return Ok(());
            }
            let app = build_app(settings)?;
            let snapshot = app.controller().start_quiz().await?;
            app.shutdown(TRACKING_FLUSH_TIMEOUT).await;
            if let Some(error) = &snapshot.error {
                anyhow::bail!("{}", error);
            }
            println!("{}", serde_json::to_string_pretty(&snapshot.questions)?);
        }
        Commands::Run => {
            let app = build_app(load_settings(&cli)?)?;
            let result = Terminal::new(app.controller().clone()).run().await;
            app.shutdown(TRACKING_FLUSH_TIMEOUT).await;
            result?;
        }
    }

    Ok(())
}

const DEFAULT_LOG_FILTER: &str = "quiz_funnel=info";

/// `RUST_LOG` as given, or the default when unset or unparsable
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Settings file, then environment, then command-line flags
fn load_settings(cli: &Cli) -> anyhow::Result<FunnelSettings> {
    let mut config =
        ConfigService::load(cli.config.as_deref()).context("failed to load settings")?;
    config.apply_env()?;
    config.update_config(SettingsUpdate {
        question_source: cli.fixed_questions.then_some(QuestionSource::Fixed),
        tracking_enabled: cli.no_tracking.then_some(false),
        ..Default::default()
    })?;
    tracing::debug!(path = %config.config_path().display(), "settings resolved");
    Ok(config.into_config())
}

fn build_app(settings: FunnelSettings) -> anyhow::Result<FunnelApp> {
    let api_key = resolve_api_key(|name| std::env::var(name).ok())?;
    Ok(FunnelApp::builder(settings).api_key(api_key).build()?)
}
