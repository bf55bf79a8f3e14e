use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use time::OffsetDateTime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tasktribe::app::{self, AppCtx};
use tasktribe::assistant::gemini::GeminiClient;
use tasktribe::cli::{Cli, Command};
use tasktribe::commands;
use tasktribe::config::{Config, StorageConfig};
use tasktribe::controller::{Controller, Services};
use tasktribe::defaults::Defaults;
use tasktribe::fixtures::Fixtures;
use tasktribe::otp::SimulatedCodeSender;
use tasktribe::tutorial::Prefs;

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tasktribe=info"))
}

/// The TUI owns the terminal, so interactive runs log to a file.
fn init_file_logging(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir).with_context(|| format!("creating {}", data_dir.display()))?;
    let path = data_dir.join(Defaults::LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt().with_env_filter(filter()).with_writer(std::io::stderr).try_init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let path = match &cli.config {
        Some(p) => p.clone(),
        None => cli
            .data_dir
            .clone()
            .unwrap_or_else(|| StorageConfig::default().resolve_data_dir())
            .join("config.toml"),
    };
    let mut config = Config::load_or_default(&path)?;
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = Some(dir.clone());
    }
    if let Some(key) = cli.api_key.clone().or_else(|| std::env::var("API_KEY").ok()) {
        config.assistant.api_key = Some(key);
    }
    Ok(config)
}

fn load_fixtures(config: &Config) -> Result<Fixtures> {
    match &config.storage.fixtures {
        Some(path) => Fixtures::load(path),
        None => Ok(Fixtures::builtin(OffsetDateTime::now_utc())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let data_dir = config.storage.resolve_data_dir();

    let cmd = cli.cmd.unwrap_or(Command::Ui);
    match &cmd {
        Command::Ui => init_file_logging(&data_dir)?,
        _ => init_stderr_logging(),
    }

    let assistant = Arc::new(GeminiClient::new(&config.assistant).context("building assistant client")?);

    match cmd {
        Command::Ui => {
            let services = Services {
                assistant,
                codes: Arc::new(SimulatedCodeSender::new(config.timing.code_send_delay())),
            };
            let controller = Controller::new(load_fixtures(&config)?, services, &config);
            let prefs = Prefs::in_dir(&data_dir)?;
            info!(data_dir = %data_dir.display(), "starting TaskTribe");
            app::run_app(AppCtx { controller, prefs }).await
        }

        Command::Quests { out } => {
            let quests = commands::quests::list(&load_fixtures(&config)?);
            commands::quests::emit(quests, out)
        }

        Command::Moderate { text } => commands::assist::moderate(assistant.as_ref(), &text).await,

        Command::ValidateQuest { title, description, budget } => {
            commands::assist::validate_quest(assistant.as_ref(), &title, &description, budget).await
        }

        Command::VerifyPhoto { image, code } => commands::assist::verify_photo(assistant.as_ref(), &image, &code).await,

        Command::Maps { prompt, lat, lng } => commands::assist::maps(assistant.as_ref(), &prompt, lat, lng).await,

        Command::Video { file, mime, prompt } => {
            commands::assist::video(assistant.as_ref(), &file, &mime, &prompt).await
        }
    }
}
