use std::path::PathBuf;
use std::sync::Arc;

use eyre::Result;
use log::{info, warn};

mod cli;

use cli::Cli;
use ytsum::config::{self, Config, DEFAULT_HOST, DEFAULT_MODEL, DEFAULT_PORT};
use ytsum::server::{self, AppState};
use ytsum::summarize::{LlmClient, Provider};
use ytsum::youtube::YouTubeCaptions;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

fn build_after_help() -> String {
    let keys = [Provider::Gemini, Provider::Anthropic, Provider::OpenAi]
        .iter()
        .map(|p| {
            let var = p.api_key_var();
            match std::env::var(var) {
                Ok(_) => format!("  \x1b[32m✅\x1b[0m {var}"),
                Err(_) => format!("  \x1b[31m❌\x1b[0m {var}     (not set, needed for {} models)", p.name()),
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\nCREDENTIALS:\n{keys}\n\nConfig file: {}\nLogs are written to: {}",
        config::config_path().display(),
        log_dir().join("ytsum.log").display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // An unreadable config file falls back to defaults (CLI flags take priority)
    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let config = Config::load_from(&config_path).unwrap_or_else(|e| {
        warn!("Ignoring config {}: {e}", config_path.display());
        Config::default()
    });

    let host = cli.host.or(config.host.clone()).unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = cli.port.or(config.port).unwrap_or(DEFAULT_PORT);
    let model = cli.model.or(config.model.clone()).unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let languages = config.languages();

    // Read once; a missing key only shows up as an auth failure on first use
    let provider = Provider::for_model(&model);
    let api_key = std::env::var(provider.api_key_var()).unwrap_or_else(|_| {
        warn!("{} is not set; {} requests will fail", provider.api_key_var(), provider.name());
        String::new()
    });

    let client = reqwest::Client::new();
    let state = AppState {
        captions: Arc::new(YouTubeCaptions::new(client.clone())),
        llm: Arc::new(LlmClient::new(client, model.clone(), api_key)),
        languages,
    };

    let addr = config::listen_addr(&host, port)?;

    if cli.verbose {
        eprintln!(
            "Listening on: {addr}\nModel: {model} ({})\nCaption languages: {} then {}\nConfig: {}",
            provider.name(),
            state.languages.primary,
            state.languages.secondary,
            config_path.display(),
        );
    }
    info!("Starting server on {addr} with model {model}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, server::router(state)).await?;

    Ok(())
}
