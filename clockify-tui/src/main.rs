mod api;
mod app;
mod cache;
mod cli;
mod config;
mod logging;
mod report;
mod runtime;
mod selector;
mod time_utils;
mod timer;
mod ui;

use anyhow::{bail, Context, Result};
use api::ApiClient;
use app::App;
use cache::Cache;
use clap::Parser;
use clockify::ClockifyClient;
use config::ClockifyConfig;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use time::UtcOffset;
use tracing::{error, info};

fn main() -> Result<()> {
    // Resolved before the runtime spawns its worker threads.
    let offset = time_utils::local_offset();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?
        .block_on(async_main(offset))
}

async fn async_main(offset: UtcOffset) -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();
    match cli.command() {
        cli::Commands::ConfigPath => {
            let path = ClockifyConfig::config_path()?;
            if ClockifyConfig::write_default_if_missing(&path)? {
                println!("Created default config at {}", path.display());
            } else {
                println!("{}", path.display());
            }
            Ok(())
        }
        cli::Commands::Dev => {
            let config = ClockifyConfig::load()?;
            let _guard = logging::init(&config)?;
            info!("starting with dev data");
            run(ApiClient::dev(), &config, offset).await
        }
        cli::Commands::Run => {
            let config = ClockifyConfig::load()?;
            config.validate()?;
            let _guard = logging::init(&config)?;
            let client = connect(&config).await?;
            run(ApiClient::Remote(client), &config, offset).await
        }
    }
}

/// Resolves the user and workspace that every later request is scoped to.
async fn connect(config: &ClockifyConfig) -> Result<ClockifyClient> {
    let api_key = config.api_key.clone().unwrap_or_default();
    let client = ClockifyClient::new(api_key, &config.base_url, config.request_timeout())
        .context("Failed to build HTTP client")?;

    let user = client
        .current_user()
        .await
        .context("Failed to fetch the current user; check the API key")?;

    let workspace_id = match config.workspace_id.clone() {
        Some(id) => id,
        None if !user.active_workspace.is_empty() => user.active_workspace.clone(),
        None if !user.default_workspace.is_empty() => user.default_workspace.clone(),
        None => match client.workspaces().await?.into_iter().next() {
            Some(workspace) => workspace.id,
            None => bail!("No workspace available for {}", user.email),
        },
    };
    info!(user = %user.name, %workspace_id, "connected");

    Ok(client.with_workspace(workspace_id).with_user(user.id))
}

async fn run(client: ApiClient, config: &ClockifyConfig, offset: UtcOffset) -> Result<()> {
    let cache = Arc::new(Cache::new(config.cache_ttl()));
    let mut app = App::new(offset, client.is_dev());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = runtime::run_app(&mut terminal, &mut app, client, cache).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "event loop failed");
    }
    res
}
