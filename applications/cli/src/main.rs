/// Encore - terminal player for the Encore music service
use anyhow::Context;
use clap::Parser;
use encore_cli::{CliConfig, JsonSettingsStore, Repl, SettingsStore};
use encore_client::{ClientConfig, EncoreClient};
use encore_core::{AccountApi, MusicApi};
use encore_playback::{Player, PlayerController};
use std::{io, path::PathBuf, sync::Arc};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "encore")]
#[command(about = "Terminal player for the Encore music service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ENCORE_CONFIG")]
    config: Option<PathBuf>,

    /// Account email; logs in together with --password
    #[arg(long, env = "ENCORE_EMAIL")]
    email: Option<String>,

    /// Account password
    #[arg(long, env = "ENCORE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Existing bearer token
    #[arg(long, env = "ENCORE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Settings file path (overrides the configured one)
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they do not mix with the prompt
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "encore=info,encore_cli=info,encore_playback=info,encore_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let client = EncoreClient::new(ClientConfig::new(&config.server.url))
        .context("Failed to create client")?;
    tracing::info!(url = %config.server.url, "Using server");

    match (&cli.email, &cli.password) {
        (Some(email), Some(password)) => {
            let login = client
                .login(email, password)
                .await
                .context("Login failed")?;
            tracing::info!(name = ?login.name, "Signed in");
        }
        _ => {
            if let Some(token) = cli.token.clone().or_else(|| config.server.token.clone()) {
                client.set_token(token).await;
            } else {
                tracing::warn!("No credentials; use 'login' or 'register' for liked songs and playlists");
            }
        }
    }

    let store = JsonSettingsStore::new(
        cli.settings
            .clone()
            .unwrap_or_else(|| config.settings.path.clone()),
    );

    let client = Arc::new(client);
    let api: Arc<dyn MusicApi> = client.clone();
    let accounts: Arc<dyn AccountApi> = client;
    let mut player = Player::new(config.playback.clone(), Arc::clone(&api));
    player.apply_settings(store.load());

    let handle = PlayerController::spawn(player);
    if let Err(e) = handle.hydrate().await {
        tracing::warn!(error = %e, "Failed to load the catalog");
    }

    let mut repl = Repl::new(handle.clone(), api, io::stdout()).with_accounts(accounts);
    repl.run(BufReader::new(tokio::io::stdin())).await?;

    let player = handle.shutdown().await?;
    store.save(&player.settings())?;
    tracing::info!(path = %store.path().display(), "Settings saved");

    Ok(())
}
