//! Tunebox - terminal music player for a Tunebox catalog server

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{path::PathBuf, time::Duration};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunebox_cli::{config::CliConfig, render, repl, SimulatedEngine};
use tunebox_playback::Player;
use tunebox_server_client::{ServerConfig, TuneboxClient, UploadMetadata};

#[derive(Parser)]
#[command(name = "tunebox")]
#[command(about = "Browse, upload, and play a Tunebox catalog", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./tunebox.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Server URL, overriding the configuration
    #[arg(long, global = true, env = "TUNEBOX_URL")]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the catalog
    List {
        /// Only show tracks whose title or artist contains this text
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Log in and print the issued token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Upload audio files
    Upload {
        /// Bearer token (default: server.token from the configuration)
        #[arg(short, long, env = "TUNEBOX_TOKEN")]
        token: Option<String>,
        /// Title for every file (default: file name)
        #[arg(long)]
        title: Option<String>,
        /// Artist for every file (default: your username)
        #[arg(long)]
        artist: Option<String>,
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List registered accounts
    Users {
        /// Bearer token (default: server.token from the configuration)
        #[arg(short, long, env = "TUNEBOX_TOKEN")]
        token: Option<String>,
    },
    /// Print the chat history
    Messages {
        /// Bearer token (default: server.token from the configuration)
        #[arg(short, long, env = "TUNEBOX_TOKEN")]
        token: Option<String>,
    },
    /// Start an interactive player over the catalog
    Play {
        /// Initial search query
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tunebox_cli=info,tunebox_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.server.url = url;
    }
    config.validate()?;

    match cli.command {
        Commands::List { query } => list(&config, query.as_deref()).await?,
        Commands::Register { username, password } => {
            register(&config, &username, &password).await?;
        }
        Commands::Login { username, password } => login(&config, &username, &password).await?,
        Commands::Upload {
            token,
            title,
            artist,
            files,
        } => {
            let metadata = UploadMetadata { title, artist };
            upload(&config, token, metadata, files).await?;
        }
        Commands::Users { token } => users(&config, token).await?,
        Commands::Messages { token } => messages(&config, token).await?,
        Commands::Play { query } => play(&config, query).await?,
    }

    Ok(())
}

fn client(config: &CliConfig) -> anyhow::Result<TuneboxClient> {
    let server = ServerConfig {
        url: config.server.url.clone(),
        token: config.server.token.clone(),
    };
    TuneboxClient::new(server).context("creating server client")
}

async fn list(config: &CliConfig, query: Option<&str>) -> anyhow::Result<()> {
    let tracks = client(config)?.fetch_catalog().await?;
    let catalog = tunebox_core::Catalog::dedup(tracks);
    let view = tunebox_playback::filter(&catalog, query.unwrap_or_default());

    println!("{}", render::track_list(&view, None));
    Ok(())
}

async fn register(config: &CliConfig, username: &str, password: &str) -> anyhow::Result<()> {
    let response = client(config)?.register(username, password).await?;
    println!("{} (id {})", response.message, response.user_id);
    Ok(())
}

async fn login(config: &CliConfig, username: &str, password: &str) -> anyhow::Result<()> {
    let response = client(config)?.login(username, password).await?;
    tracing::info!(username = %response.user.username, "Logged in");
    println!("{}", response.token);
    Ok(())
}

async fn upload(
    config: &CliConfig,
    token: Option<String>,
    metadata: UploadMetadata,
    files: Vec<PathBuf>,
) -> anyhow::Result<()> {
    let client = authed_client(config, token).await?;

    // Fills the default artist from the account when the token is valid
    if let Err(err) = client.current_user().await {
        anyhow::bail!("upload needs a valid token: {err}");
    }

    let batch = files
        .into_iter()
        .map(|path| (path, Some(metadata.clone())))
        .collect();

    let handle = client.upload().await?;
    let results = handle
        .client()
        .upload_tracks_batch(batch, |progress| {
            if progress.bytes_sent == 0 {
                eprintln!(
                    "[{}/{}] {}",
                    progress.track_index + 1,
                    progress.total_tracks,
                    progress.current_file
                );
            }
        })
        .await;

    let mut failures = 0;
    for result in results {
        match result {
            Ok(track) => println!("uploaded {} - {} ({})", track.title, track.artist, track.id),
            Err(err) => {
                failures += 1;
                eprintln!("failed: {err}");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} upload(s) failed");
    }
    Ok(())
}

async fn authed_client(config: &CliConfig, token: Option<String>) -> anyhow::Result<TuneboxClient> {
    let client = client(config)?;
    if let Some(token) = token {
        client.set_token(token).await;
    }
    Ok(client)
}

async fn users(config: &CliConfig, token: Option<String>) -> anyhow::Result<()> {
    let users = authed_client(config, token)
        .await?
        .list_users()
        .await
        .context("listing users")?;

    for user in users {
        let role = user.role.as_deref().unwrap_or("user");
        println!("{:>5}  {} ({role})", user.id.to_string(), user.username);
    }
    Ok(())
}

async fn messages(config: &CliConfig, token: Option<String>) -> anyhow::Result<()> {
    let messages = authed_client(config, token)
        .await?
        .message_history()
        .await
        .context("fetching chat history")?;

    for message in messages {
        let sender = message.username.as_deref().unwrap_or("unknown");
        let when = message.created_at.as_deref().unwrap_or("");
        println!("{when} <{sender}> {}", message.content);
    }
    Ok(())
}

async fn play(config: &CliConfig, query: Option<String>) -> anyhow::Result<()> {
    let client = client(config)?;
    let (engine, mut engine_events) = SimulatedEngine::new(&config.engine);
    let mut player = Player::new(engine, config.playback.clone());

    if let Err(err) = player.load_from(&client).await {
        eprintln!("{err}; starting with an empty catalog");
    }
    if let Some(query) = query {
        player.set_query(query);
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    repl::run(
        &mut player,
        &mut engine_events,
        Duration::from_millis(config.engine.tick_ms),
        stdin,
        &mut stdout,
    )
    .await?;

    Ok(())
}
