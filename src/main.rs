use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use figure10::{
    config::api_key_from_env,
    create_router, evaluator,
    history::HistorySummary,
    AppState, Config, ConfigStore, FileConfigStore, PracticeStore, TextGenerator,
};
use rand::{rngs::StdRng, SeedableRng};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "figure10=info,tower_http=info";

/// typing practice service with generated texts and live progress checks
#[derive(Parser, Debug)]
#[clap(
    version,
    about,
    long_about = "Serves generated typing practice texts over HTTP, evaluates typing progress \
                  live, and keeps a history of finished sessions."
)]
struct Cli {
    /// path to a JSON config file (defaults to the per-user config directory)
    #[clap(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// run the HTTP service (default)
    Serve {
        /// address to bind to
        #[clap(short = 'b', long)]
        bind: Option<String>,

        /// port to listen on
        #[clap(short = 'p', long)]
        port: Option<u16>,

        /// SQLite database file
        #[clap(long)]
        database: Option<PathBuf>,
    },

    /// generate a practice text and print it
    Generate {
        /// free-form prompt, e.g. "write me a poem" or "Practice: their, there"
        #[clap(short = 'p', long)]
        prompt: String,

        /// skip the online provider even when an API key is set
        #[clap(long)]
        offline: bool,

        /// seed for reproducible offline synthesis
        #[clap(long)]
        seed: Option<u64>,
    },

    /// evaluate typed text against a reference and print the progress as JSON
    Check {
        reference: String,
        typed: String,

        /// seconds elapsed since typing started
        #[clap(short = 'e', long, default_value_t = 0.0)]
        elapsed: f64,
    },

    /// show recent sessions and the most common mistakes
    History {
        /// number of sessions to list
        #[clap(short = 'n', long)]
        limit: Option<usize>,

        /// print sessions as CSV
        #[clap(long)]
        csv: bool,

        /// SQLite database file
        #[clap(long)]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let mut config = store.load();

    match cli.command.unwrap_or(Command::Serve {
        bind: None,
        port: None,
        database: None,
    }) {
        Command::Serve {
            bind,
            port,
            database,
        } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if database.is_some() {
                config.database_path = database;
            }
            serve(config).await
        }
        Command::Generate {
            prompt,
            offline,
            seed,
        } => generate(&config, &prompt, offline, seed).await,
        Command::Check {
            reference,
            typed,
            elapsed,
        } => {
            let snapshot = evaluator::check_progress(&reference, &typed, elapsed);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        Command::History {
            limit,
            csv,
            database,
        } => {
            if database.is_some() {
                config.database_path = database;
            }
            history(&config, limit.unwrap_or(config.history_limit), csv)
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    let db_path = config.resolved_database_path();
    let store = PracticeStore::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    info!("Using database {}", db_path.display());

    let generator = TextGenerator::from_config(&config, api_key_from_env().as_deref())?;
    let app = create_router(AppState::new(generator, store, config.history_limit));

    let listener = tokio::net::TcpListener::bind(config.address())
        .await
        .with_context(|| format!("failed to bind {}", config.address()))?;
    info!("Starting figure10 server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server gracefully stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down server...");
}

async fn generate(config: &Config, prompt: &str, offline: bool, seed: Option<u64>) -> Result<()> {
    let api_key = if offline { None } else { api_key_from_env() };
    let generator = TextGenerator::from_config(config, api_key.as_deref())?;

    let text = if generator.is_online() {
        generator.generate_text(prompt).await?
    } else {
        let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        TextGenerator::generate_offline(prompt, &mut rng)
    };

    println!("{}", text);
    Ok(())
}

fn history(config: &Config, limit: usize, as_csv: bool) -> Result<()> {
    let db_path = config.resolved_database_path();
    let store = PracticeStore::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    let sessions = store.recent_sessions(limit)?;

    if as_csv {
        let mut writer = csv::Writer::from_writer(io::stdout());
        for session in &sessions {
            writer.serialize(session)?;
        }
        writer.flush()?;
        return Ok(());
    }

    let mut out = io::stdout().lock();
    if sessions.is_empty() {
        writeln!(out, "No sessions recorded yet.")?;
        return Ok(());
    }

    for s in &sessions {
        writeln!(
            out,
            "{}  {:>6.1} wpm  {:>5.1}%  {:>3} errors  {}",
            s.completed_at.format("%Y-%m-%d %H:%M"),
            s.wpm,
            s.accuracy,
            s.errors,
            s.prompt
        )?;
    }

    let summary = HistorySummary::from_sessions(&sessions);
    writeln!(
        out,
        "\n{} sessions: {:.1} wpm average (±{:.1}), {:.1}% accuracy",
        summary.sessions, summary.mean_wpm, summary.wpm_std_dev, summary.mean_accuracy
    )?;

    let common = store.common_errors(limit)?;
    if !common.is_empty() {
        writeln!(out, "\nMost common mistakes:")?;
        for e in common {
            writeln!(out, "  {:?} typed as {:?}: {}", e.expected_char, e.typed_char, e.count)?;
        }
    }
    Ok(())
}
