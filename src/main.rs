use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

mod config;
mod controllers;
mod db;
mod migrator;
mod models;
mod routers;
#[cfg(test)]
mod testing;

use config::Config;
use controllers::SongController;
use db::Database;
use routers::AppState;

/// What the binary does for this invocation: `song-library` serves,
/// `song-library migrate` applies pending migrations and exits.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Serve,
    Migrate,
}

impl Command {
    fn from_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        match args.into_iter().nth(1).as_deref() {
            None | Some("serve") => Ok(Command::Serve),
            Some("migrate") => Ok(Command::Migrate),
            Some(other) => anyhow::bail!("unknown command {:?}, expected serve or migrate", other),
        }
    }
}

/// `RUST_LOG` directives when set, debug for everything otherwise.
fn log_filter(directives: Option<String>) -> EnvFilter {
    match directives {
        Some(raw) if !raw.trim().is_empty() => EnvFilter::new(raw),
        _ => EnvFilter::new("debug"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_target(false)
        .init();

    let command = Command::from_args(std::env::args())?;

    match dotenvy::dotenv() {
        Ok(path) => info!(".env loaded from {}", path.display()),
        Err(_) => warn!("No .env file found, using process environment"),
    }

    let config = Config::from_env();

    let database = Database::connect(&config.db.connection_url())
        .await
        .with_context(|| {
            format!(
                "failed to connect to database at {}:{}",
                config.db.host, config.db.port
            )
        })?;
    info!("Connected to PostgreSQL database");

    migrator::apply_migrations(database.pool())
        .await
        .context("failed to run database migrations")?;

    if command == Command::Migrate {
        info!("Migrations applied, exiting");
        return Ok(());
    }

    let songs = SongController::new(Arc::new(database), &config.external_api_url);
    let app = routers::app(AppState {
        songs: Arc::new(songs),
    });

    let addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Song library listening on {} ({})", addr, config.api.base_url);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn rust_log_overrides_debug_default() {
        assert_eq!(log_filter(Some("info".to_string())).to_string(), "info");
        assert_eq!(log_filter(None).to_string(), "debug");
        assert_eq!(log_filter(Some(" ".to_string())).to_string(), "debug");
    }

    #[test]
    fn picks_command_from_first_argument() {
        assert_eq!(Command::from_args(args(&["song-library"])).unwrap(), Command::Serve);
        assert_eq!(
            Command::from_args(args(&["song-library", "serve"])).unwrap(),
            Command::Serve
        );
        assert_eq!(
            Command::from_args(args(&["song-library", "migrate"])).unwrap(),
            Command::Migrate
        );
        assert!(Command::from_args(args(&["song-library", "seed"])).is_err());
    }
}
