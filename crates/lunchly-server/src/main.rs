//! Lunchly server binary.
//!
//! Config path comes from the first CLI argument, then `LUNCHLY_CONFIG_PATH`,
//! then `config.toml`. A startup failure is printed to stderr and the process
//! exits non-zero.

use lunchly_db::{MigrationError, PoolError};
use lunchly_server::config::{self, Config, ConfigError};
use lunchly_server::{app, AppState};
use std::net::SocketAddr;
use std::process::ExitCode;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Pool(#[from] PoolError),
    #[error("migrations: {0}")]
    Migration(#[from] MigrationError),
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("server: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "lunchly server failed");
            eprintln!("lunchly-server: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let (path, source) = config_path(
        std::env::args().nth(1),
        std::env::var("LUNCHLY_CONFIG_PATH").ok(),
    );
    let config = config::load_config(Some(&path))?;
    init_logging(&config);
    tracing::info!(path = %path, source, "loaded configuration");

    let pool =
        lunchly_db::create_pool(&config.database.path, config.database.runtime_settings())?;
    {
        let conn = pool.get().map_err(PoolError::from)?;
        let applied = lunchly_db::run_migrations(&conn)?;
        tracing::info!(applied, path = %config.database.path, "database ready");
    }

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app(AppState { pool }))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("shut down cleanly");
    Ok(())
}

/// Picks the config file: CLI argument over environment over the default.
/// Blank values count as absent.
fn config_path(arg: Option<String>, env: Option<String>) -> (String, &'static str) {
    let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    if let Some(path) = non_blank(arg) {
        return (path, "argument");
    }
    if let Some(path) = non_blank(env) {
        return (path, "environment");
    }
    (DEFAULT_CONFIG_PATH.to_string(), "default")
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT received, draining connections"),
        () = terminate => tracing::info!("SIGTERM received, draining connections"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_prefers_argument_then_environment() {
        let some = |s: &str| Some(s.to_string());

        assert_eq!(
            config_path(some("cli.toml"), some("env.toml")),
            ("cli.toml".to_string(), "argument")
        );
        assert_eq!(
            config_path(some("  "), some("env.toml")),
            ("env.toml".to_string(), "environment")
        );
        assert_eq!(
            config_path(None, some("")),
            (DEFAULT_CONFIG_PATH.to_string(), "default")
        );
    }

    #[test]
    fn unparsable_config_is_a_startup_error() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[server\nport = ").expect("failed to write config");

        let err = config::load_config(path.to_str())
            .map_err(StartupError::from)
            .expect_err("broken config should fail");
        assert!(matches!(err, StartupError::Config(ConfigError::Parse(_))));
        assert!(err.to_string().starts_with("configuration: failed to parse"));
    }
}
