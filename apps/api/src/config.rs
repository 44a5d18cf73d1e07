use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub generator: GeneratorConfig,
    pub rust_log: String,
}

/// How generator scripts are located and executed.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub interpreter: String,
    pub scripts_dir: PathBuf,
    /// `None` means the child is allowed to run until it exits on its own.
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests never touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .context("Required environment variable 'DATABASE_URL' is not set")?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?;

        let timeout = match lookup("GENERATOR_TIMEOUT_SECS") {
            Some(raw) if !raw.trim().is_empty() => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .context("GENERATOR_TIMEOUT_SECS must be a whole number of seconds")?;
                Some(Duration::from_secs(secs))
            }
            _ => None,
        };

        Ok(Config {
            database_url,
            database_max_connections,
            port,
            generator: GeneratorConfig {
                interpreter: lookup("GENERATOR_INTERPRETER")
                    .unwrap_or_else(|| "python3".to_string()),
                scripts_dir: lookup("GENERATOR_SCRIPTS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("./ai")),
                timeout,
            },
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
