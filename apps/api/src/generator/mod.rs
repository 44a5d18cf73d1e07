//! Generator invoker — the single point of entry for running the external content scripts.
//!
//! No other module spawns generator processes. Every process-level failure comes back
//! as a `GeneratorError`, never as a raw I/O or serde error.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::config::GeneratorConfig;

pub mod output;
#[cfg(test)]
pub mod stub;

/// Longest stderr excerpt carried inside an error.
const STDERR_EXCERPT_CHARS: usize = 2000;

/// The generator scripts this service knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    CareerContent,
    CareerPath,
    GrowthChart,
}

impl Script {
    pub fn file_name(self) -> &'static str {
        match self {
            Script::CareerContent => "career_content_generator.py",
            Script::CareerPath => "career_path_suggestor.py",
            Script::GrowthChart => "growth_chart_generator.py",
        }
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Script::CareerContent => "career_content",
            Script::CareerPath => "career_path",
            Script::GrowthChart => "growth_chart",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to spawn {script}: {source}")]
    Spawn {
        script: Script,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while waiting for {script}: {source}")]
    Io {
        script: Script,
        #[source]
        source: std::io::Error,
    },

    #[error("generator exited with code {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("generator timed out after {0:?}")]
    Timeout(Duration),

    #[error("generator output is not valid JSON: {0}")]
    MalformedOutput(String),

    #[error("generator produced no result")]
    Empty,

    #[error("generator reported an error: {0}")]
    ErrorMarker(String),

    #[error("generator output has an unexpected shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("generator output failed validation: {0}")]
    Invalid(String),
}

/// Runs a generator script and returns its structured result.
///
/// Carried in `AppState` as `Arc<dyn Generator>` so tests can swap in a stub.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn invoke(&self, script: Script, args: &[String]) -> Result<Value, GeneratorError>;
}

/// Invokes `script` and deserializes its result into `T`.
pub async fn invoke_typed<T: DeserializeOwned>(
    generator: &dyn Generator,
    script: Script,
    args: &[String],
) -> Result<T, GeneratorError> {
    let value = generator.invoke(script, args).await?;
    Ok(serde_json::from_value(value)?)
}

/// Runs scripts as `<interpreter> <scripts_dir>/<file> <args...>` without a shell.
#[derive(Debug, Clone)]
pub struct ScriptGenerator {
    interpreter: String,
    scripts_dir: PathBuf,
    timeout: Option<Duration>,
}

impl ScriptGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            interpreter: config.interpreter.clone(),
            scripts_dir: config.scripts_dir.clone(),
            timeout: config.timeout,
        }
    }
}

#[async_trait]
impl Generator for ScriptGenerator {
    async fn invoke(&self, script: Script, args: &[String]) -> Result<Value, GeneratorError> {
        let script_path = self.scripts_dir.join(script.file_name());
        debug!(
            "Running generator {script}: {} {} ({} args)",
            self.interpreter,
            script_path.display(),
            args.len()
        );

        // The child is killed if this future is dropped (client disconnect or timeout).
        let child = Command::new(&self.interpreter)
            .arg(&script_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                error!("Failed to spawn generator {script}: {source}");
                GeneratorError::Spawn { script, source }
            })?;

        let started = Instant::now();
        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| GeneratorError::Timeout(limit))?,
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(|source| GeneratorError::Io { script, source })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr: String = stderr.trim().chars().take(STDERR_EXCERPT_CHARS).collect();
            return Err(GeneratorError::NonZeroExit {
                code: output.status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let value = output::parse_output(&stdout)?;

        info!(
            "Generator {script} completed in {}ms",
            started.elapsed().as_millis()
        );
        Ok(value)
    }
}
