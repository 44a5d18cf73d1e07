//! In-process generator used by handler and orchestration tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::generator::{Generator, GeneratorError, Script};

#[derive(Debug, Clone)]
pub enum StubReply {
    Json(Value),
    Marker(String),
}

/// Replies with a fixed result per script and records every invocation.
#[derive(Default)]
pub struct StubGenerator {
    replies: HashMap<Script, StubReply>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(Script, Vec<String>)>>,
}

impl StubGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, script: Script, reply: StubReply) -> Self {
        self.replies.insert(script, reply);
        self
    }

    pub fn with_json(self, script: Script, value: Value) -> Self {
        self.reply(script, StubReply::Json(value))
    }

    /// Makes every invocation sleep first, so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<(Script, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, script: Script) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == script)
            .count()
    }
}

#[async_trait]
impl Generator for StubGenerator {
    async fn invoke(&self, script: Script, args: &[String]) -> Result<Value, GeneratorError> {
        self.calls.lock().unwrap().push((script, args.to_vec()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.replies.get(&script) {
            Some(StubReply::Json(value)) => super::output::parse_output(&value.to_string()),
            Some(StubReply::Marker(message)) => Err(GeneratorError::ErrorMarker(message.clone())),
            None => Err(GeneratorError::Empty),
        }
    }
}
