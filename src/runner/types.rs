//! Wire and outcome types exchanged with the runner.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /api/execute/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    language: String,
    script: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stdin: Option<String>,
}

impl ExecutionRequest {
    /// An empty `stdin` is dropped so the key never reaches the wire.
    pub fn new(language: impl Into<String>, script: impl Into<String>, stdin: Option<String>) -> Self {
        Self {
            language: language.into(),
            script: script.into(),
            stdin: stdin.filter(|s| !s.is_empty()),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn stdin(&self) -> Option<&str> {
        self.stdin.as_deref()
    }
}

/// The subset of the runner's reply the client interprets.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RunnerReply {
    pub error: i64,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default, deserialize_with = "number_or_none")]
    pub execute_time: Option<f64>,
    #[serde(default, deserialize_with = "number_or_none")]
    pub memory: Option<f64>,
}

/// Figures are informational; anything that is not a JSON number reads as absent.
fn number_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_f64))
}

/// Classified result of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Success {
        output: String,
        execute_time: Option<f64>,
        memory: Option<f64>,
    },
    ExecutionFailure {
        error_code: i64,
        raw_payload: Value,
        execute_time: Option<f64>,
        memory: Option<f64>,
    },
    TransportFailure {
        message: String,
    },
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success { .. })
    }

    /// Short tag used in logs and the status bar.
    pub fn kind(&self) -> &'static str {
        match self {
            ExecutionOutcome::Success { .. } => "success",
            ExecutionOutcome::ExecutionFailure { .. } => "execution-failure",
            ExecutionOutcome::TransportFailure { .. } => "transport-failure",
        }
    }

    /// Classify a reply that already parsed as JSON.
    pub(crate) fn from_reply(reply: RunnerReply, raw: Value) -> Self {
        if reply.error == 0 {
            let output = match reply.output {
                Some(Value::String(s)) => s,
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            ExecutionOutcome::Success {
                output,
                execute_time: reply.execute_time,
                memory: reply.memory,
            }
        } else {
            ExecutionOutcome::ExecutionFailure {
                error_code: reply.error,
                raw_payload: raw,
                execute_time: reply.execute_time,
                memory: reply.memory,
            }
        }
    }
}
