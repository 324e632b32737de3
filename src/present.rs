//! Derives what the user sees from a classified outcome.

use serde_json::json;

use crate::runner::ExecutionOutcome;

/// Shown in place of the runner's output whenever it reports a non-zero error.
pub const EXECUTION_FAILED_MESSAGE: &str = "Error occurred during execution.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presentation {
    /// Primary output region.
    pub display_output: String,
    /// Secondary inspection text (pretty JSON or `Error: ...`).
    pub raw_diagnostic: String,
    /// Runtime figure for display; absent values show as zero.
    pub execute_time: f64,
    /// Memory figure for display; absent values show as zero.
    pub memory: f64,
}

pub fn present(outcome: &ExecutionOutcome) -> Presentation {
    match outcome {
        ExecutionOutcome::Success {
            output,
            execute_time,
            memory,
        } => {
            let execute_time = execute_time.unwrap_or(0.0);
            let memory = memory.unwrap_or(0.0);
            let diag = json!({
                "error": 0,
                "output": output,
                "execute_time": execute_time,
                "memory": memory,
            });
            Presentation {
                display_output: output.clone(),
                raw_diagnostic: pretty(&diag),
                execute_time,
                memory,
            }
        }
        ExecutionOutcome::ExecutionFailure {
            raw_payload,
            execute_time,
            memory,
            ..
        } => Presentation {
            display_output: EXECUTION_FAILED_MESSAGE.to_string(),
            raw_diagnostic: pretty(raw_payload),
            execute_time: execute_time.unwrap_or(0.0),
            memory: memory.unwrap_or(0.0),
        },
        ExecutionOutcome::TransportFailure { message } => Presentation {
            display_output: String::new(),
            raw_diagnostic: format!("Error: {}", message),
            execute_time: 0.0,
            memory: 0.0,
        },
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shows_output() {
        let p = present(&ExecutionOutcome::Success {
            output: "4\n".into(),
            execute_time: None,
            memory: None,
        });
        assert_eq!(p.display_output, "4\n");
        assert_eq!(p.execute_time, 0.0);
        assert_eq!(p.memory, 0.0);
        let diag: serde_json::Value = serde_json::from_str(&p.raw_diagnostic).unwrap();
        assert_eq!(diag["execute_time"], json!(0.0));
        assert_eq!(diag["memory"], json!(0.0));
        assert_eq!(diag["output"], json!("4\n"));
    }

    #[test]
    fn test_success_keeps_reported_figures() {
        let p = present(&ExecutionOutcome::Success {
            output: String::new(),
            execute_time: Some(18.5),
            memory: Some(1024.0),
        });
        assert_eq!(p.execute_time, 18.5);
        assert_eq!(p.memory, 1024.0);
    }

    #[test]
    fn test_execution_failure_hides_cause() {
        let payload = json!({"error": 1, "output": "main.c:1: syntax error"});
        let p = present(&ExecutionOutcome::ExecutionFailure {
            error_code: 1,
            raw_payload: payload.clone(),
            execute_time: None,
            memory: Some(64.0),
        });
        assert_eq!(p.display_output, "Error occurred during execution.");
        assert!(p.raw_diagnostic.contains("main.c:1: syntax error"));
        let diag: serde_json::Value = serde_json::from_str(&p.raw_diagnostic).unwrap();
        assert_eq!(diag, payload);
        assert_eq!(p.execute_time, 0.0);
        assert_eq!(p.memory, 64.0);
    }

    #[test]
    fn test_transport_failure_clears_output() {
        let p = present(&ExecutionOutcome::TransportFailure {
            message: "Network Error".into(),
        });
        assert_eq!(p.display_output, "");
        assert_eq!(p.raw_diagnostic, "Error: Network Error");
        assert_eq!(p.execute_time, 0.0);
        assert_eq!(p.memory, 0.0);
    }
}
