//! Reqwest-based client for the runner's execute endpoint.
//!
//! `submit` never returns an error: every failure is folded into
//! [`ExecutionOutcome::TransportFailure`] so callers only ever handle values.

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;

mod types;

pub use types::{ExecutionOutcome, ExecutionRequest};
use types::RunnerReply;

const EXECUTE_PATH: &str = "/api/execute/";

/// Everything that can go wrong between sending a request and holding a
/// classified reply. The `Display` text is what the user sees after `Error: `.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network Error")]
    Network(#[source] reqwest::Error),

    #[error("timeout of {ms}ms exceeded")]
    Timeout { ms: u128 },

    #[error("Request failed with status code {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    Protocol(String),
}

#[derive(Debug, Clone)]
pub struct RunnerClient {
    http: Client,
    execute_url: String,
    timeout: Option<Duration>,
}

impl RunnerClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder.build()?;
        let execute_url = format!("{}{}", base_url.trim_end_matches('/'), EXECUTE_PATH);
        Ok(Self { http, execute_url, timeout })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.runner_base_url(), cfg.request_timeout()?)
    }

    pub fn execute_url(&self) -> &str {
        &self.execute_url
    }

    /// Send one request and classify the reply.
    pub async fn submit(&self, request: &ExecutionRequest) -> ExecutionOutcome {
        match self.try_submit(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(url = %self.execute_url, error = ?err, "runner request failed");
                ExecutionOutcome::TransportFailure {
                    message: err.to_string(),
                }
            }
        }
    }

    async fn try_submit(&self, request: &ExecutionRequest) -> Result<ExecutionOutcome, TransportError> {
        debug!(
            url = %self.execute_url,
            language = request.language(),
            script_len = request.script().len(),
            has_stdin = request.stdin().is_some(),
            "posting execution request"
        );

        let resp = self
            .http
            .post(&self.execute_url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = resp.text().await.map_err(|e| self.classify(e))?;
        let raw: Value = serde_json::from_str(&body)?;
        let reply: RunnerReply = serde_json::from_value(raw.clone())
            .map_err(|e| TransportError::Protocol(e.to_string()))?;

        Ok(ExecutionOutcome::from_reply(reply, raw))
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        match self.timeout {
            Some(t) if err.is_timeout() => TransportError::Timeout { ms: t.as_millis() },
            _ => TransportError::Network(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> RunnerClient {
        RunnerClient::new(&server.uri(), Some(Duration::from_secs(5))).unwrap()
    }

    #[test]
    fn test_execute_url_joins_trailing_slash() {
        let client = RunnerClient::new("http://localhost:3000/", None).unwrap();
        assert_eq!(client.execute_url(), "http://localhost:3000/api/execute/");
    }

    #[tokio::test]
    async fn test_success_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/execute/"))
            .and(body_json(json!({"language": "python", "script": "print(1+1)"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": 0,
                "output": "2\n",
                "execute_time": 31,
                "memory": 2048
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let req = ExecutionRequest::new("python", "print(1+1)", None);
        let outcome = client.submit(&req).await;

        assert_eq!(
            outcome,
            ExecutionOutcome::Success {
                output: "2\n".into(),
                execute_time: Some(31.0),
                memory: Some(2048.0),
            }
        );
    }

    #[tokio::test]
    async fn test_string_figures_keep_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/execute/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": 0,
                "output": "2\n",
                "execute_time": "0.012s",
                "memory": "1024"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let outcome = client
            .submit(&ExecutionRequest::new("python", "print(1+1)", None))
            .await;
        assert_eq!(
            outcome,
            ExecutionOutcome::Success {
                output: "2\n".into(),
                execute_time: None,
                memory: None,
            }
        );
    }

    #[tokio::test]
    async fn test_stdin_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/execute/"))
            .and(body_json(json!({"language": "c", "script": "x", "stdin": "5\n"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": 0, "output": "5"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let outcome = client
            .submit(&ExecutionRequest::new("c", "x", Some("5\n".into())))
            .await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_execution_failure_reply() {
        let server = MockServer::start().await;
        let payload = json!({"error": 1, "output": "syntax error"});
        Mock::given(method("POST"))
            .and(path("/api/execute/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let outcome = client
            .submit(&ExecutionRequest::new("cpp", "int main(){return", None))
            .await;

        assert_eq!(
            outcome,
            ExecutionOutcome::ExecutionFailure {
                error_code: 1,
                raw_payload: payload,
                execute_time: None,
                memory: None,
            }
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        match client.submit(&ExecutionRequest::new("java", "", None)).await {
            ExecutionOutcome::TransportFailure { message } => {
                assert!(message.starts_with("Malformed response"), "got: {}", message)
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_error_field_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "hi"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let outcome = client.submit(&ExecutionRequest::new("nodejs", "", None)).await;
        assert!(matches!(outcome, ExecutionOutcome::TransportFailure { .. }));
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": 0, "output": "x"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let outcome = client.submit(&ExecutionRequest::new("nodejs", "", None)).await;
        assert_eq!(
            outcome,
            ExecutionOutcome::TransportFailure {
                message: "Request failed with status code 500".into()
            }
        );
    }

    #[tokio::test]
    async fn test_timeout_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"error": 0, "output": ""}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = RunnerClient::new(&server.uri(), Some(Duration::from_millis(50))).unwrap();
        let outcome = client.submit(&ExecutionRequest::new("nodejs", "", None)).await;
        assert_eq!(
            outcome,
            ExecutionOutcome::TransportFailure {
                message: "timeout of 50ms exceeded".into()
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_runner_is_network_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RunnerClient::new(&format!("http://{}", addr), None).unwrap();
        let outcome = client.submit(&ExecutionRequest::new("nodejs", "1", None)).await;
        assert_eq!(
            outcome,
            ExecutionOutcome::TransportFailure {
                message: "Network Error".into()
            }
        );
    }
}
