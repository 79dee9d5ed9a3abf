use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use business::domain::execution::duration::format_duration;
use business::domain::execution::errors::ExecutionError;
use business::domain::execution::executor::RemoteExecutor;
use business::domain::execution::model::{ExecutionOutput, ShellInput, ShellJob};

use crate::client::AgentClient;

/// Extra client-side allowance on top of the deadline the remote agent
/// already enforces itself.
const NETWORK_MARGIN: Duration = Duration::from_secs(5);

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ShellRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

impl ShellRequest {
    fn from_job(job: &ShellJob) -> Self {
        let (cmd, script) = match &job.input {
            ShellInput::Command(text) => (Some(STANDARD.encode(text)), None),
            ShellInput::Script(text) => (None, Some(STANDARD.encode(text))),
        };

        Self {
            cmd,
            script,
            shell: job.shell.clone(),
            timeout: job.timeout.map(format_duration),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ShellResult {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub error: String,
}

impl ShellResult {
    fn into_outcome(self) -> Result<ExecutionOutput, ExecutionError> {
        let stdout = decode_field(&self.stdout, "stdout")?;
        let stderr = decode_field(&self.stderr, "stderr")?;
        let error = decode_field(&self.error, "error")?;

        if error.is_empty() {
            Ok(ExecutionOutput { stdout, stderr })
        } else {
            Err(ExecutionError::RemoteFailed {
                detail: error,
                stdout,
                stderr,
            })
        }
    }
}

fn decode_field(value: &str, field: &str) -> Result<String, ExecutionError> {
    if value.is_empty() {
        return Ok(String::new());
    }

    let bytes = STANDARD
        .decode(value)
        .map_err(|err| ExecutionError::Transport {
            reason: format!("invalid base64 in agent response field '{field}': {err}"),
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Runs shell jobs on remote hosts through their agent's shell endpoint.
pub struct HttpRemoteExecutor {
    client: AgentClient,
}

impl HttpRemoteExecutor {
    pub fn new(client: AgentClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteExecutor for HttpRemoteExecutor {
    async fn run_on(&self, host: &str, job: &ShellJob) -> Result<ExecutionOutput, ExecutionError> {
        let url = self.client.shell_url(host);

        let mut request = self
            .client
            .client
            .post(&url)
            .json(&ShellRequest::from_job(job));
        if let Some(key) = self.client.api_key() {
            request = request.header("X-Api-Key", key);
        }
        if let Some(timeout) = job.timeout.filter(|t| !t.is_zero()) {
            request = request.timeout(timeout + NETWORK_MARGIN);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ExecutionError::Transport {
                reason: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExecutionError::Transport {
                reason: format!("{} returned {}", url, status),
            });
        }

        let result: ShellResult =
            response
                .json()
                .await
                .map_err(|err| ExecutionError::Transport {
                    reason: err.to_string(),
                })?;
        result.into_outcome()
    }
}
