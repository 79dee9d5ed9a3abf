use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use poem_openapi::Object;

use business::domain::execution::duration::parse_duration;
use business::domain::execution::errors::ExecutionError;
use business::domain::execution::model::{ExecutionOutput, ShellInput, ShellJob};

use crate::api::error::ErrorResponse;

/// Wire request for the shell endpoints. `cmd` and `script` carry base64;
/// when both are present `cmd` wins.
#[derive(Debug, Clone, Object)]
pub struct ShellRequest {
    /// Base64-encoded command line
    #[oai(skip_serializing_if_is_none)]
    pub cmd: Option<String>,
    /// Base64-encoded script content, written to a file and executed
    #[oai(skip_serializing_if_is_none)]
    pub script: Option<String>,
    /// Shell override for this job
    #[oai(skip_serializing_if_is_none)]
    pub shell: Option<String>,
    /// Timeout override: "30s", "5m", "500ms" or plain seconds
    #[oai(skip_serializing_if_is_none)]
    pub timeout: Option<String>,
}

impl ShellRequest {
    /// Decodes the wire fields into a validated job.
    pub fn into_job(self) -> Result<ShellJob, ErrorResponse> {
        let input = match (&self.cmd, &self.script) {
            (Some(cmd), _) if !cmd.is_empty() => ShellInput::Command(decode_base64("cmd", cmd)?),
            (_, Some(script)) if !script.is_empty() => {
                ShellInput::Script(decode_base64("script", script)?)
            }
            _ => return Err(ErrorResponse::validation("execution.empty_input")),
        };

        let timeout = match &self.timeout {
            Some(raw) if !raw.is_empty() => Some(parse_duration(raw).map_err(|_| {
                ErrorResponse::validation(format!("execution.invalid_timeout: {raw}"))
            })?),
            _ => None,
        };

        let shell = self.shell.filter(|shell| !shell.is_empty());

        ShellJob::new(input, shell, timeout)
            .map_err(|_| ErrorResponse::validation("execution.empty_input"))
    }
}

fn decode_base64(field: &str, value: &str) -> Result<String, ErrorResponse> {
    let bytes = STANDARD
        .decode(value)
        .map_err(|_| ErrorResponse::validation(format!("shell.invalid_base64: {field}")))?;

    String::from_utf8(bytes)
        .map_err(|_| ErrorResponse::validation(format!("shell.invalid_utf8: {field}")))
}

/// Wire response for the shell endpoints. All three fields are base64;
/// `error` is empty when the job succeeded.
#[derive(Debug, Clone, Object)]
pub struct ShellResponse {
    /// Base64-encoded standard output
    pub stdout: String,
    /// Base64-encoded standard error
    pub stderr: String,
    /// Base64-encoded failure detail, empty on success
    pub error: String,
}

impl ShellResponse {
    pub fn succeeded(output: &ExecutionOutput) -> Self {
        Self {
            stdout: STANDARD.encode(&output.stdout),
            stderr: STANDARD.encode(&output.stderr),
            error: String::new(),
        }
    }

    /// Maps an execution failure onto the wire. Failures of the job itself
    /// still answer 200 with the captured streams and a failure detail;
    /// request-side errors return `None` and go through the error mapper.
    pub fn from_execution_failure(err: &ExecutionError) -> Option<Self> {
        match err {
            ExecutionError::CommandFailed { stdout, stderr, .. }
            | ExecutionError::RemoteFailed { stdout, stderr, .. } => Some(Self {
                stdout: STANDARD.encode(stdout),
                stderr: STANDARD.encode(stderr),
                error: STANDARD.encode(err.detail()),
            }),
            ExecutionError::Launch { .. }
            | ExecutionError::Timeout { .. }
            | ExecutionError::Transport { .. } => Some(Self {
                stdout: String::new(),
                stderr: String::new(),
                error: STANDARD.encode(err.detail()),
            }),
            ExecutionError::EmptyInput
            | ExecutionError::InvalidTimeout { .. }
            | ExecutionError::Repository(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn encode(text: &str) -> String {
        STANDARD.encode(text)
    }

    #[test]
    fn should_prefer_cmd_over_script() {
        let request = ShellRequest {
            cmd: Some(encode("uptime")),
            script: Some(encode("#!/bin/sh\nuptime")),
            shell: None,
            timeout: None,
        };

        let job = request.into_job().unwrap();

        assert!(matches!(job.input, ShellInput::Command(ref c) if c == "uptime"));
    }

    #[test]
    fn should_fall_back_to_script_when_cmd_is_empty() {
        let request = ShellRequest {
            cmd: Some(String::new()),
            script: Some(encode("echo hi")),
            shell: None,
            timeout: None,
        };

        let job = request.into_job().unwrap();

        assert!(matches!(job.input, ShellInput::Script(_)));
    }

    #[test]
    fn should_reject_request_without_cmd_or_script() {
        let request = ShellRequest {
            cmd: None,
            script: None,
            shell: None,
            timeout: None,
        };

        let err = request.into_job().unwrap_err();

        assert_eq!(err.name, "ValidationError");
        assert_eq!(err.message, "execution.empty_input");
    }

    #[test]
    fn should_reject_invalid_base64() {
        let request = ShellRequest {
            cmd: Some("not base64!!!".to_string()),
            script: None,
            shell: None,
            timeout: None,
        };

        let err = request.into_job().unwrap_err();

        assert!(err.message.contains("shell.invalid_base64"));
        assert!(err.message.contains("cmd"));
    }

    #[test]
    fn should_parse_timeout_and_shell_overrides() {
        let request = ShellRequest {
            cmd: Some(encode("uptime")),
            script: None,
            shell: Some("zsh".to_string()),
            timeout: Some("30s".to_string()),
        };

        let job = request.into_job().unwrap();

        assert_eq!(job.shell.as_deref(), Some("zsh"));
        assert_eq!(job.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn should_reject_malformed_timeout() {
        let request = ShellRequest {
            cmd: Some(encode("uptime")),
            script: None,
            shell: None,
            timeout: Some("soon".to_string()),
        };

        let err = request.into_job().unwrap_err();

        assert!(err.message.contains("execution.invalid_timeout"));
    }

    #[test]
    fn should_relay_streams_for_failed_commands() {
        let err = ExecutionError::CommandFailed {
            code: Some(2),
            stdout: "partial".to_string(),
            stderr: "oops".to_string(),
        };

        let response = ShellResponse::from_execution_failure(&err).unwrap();

        assert_eq!(response.stdout, encode("partial"));
        assert_eq!(response.stderr, encode("oops"));
        assert_eq!(response.error, encode("exit status 2"));
    }

    #[test]
    fn should_not_map_request_side_errors_onto_the_wire() {
        assert!(ShellResponse::from_execution_failure(&ExecutionError::EmptyInput).is_none());
    }

    #[test]
    fn should_leave_error_empty_on_success() {
        let output = ExecutionOutput {
            stdout: "up 3 days".to_string(),
            stderr: String::new(),
        };

        let response = ShellResponse::succeeded(&output);

        assert_eq!(response.stdout, encode("up 3 days"));
        assert_eq!(response.stderr, "");
        assert_eq!(response.error, "");
    }
}
