use std::sync::Arc;

use poem_openapi::{OpenApi, param::Path, payload::Json};

use business::domain::execution::use_cases::run_remote::{
    RunRemoteShellParams, RunRemoteShellUseCase,
};
use business::domain::execution::use_cases::run_shell::{RunShellParams, RunShellUseCase};

use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::security::ApiKeyAuth;
use crate::api::shell::dto::{ShellRequest, ShellResponse};
use crate::api::tags::ApiTags;

pub struct ShellApi {
    run_use_case: Arc<dyn RunShellUseCase>,
    run_remote_use_case: Arc<dyn RunRemoteShellUseCase>,
}

impl ShellApi {
    pub fn new(
        run_use_case: Arc<dyn RunShellUseCase>,
        run_remote_use_case: Arc<dyn RunRemoteShellUseCase>,
    ) -> Self {
        Self {
            run_use_case,
            run_remote_use_case,
        }
    }
}

/// Shell execution API
///
/// Runs commands and scripts on this host or on remote hosts. A finished
/// job always answers 200, failed ones included; the `error` field carries
/// the failure detail. 400 is reserved for requests that never started a
/// job.
#[OpenApi]
impl ShellApi {
    /// Execute a command or script on this host
    ///
    /// The authenticated key name becomes the audit routing key.
    #[oai(path = "/shell", method = "post", tag = "ApiTags::Shell")]
    async fn run(&self, auth: ApiKeyAuth, body: Json<ShellRequest>) -> RunShellApiResponse {
        let job = match body.0.into_job() {
            Ok(job) => job,
            Err(response) => return RunShellApiResponse::BadRequest(Json(response)),
        };

        let params = RunShellParams {
            routing_key: auth.0,
            job,
        };

        match self.run_use_case.execute(params).await {
            Ok(output) => RunShellApiResponse::Ok(Json(ShellResponse::succeeded(&output))),
            Err(err) => match ShellResponse::from_execution_failure(&err) {
                Some(body) => RunShellApiResponse::Ok(Json(body)),
                None => {
                    let (status, json) = err.into_error_response();
                    match status.as_u16() {
                        400 => RunShellApiResponse::BadRequest(json),
                        _ => RunShellApiResponse::InternalError(json),
                    }
                }
            },
        }
    }

    /// Execute a command or script on a remote host
    ///
    /// Uses the configured remote transport (ssh or http agent). The target
    /// host becomes the audit routing key, so one host's history shards
    /// together.
    #[oai(path = "/hosts/:host/shell", method = "post", tag = "ApiTags::Shell")]
    async fn run_on_host(
        &self,
        _auth: ApiKeyAuth,
        host: Path<String>,
        body: Json<ShellRequest>,
    ) -> RunShellApiResponse {
        let job = match body.0.into_job() {
            Ok(job) => job,
            Err(response) => return RunShellApiResponse::BadRequest(Json(response)),
        };

        let params = RunRemoteShellParams { host: host.0, job };

        match self.run_remote_use_case.execute(params).await {
            Ok(output) => RunShellApiResponse::Ok(Json(ShellResponse::succeeded(&output))),
            Err(err) => match ShellResponse::from_execution_failure(&err) {
                Some(body) => RunShellApiResponse::Ok(Json(body)),
                None => {
                    let (status, json) = err.into_error_response();
                    match status.as_u16() {
                        400 => RunShellApiResponse::BadRequest(json),
                        _ => RunShellApiResponse::InternalError(json),
                    }
                }
            },
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum RunShellApiResponse {
    #[oai(status = 200)]
    Ok(Json<ShellResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use business::domain::execution::errors::ExecutionError;
    use business::domain::execution::model::{ExecutionOutput, ShellInput};
    use mockall::mock;
    use poem::Route;
    use poem::http::StatusCode;
    use poem::test::TestClient;
    use poem_openapi::OpenApiService;

    use crate::api::security::install_api_keys;

    mock! {
        RunShell {}

        #[async_trait::async_trait]
        impl RunShellUseCase for RunShell {
            async fn execute(
                &self,
                params: RunShellParams,
            ) -> Result<ExecutionOutput, ExecutionError>;
        }
    }

    mock! {
        RunRemote {}

        #[async_trait::async_trait]
        impl RunRemoteShellUseCase for RunRemote {
            async fn execute(
                &self,
                params: RunRemoteShellParams,
            ) -> Result<ExecutionOutput, ExecutionError>;
        }
    }

    // Every test installs the same keyring, so parallel tests never see a
    // different map through the shared static.
    fn test_client(run: MockRunShell, remote: MockRunRemote) -> TestClient<Route> {
        install_api_keys(&[
            ("deploy".to_string(), "s3cr3t".to_string()),
            ("ops".to_string(), "0th3r".to_string()),
        ]);
        let api = ShellApi::new(Arc::new(run), Arc::new(remote));
        let service = OpenApiService::new(api, "test", "0.0.0");
        TestClient::new(Route::new().nest("/", service))
    }

    #[tokio::test]
    async fn should_execute_command_under_the_callers_key_name() {
        let mut run = MockRunShell::new();
        run.expect_execute()
            .withf(|params| {
                params.routing_key == "deploy"
                    && matches!(params.job.input, ShellInput::Command(ref c) if c == "uptime")
            })
            .times(1)
            .returning(|_| {
                Ok(ExecutionOutput {
                    stdout: "up 3 days".to_string(),
                    stderr: String::new(),
                })
            });

        let cli = test_client(run, MockRunRemote::new());
        let response = cli
            .post("/shell")
            .header("X-Api-Key", "s3cr3t")
            .body_json(&serde_json::json!({ "cmd": STANDARD.encode("uptime") }))
            .send()
            .await;

        response.assert_status_is_ok();
        let json = response.json().await;
        let body = json.value();
        assert_eq!(
            body.object().get("stdout").string(),
            STANDARD.encode("up 3 days")
        );
        assert_eq!(body.object().get("error").string(), "");
    }

    #[tokio::test]
    async fn should_answer_200_with_failure_detail_when_command_fails() {
        let mut run = MockRunShell::new();
        run.expect_execute().returning(|_| {
            Err(ExecutionError::CommandFailed {
                code: Some(2),
                stdout: String::new(),
                stderr: "oops".to_string(),
            })
        });

        let cli = test_client(run, MockRunRemote::new());
        let response = cli
            .post("/shell")
            .header("X-Api-Key", "s3cr3t")
            .body_json(&serde_json::json!({ "cmd": STANDARD.encode("false") }))
            .send()
            .await;

        response.assert_status_is_ok();
        let json = response.json().await;
        let body = json.value();
        assert_eq!(
            body.object().get("error").string(),
            STANDARD.encode("exit status 2")
        );
        assert_eq!(
            body.object().get("stderr").string(),
            STANDARD.encode("oops")
        );
    }

    #[tokio::test]
    async fn should_answer_400_when_neither_cmd_nor_script_is_given() {
        let cli = test_client(MockRunShell::new(), MockRunRemote::new());
        let response = cli
            .post("/shell")
            .header("X-Api-Key", "s3cr3t")
            .body_json(&serde_json::json!({}))
            .send()
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let json = response.json().await;
        let body = json.value();
        assert_eq!(body.object().get("name").string(), "ValidationError");
    }

    #[tokio::test]
    async fn should_answer_401_for_an_unknown_api_key() {
        let cli = test_client(MockRunShell::new(), MockRunRemote::new());
        let response = cli
            .post("/shell")
            .header("X-Api-Key", "wrong")
            .body_json(&serde_json::json!({ "cmd": STANDARD.encode("uptime") }))
            .send()
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_route_remote_jobs_by_target_host() {
        let mut remote = MockRunRemote::new();
        remote
            .expect_execute()
            .withf(|params| params.host == "web1")
            .times(1)
            .returning(|_| Ok(ExecutionOutput::default()));

        let cli = test_client(MockRunShell::new(), remote);
        let response = cli
            .post("/hosts/web1/shell")
            .header("X-Api-Key", "s3cr3t")
            .body_json(&serde_json::json!({ "cmd": STANDARD.encode("uptime") }))
            .send()
            .await;

        response.assert_status_is_ok();
    }
}
