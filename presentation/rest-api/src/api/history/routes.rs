use std::sync::Arc;

use poem_openapi::{OpenApi, param::Query, payload::Json};

use business::domain::execution::use_cases::get_history::{
    GetExecutionHistoryParams, GetExecutionHistoryUseCase,
};

use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::history::dto::ExecutionRecordResponse;
use crate::api::security::ApiKeyAuth;
use crate::api::tags::ApiTags;

pub struct ExecutionsApi {
    get_history_use_case: Arc<dyn GetExecutionHistoryUseCase>,
}

impl ExecutionsApi {
    pub fn new(get_history_use_case: Arc<dyn GetExecutionHistoryUseCase>) -> Self {
        Self {
            get_history_use_case,
        }
    }
}

/// Execution audit API
#[OpenApi]
impl ExecutionsApi {
    /// Recent executions for a routing key
    ///
    /// Without `key` the caller sees their own history. `key` selects
    /// another routing key, typically a host name; an explicitly empty
    /// `key` reads the first shard across all keys.
    #[oai(path = "/executions", method = "get", tag = "ApiTags::Executions")]
    async fn recent(
        &self,
        auth: ApiKeyAuth,
        key: Query<Option<String>>,
        limit: Query<Option<u32>>,
    ) -> GetExecutionHistoryResponse {
        let routing_key = key.0.unwrap_or(auth.0);

        let params = GetExecutionHistoryParams {
            routing_key,
            limit: limit.0,
        };

        match self.get_history_use_case.execute(params).await {
            Ok(records) => {
                let responses: Vec<ExecutionRecordResponse> =
                    records.into_iter().map(|record| record.into()).collect();
                GetExecutionHistoryResponse::Ok(Json(responses))
            }
            Err(err) => {
                let (_status, json) = err.into_error_response();
                GetExecutionHistoryResponse::InternalError(json)
            }
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum GetExecutionHistoryResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<ExecutionRecordResponse>>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}
