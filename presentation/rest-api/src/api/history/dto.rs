use chrono::{DateTime, Utc};
use poem_openapi::Object;

use business::domain::execution::model::ExecutionRecord;

#[derive(Debug, Clone, Object)]
pub struct ExecutionRecordResponse {
    /// Execution unique identifier
    pub id: String,
    /// Audit routing key (caller principal or target host)
    pub routing_key: String,
    /// "command" or "script"
    pub kind: String,
    /// Command line or script content that was executed
    pub command: String,
    /// "succeeded" or "failed"
    pub status: String,
    /// Failure detail
    #[oai(skip_serializing_if_is_none)]
    pub error: Option<String>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: i64,
    /// When the execution finished
    pub created_at: DateTime<Utc>,
}

impl From<ExecutionRecord> for ExecutionRecordResponse {
    fn from(record: ExecutionRecord) -> Self {
        Self {
            id: record.id.to_string(),
            routing_key: record.routing_key,
            kind: record.kind.to_string(),
            command: record.command,
            status: record.status.to_string(),
            error: record.error,
            duration_ms: record.duration_ms,
            created_at: record.created_at,
        }
    }
}
