use business::domain::execution::model::{ExecutionKind, ExecutionRecord, ExecutionStatus};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for an audited execution.
#[derive(Debug, FromRow)]
pub struct ExecutionRecordEntity {
    pub id: Uuid,
    pub routing_key: String,
    pub kind: String,
    pub command: String,
    pub status: String,
    pub error: Option<String>,
    pub duration_ms: i64,
    pub created_at: DateTime<Utc>,
}

impl ExecutionRecordEntity {
    pub fn into_domain(self) -> ExecutionRecord {
        ExecutionRecord::from_repository(
            self.id,
            self.routing_key,
            self.kind.parse::<ExecutionKind>().unwrap_or(ExecutionKind::Command),
            self.command,
            self.status.parse::<ExecutionStatus>().unwrap_or(ExecutionStatus::Failed),
            self.error,
            self.duration_ms,
            self.created_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(kind: &str, status: &str) -> ExecutionRecordEntity {
        ExecutionRecordEntity {
            id: Uuid::new_v4(),
            routing_key: "tenant7".to_string(),
            kind: kind.to_string(),
            command: "uptime".to_string(),
            status: status.to_string(),
            error: None,
            duration_ms: 12,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn should_map_row_into_domain_record() {
        let record = entity("script", "succeeded").into_domain();

        assert_eq!(record.kind, ExecutionKind::Script);
        assert_eq!(record.status, ExecutionStatus::Succeeded);
        assert_eq!(record.routing_key, "tenant7");
        assert_eq!(record.command, "uptime");
    }

    #[test]
    fn should_fall_back_to_defaults_when_columns_hold_unknown_values() {
        let record = entity("garbage", "garbage").into_domain();

        assert_eq!(record.kind, ExecutionKind::Command);
        assert_eq!(record.status, ExecutionStatus::Failed);
    }
}
