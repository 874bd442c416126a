//! Serializable view of a report for polling front ends

use super::aggregate::{AggregatedReport, Cell};
use crate::error::PipelineError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub queue_id: String,
    pub columns: Vec<String>,
    pub rows: Vec<RowData>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowData {
    pub id: Option<String>,
    pub name: String,
    /// Column name to cell; every column is present
    pub capacities: BTreeMap<String, Cell>,
    pub fetch_failed: bool,
}

impl ReportData {
    pub fn from_report(queue_id: impl Into<String>, report: &AggregatedReport) -> Self {
        let rows = report
            .projection()
            .map(|(row, cells)| RowData {
                id: row.member.id.clone(),
                name: row.member.name.clone(),
                capacities: report.columns().iter().cloned().zip(cells).collect(),
                fetch_failed: row.is_failed(),
            })
            .collect();

        Self {
            queue_id: queue_id.into(),
            columns: report.columns().to_vec(),
            rows,
            generated_at: Utc::now(),
        }
    }
}

/// Payload handed to a poller when a run fails
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    pub error: String,
    pub kind: String,
    pub generated_at: DateTime<Utc>,
}

impl From<&PipelineError> for ErrorData {
    fn from(err: &PipelineError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Member, UtilizationRecord};
    use crate::report::{AgentRow, Aggregator};
    use serde_json::json;

    #[test]
    fn test_report_data_shape() {
        let report = Aggregator::default().aggregate(vec![
            AgentRow::fetched(
                Member::new("u1", "Ada"),
                UtilizationRecord::from_capacities([("voice", 2), ("chat", 0)]),
            ),
            AgentRow::failed(Member::new("u2", "Grace"), "timeout"),
        ]);

        let data = ReportData::from_report("queue-1", &report);
        let value = serde_json::to_value(&data).unwrap();

        assert_eq!(value["queueId"], "queue-1");
        assert_eq!(value["columns"], json!(["chat", "voice"]));
        assert_eq!(
            value["rows"][0],
            json!({
                "id": "u1",
                "name": "Ada",
                "capacities": { "chat": 0, "voice": 2 },
                "fetchFailed": false
            })
        );
        assert_eq!(value["rows"][1]["capacities"], json!({ "chat": "-", "voice": "-" }));
        assert_eq!(value["rows"][1]["fetchFailed"], true);
        assert!(value["generatedAt"].is_string());
    }

    #[test]
    fn test_error_data_from_pipeline_error() {
        let err = PipelineError::Auth(crate::error::AuthError::InvalidResponse("bad".to_string()));
        let data = ErrorData::from(&err);

        assert_eq!(data.kind, "auth");
        assert!(data.error.contains("bad"));
    }
}
