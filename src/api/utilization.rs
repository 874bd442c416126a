use super::client::{RoutingClient, error_body};
use super::models::{Member, UtilizationRecord, UtilizationResponse};
use crate::error::UtilizationFetchError;

/// Result of fetching one agent's utilization
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(UtilizationRecord),
    Failed(UtilizationFetchError),
}

impl FetchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }

    /// The fetched record, or an empty one if the fetch failed
    pub fn into_record(self) -> UtilizationRecord {
        match self {
            FetchOutcome::Fetched(record) => record,
            FetchOutcome::Failed(_) => UtilizationRecord::new(),
        }
    }
}

/// Fetches per-agent utilization scoped to one queue
#[derive(Debug, Clone)]
pub struct UtilizationFetcher {
    client: RoutingClient,
    queue_id: String,
}

impl UtilizationFetcher {
    pub fn new(client: RoutingClient, queue_id: impl Into<String>) -> Self {
        Self {
            client,
            queue_id: queue_id.into(),
        }
    }

    /// Fetch one member's utilization. Never fails: errors are logged,
    /// counted and returned as [`FetchOutcome::Failed`].
    pub async fn fetch_utilization(&self, token: &str, member: &Member) -> FetchOutcome {
        match self.try_fetch(token, member).await {
            Ok(record) => {
                self.client.metrics().record_utilization(true);
                log::debug!(
                    "Fetched utilization for {} ({} channels)",
                    member.name,
                    record.len()
                );
                FetchOutcome::Fetched(record)
            }
            Err(err) => {
                self.client.metrics().record_utilization(false);
                log::warn!(
                    "Utilization unavailable for {} ({}): {}",
                    member.name,
                    member.id.as_deref().unwrap_or("no id"),
                    err
                );
                FetchOutcome::Failed(err)
            }
        }
    }

    async fn try_fetch(
        &self,
        token: &str,
        member: &Member,
    ) -> Result<UtilizationRecord, UtilizationFetchError> {
        let user_id = member
            .id
            .as_deref()
            .ok_or_else(|| UtilizationFetchError::MissingUserId(member.name.clone()))?;

        let url = self.client.endpoints().user_utilization_url(user_id);
        let query = [("queueId", self.queue_id.clone())];

        let response = self
            .client
            .get_with_token("user utilization", &url, token, &query)
            .await
            .map_err(UtilizationFetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UtilizationFetchError::Rejected {
                status: status.as_u16(),
                body: error_body(response).await,
            });
        }

        let body = response
            .text()
            .await
            .map_err(UtilizationFetchError::Transport)?;

        let parsed: UtilizationResponse = serde_json::from_str(&body)
            .map_err(|e| UtilizationFetchError::InvalidResponse(e.to_string()))?;

        Ok(parsed.utilization.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_outcome_downgrades_to_empty_record() {
        let outcome = FetchOutcome::Failed(UtilizationFetchError::MissingUserId("x".to_string()));

        assert!(outcome.is_failed());
        assert!(outcome.into_record().is_empty());
    }

    #[test]
    fn test_fetched_outcome_keeps_record() {
        let record = UtilizationRecord::from_capacities([("voice", 2)]);
        let outcome = FetchOutcome::Fetched(record.clone());

        assert!(!outcome.is_failed());
        assert_eq!(outcome.into_record(), record);
    }
}
