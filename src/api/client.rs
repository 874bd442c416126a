use super::constants::{Endpoints, headers};
use super::resilience::{MetricsCollector, ResilienceConfig, RetryPolicy};

/// Platform API client with connection pooling, shared by all pipeline stages
#[derive(Debug, Clone)]
pub struct RoutingClient {
    endpoints: Endpoints,
    http_client: reqwest::Client,
    retry_policy: RetryPolicy,
    metrics: MetricsCollector,
}

impl RoutingClient {
    pub fn new(
        endpoints: Endpoints,
        resilience: &ResilienceConfig,
        metrics: MetricsCollector,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .timeout(resilience.timeouts.request)
            .connect_timeout(resilience.timeouts.connect)
            .user_agent(headers::USER_AGENT)
            .build()?;

        let retry_policy =
            RetryPolicy::new(resilience.retry.clone()).with_metrics(metrics.clone());

        Ok(Self::with_custom_client(
            endpoints,
            http_client,
            retry_policy,
            metrics,
        ))
    }

    /// Create a client around an existing HTTP client
    pub fn with_custom_client(
        endpoints: Endpoints,
        http_client: reqwest::Client,
        retry_policy: RetryPolicy,
        metrics: MetricsCollector,
    ) -> Self {
        Self {
            endpoints,
            http_client,
            retry_policy,
            metrics,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Shared HTTP client (cheap clone)
    pub fn http_client(&self) -> reqwest::Client {
        self.http_client.clone()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Authenticated JSON GET with retries
    pub(crate) async fn get_with_token(
        &self,
        label: &str,
        url: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.retry_policy
            .execute(label, || {
                self.http_client
                    .get(url)
                    .bearer_auth(token)
                    .header(reqwest::header::ACCEPT, headers::CONTENT_TYPE_JSON)
                    .query(query)
                    .send()
            })
            .await
    }
}

/// Read a response body for an error message, never failing
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string())
}
