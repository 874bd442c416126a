//! Shared mock-server setup for integration tests
#![allow(dead_code)]

use queue_utilization::PipelineConfig;
use queue_utilization::api::{
    Endpoints, MetricsCollector, ResilienceConfig, RetryConfig, RoutingClient,
};
use queue_utilization::auth::Credentials;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const QUEUE_ID: &str = "queue-1";
pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
/// base64("client-id:client-secret")
pub const BASIC_AUTH: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";
pub const TOKEN: &str = "token-1";

pub const MEMBERS_PATH: &str = "/api/v2/routing/queues/queue-1/members";

pub fn utilization_path(user_id: &str) -> String {
    format!("/api/v2/routing/users/{}/utilization", user_id)
}

/// Fast retries without jitter
pub fn retrying(max_attempts: u32) -> ResilienceConfig {
    ResilienceConfig::builder()
        .retry_config(RetryConfig {
            max_attempts,
            base_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
            backoff_multiplier: 2.0,
            jitter: false,
        })
        .request_timeout(Duration::from_secs(5))
        .build()
}

pub fn pipeline_config(server: &MockServer) -> PipelineConfig {
    PipelineConfig {
        credentials: Credentials::new(CLIENT_ID, CLIENT_SECRET),
        endpoints: Endpoints::new(server.uri(), server.uri()),
        queue_id: QUEUE_ID.to_string(),
        page_size: 100,
        concurrency: 1,
        excluded_channels: vec!["workitem".to_string()],
        resilience: ResilienceConfig::disabled(),
    }
}

pub fn client(server: &MockServer, resilience: &ResilienceConfig) -> RoutingClient {
    RoutingClient::new(
        Endpoints::new(server.uri(), server.uri()),
        resilience,
        MetricsCollector::new(),
    )
    .unwrap()
}

pub fn token_body(token: &str, expires_in: u64) -> Value {
    json!({ "access_token": token, "token_type": "bearer", "expires_in": expires_in })
}

pub async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(TOKEN, 86399)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub fn member(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "user": { "id": id, "name": name, "selfUri": format!("/api/v2/users/{}", id) } })
}

/// Mount `pages` as consecutive member pages, each expected exactly once
pub async fn mount_member_pages(server: &MockServer, pages: Vec<Vec<Value>>) {
    let total = pages.len();
    for (index, entities) in pages.into_iter().enumerate() {
        let number = index + 1;
        let mut body = json!({
            "entities": entities,
            "pageSize": 100,
            "pageNumber": number,
            "pageCount": total,
        });
        if number < total {
            body["nextUri"] = json!(format!(
                "/api/v2/routing/queues/{}/members?pageSize=100&pageNumber={}",
                QUEUE_ID,
                number + 1
            ));
        }

        Mock::given(method("GET"))
            .and(path(MEMBERS_PATH))
            .and(query_param("pageNumber", number.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(server)
            .await;
    }
}

pub async fn mount_utilization(server: &MockServer, user_id: &str, utilization: Value) {
    Mock::given(method("GET"))
        .and(path(utilization_path(user_id)))
        .and(query_param("queueId", QUEUE_ID))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "level": "Agent", "utilization": utilization })),
        )
        .mount(server)
        .await;
}

pub fn capacity(value: u32) -> Value {
    json!({ "maximumCapacity": value, "includeNonAcd": false })
}
