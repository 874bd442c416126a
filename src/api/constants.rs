//! API constants and endpoint builders for the Genesys Cloud platform API

use std::time::Duration;

/// Default organisation region when none is configured
pub const DEFAULT_REGION: &str = "mypurecloud.com";

/// OAuth token path on the login host
pub const TOKEN_PATH: &str = "/oauth/token";

/// Routing API base path
pub const ROUTING_API_PATH: &str = "/api/v2/routing";

/// Grant used for service-to-service authentication
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

/// Members requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Token lifetime assumed when the token response omits `expires_in`
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Margin subtracted from a token's expiry before it is considered stale
pub const TOKEN_EXPIRY_SKEW: Duration = Duration::from_secs(60);

/// Channel types left out of reports unless configured otherwise
pub const DEFAULT_EXCLUDED_CHANNELS: &[&str] = &["workitem"];

/// Standard header values
pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    pub const USER_AGENT: &str = concat!("queue-utilization/", env!("CARGO_PKG_VERSION"));
}

/// Login host for a region, e.g. `https://login.mypurecloud.com.au`
pub fn login_base_url(region: &str) -> String {
    format!("https://login.{}", region)
}

/// API host for a region, e.g. `https://api.mypurecloud.com.au`
pub fn api_base_url(region: &str) -> String {
    format!("https://api.{}", region)
}

/// Resolved upstream URLs for one organisation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login_base_url: String,
    pub api_base_url: String,
}

impl Endpoints {
    pub fn for_region(region: &str) -> Self {
        Self::new(login_base_url(region), api_base_url(region))
    }

    /// Explicit hosts, used for overrides and mock servers
    pub fn new(login_base_url: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        Self {
            login_base_url: trim_slash(login_base_url.into()),
            api_base_url: trim_slash(api_base_url.into()),
        }
    }

    pub fn token_url(&self) -> String {
        format!("{}{}", self.login_base_url, TOKEN_PATH)
    }

    pub fn queue_members_url(&self, queue_id: &str) -> String {
        format!(
            "{}{}/queues/{}/members",
            self.api_base_url, ROUTING_API_PATH, queue_id
        )
    }

    pub fn user_utilization_url(&self, user_id: &str) -> String {
        format!(
            "{}{}/users/{}/utilization",
            self.api_base_url, ROUTING_API_PATH, user_id
        )
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_endpoints() {
        let endpoints = Endpoints::for_region("mypurecloud.com.au");

        assert_eq!(endpoints.token_url(), "https://login.mypurecloud.com.au/oauth/token");
        assert_eq!(
            endpoints.queue_members_url("q1"),
            "https://api.mypurecloud.com.au/api/v2/routing/queues/q1/members"
        );
        assert_eq!(
            endpoints.user_utilization_url("u1"),
            "https://api.mypurecloud.com.au/api/v2/routing/users/u1/utilization"
        );
    }

    #[test]
    fn test_explicit_hosts_drop_trailing_slash() {
        let endpoints = Endpoints::new("http://127.0.0.1:8080/", "http://127.0.0.1:9090//");

        assert_eq!(endpoints.token_url(), "http://127.0.0.1:8080/oauth/token");
        assert_eq!(endpoints.api_base_url, "http://127.0.0.1:9090");
    }
}
