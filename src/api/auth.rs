//! Bearer token cache for the client-credentials grant
//!
//! A token is handed out only while `now < expires_at - skew`. Refreshes
//! are serialized behind one async mutex, so concurrent callers arriving
//! while a token is stale wait for a single exchange and reuse its result.

use super::client::{RoutingClient, error_body};
use super::constants::{CLIENT_CREDENTIALS_GRANT, DEFAULT_TOKEN_LIFETIME, TOKEN_EXPIRY_SKEW};
use super::models::{TokenInfo, TokenResponse};
use crate::auth::Credentials;
use crate::error::AuthError;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex as AsyncMutex;

/// Source of the current time for expiry checks
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<SystemTime>>,
}

impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += by;
    }

    pub fn set(&self, to: SystemTime) {
        *self.now.lock().unwrap_or_else(|p| p.into_inner()) = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Holds one bearer token and refreshes it on demand
#[derive(Debug)]
pub struct TokenCache {
    client: RoutingClient,
    credentials: Credentials,
    clock: Arc<dyn Clock>,
    skew: Duration,
    token: AsyncMutex<Option<TokenInfo>>,
}

impl TokenCache {
    pub fn new(client: RoutingClient, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            clock: Arc::new(SystemClock),
            skew: TOKEN_EXPIRY_SKEW,
            token: AsyncMutex::new(None),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Return a usable token, exchanging credentials first if needed
    pub async fn get_token(&self) -> Result<String, AuthError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if self.is_fresh(token) {
                log::debug!("Using cached token");
                return Ok(token.access_token.clone());
            }
            log::debug!("Cached token is within {:?} of expiry, refreshing", self.skew);
        }

        // Drop the stale value first so a failed exchange leaves nothing cached
        *cached = None;
        let token = self.exchange().await?;
        let value = token.access_token.clone();
        *cached = Some(token);

        Ok(value)
    }

    /// Currently cached token, fresh or not
    pub async fn cached(&self) -> Option<TokenInfo> {
        self.token.lock().await.clone()
    }

    /// Forget the cached token so the next call exchanges again
    pub async fn invalidate(&self) {
        *self.token.lock().await = None;
    }

    fn is_fresh(&self, token: &TokenInfo) -> bool {
        match token.expires_at.checked_sub(self.skew) {
            Some(limit) => self.clock.now() < limit,
            None => false,
        }
    }

    async fn exchange(&self) -> Result<TokenInfo, AuthError> {
        let token_url = self.client.endpoints().token_url();
        log::info!("Requesting access token from {}", token_url);

        let http = self.client.http_client();
        let response = self
            .client
            .retry_policy()
            .execute("token exchange", || {
                http.post(&token_url)
                    .basic_auth(
                        &self.credentials.client_id,
                        Some(self.credentials.client_secret.expose()),
                    )
                    .form(&[("grant_type", CLIENT_CREDENTIALS_GRANT)])
                    .send()
            })
            .await
            .map_err(AuthError::Transport)?;

        self.client.metrics().record_token_exchange();

        let status = response.status();
        log::debug!("Token request status: {}", status);

        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body: error_body(response).await,
            });
        }

        let body = response.text().await.map_err(AuthError::Transport)?;
        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        if token.access_token.is_empty() {
            return Err(AuthError::InvalidResponse(
                "empty access_token".to_string(),
            ));
        }

        let lifetime = token
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);
        let expires_at = self.clock.now().checked_add(lifetime).ok_or_else(|| {
            AuthError::InvalidResponse(format!("expires_in out of range: {}", lifetime.as_secs()))
        })?;

        log::info!("Obtained access token valid for {}s", lifetime.as_secs());

        Ok(TokenInfo {
            access_token: token.access_token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::default();
        let start = clock.now();
        clock.advance(Duration::from_secs(90));

        assert_eq!(clock.now().duration_since(start).unwrap(), Duration::from_secs(90));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
