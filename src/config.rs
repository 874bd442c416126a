use crate::api::constants::{DEFAULT_EXCLUDED_CHANNELS, DEFAULT_PAGE_SIZE, DEFAULT_REGION};
use crate::api::{Endpoints, ResilienceConfig, RetryConfig, TimeoutConfig};
use crate::auth::credentials::{CLIENT_ID_VAR, CLIENT_SECRET_VAR};
use crate::auth::{Credentials, Secret};
use crate::pipeline::PipelineConfig;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const REGION_VAR: &str = "GENESYS_REGION";
pub const QUEUE_ID_VAR: &str = "GENESYS_QUEUE_ID";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub region: String,
    pub queue_id: Option<String>,
    /// Display name for the queue; reports fall back to the id
    pub queue_name: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<Secret>,
    pub login_base_url: Option<String>,
    pub api_base_url: Option<String>,
    pub page_size: u32,
    pub concurrency: usize,
    pub refresh_interval_secs: u64,
    pub excluded_channels: Vec<String>,
    pub timeouts: TimeoutSettings,
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            queue_id: None,
            queue_name: None,
            client_id: None,
            client_secret: None,
            login_base_url: None,
            api_base_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            concurrency: 4,
            refresh_interval_secs: 30,
            excluded_channels: DEFAULT_EXCLUDED_CHANNELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timeouts: TimeoutSettings::default(),
            retry: RetrySettings::default(),
        }
    }
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            request_secs: 30,
            connect_secs: 10,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join("queue-utilization")
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(".queue-utilization")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Defaults, then the config file, then `.env` and the process environment.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::get_config_path()?;
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    debug!("No config file at {:?}, using defaults", default_path);
                    Self::default()
                }
            }
        };

        if let Ok(env_path) = dotenvy::dotenv() {
            debug!("Loaded environment from {:?}", env_path);
        }
        config.apply_env();

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", path);

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Override settings from environment-style lookups; empty values are ignored
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(id) = get(CLIENT_ID_VAR) {
            self.client_id = Some(id);
        }
        if let Some(secret) = get(CLIENT_SECRET_VAR) {
            self.client_secret = Some(Secret::new(secret));
        }
        if let Some(region) = get(REGION_VAR) {
            self.region = region;
        }
        if let Some(queue_id) = get(QUEUE_ID_VAR) {
            self.queue_id = Some(queue_id);
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        let region = Endpoints::for_region(&self.region);
        Endpoints::new(
            self.login_base_url.clone().unwrap_or(region.login_base_url),
            self.api_base_url.clone().unwrap_or(region.api_base_url),
        )
    }

    pub fn resilience_config(&self) -> ResilienceConfig {
        ResilienceConfig {
            retry: RetryConfig {
                max_attempts: self.retry.max_attempts,
                base_delay: Duration::from_millis(self.retry.base_delay_ms),
                max_delay: Duration::from_millis(self.retry.max_delay_ms),
                ..RetryConfig::default()
            },
            timeouts: TimeoutConfig {
                request: Duration::from_secs(self.timeouts.request_secs),
                connect: Duration::from_secs(self.timeouts.connect_secs),
            },
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.client_id.as_deref().is_none_or(str::is_empty) {
            anyhow::bail!("Client id is not configured (set {} or client_id)", CLIENT_ID_VAR);
        }
        if self.client_secret.is_none() {
            anyhow::bail!(
                "Client secret is not configured (set {} or client_secret)",
                CLIENT_SECRET_VAR
            );
        }
        if self.queue_id.as_deref().is_none_or(str::is_empty) {
            anyhow::bail!("Queue id is not configured (set {}, queue_id or --queue)", QUEUE_ID_VAR);
        }
        if self.page_size == 0 {
            anyhow::bail!("page_size must be at least 1");
        }
        if self.concurrency == 0 {
            anyhow::bail!("concurrency must be at least 1");
        }
        if self.refresh_interval_secs == 0 {
            anyhow::bail!("refresh_interval_secs must be at least 1");
        }
        Ok(())
    }

    /// Validated settings for building a pipeline
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        self.validate()?;

        let credentials = Credentials {
            client_id: self.client_id.clone().unwrap_or_default(),
            client_secret: self.client_secret.clone().unwrap_or_else(|| Secret::new("")),
        };

        Ok(PipelineConfig {
            credentials,
            endpoints: self.endpoints(),
            queue_id: self.queue_id.clone().unwrap_or_default(),
            page_size: self.page_size,
            concurrency: self.concurrency,
            excluded_channels: self.excluded_channels.clone(),
            resilience: self.resilience_config(),
        })
    }

    pub fn queue_label(&self) -> &str {
        self.queue_name
            .as_deref()
            .or(self.queue_id.as_deref())
            .unwrap_or("(unconfigured)")
    }
}
