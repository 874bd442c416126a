use serde::{Deserialize, Serialize};
use std::fmt;

pub const CLIENT_ID_VAR: &str = "GENESYS_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "GENESYS_CLIENT_SECRET";

/// String that never shows up in `Debug` output or logs
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// OAuth client credentials for the platform API
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: Secret,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let creds = Credentials::new("client", "hunter2");
        let debug = format!("{:?}", creds);

        assert!(debug.contains("client"));
        assert!(!debug.contains("hunter2"));
        assert_eq!(creds.client_secret.expose(), "hunter2");
    }
}
