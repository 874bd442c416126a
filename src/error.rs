//! Error taxonomy for the utilization pipeline
//!
//! Authentication and roster failures abort a run. Utilization fetch
//! failures are scoped to one agent and never leave the fetcher.

use thiserror::Error;

/// Client-credentials exchange failed
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("token endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("token response could not be parsed: {0}")]
    InvalidResponse(String),
}

/// Queue membership could not be listed completely
#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("members page {page} request failed: {source}")]
    Transport {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("members page {page} returned {status}: {body}")]
    Rejected { page: u32, status: u16, body: String },

    #[error("members page {page} could not be parsed: {reason}")]
    InvalidResponse { page: u32, reason: String },
}

/// One agent's utilization could not be fetched
#[derive(Debug, Error)]
pub enum UtilizationFetchError {
    #[error("member '{0}' has no resolvable user id")]
    MissingUserId(String),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("payload could not be parsed: {0}")]
    InvalidResponse(String),
}

/// Fatal failure of a whole pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("could not list queue members: {0}")]
    Membership(#[from] MembershipError),
}

impl PipelineError {
    /// Short machine-friendly category used in JSON error payloads
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Auth(_) => "auth",
            PipelineError::Membership(_) => "membership",
        }
    }
}
