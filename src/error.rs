// src/error.rs
use thiserror::Error;

/// Failures surfaced by the J-Quants pipeline. Nothing here is retried.
#[derive(Debug, Error)]
pub enum JQuantsError {
    /// Missing or unusable local configuration (e.g. no refresh token).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider rejected the refresh token exchange.
    #[error("failed to get ID token: {body}. The refresh token may be invalid or expired; issue a new one from the J-Quants dashboard")]
    UpstreamAuth { body: String },

    #[error("failed to get {endpoint}: upstream returned status {status}")]
    Upstream { endpoint: &'static str, status: u16 },

    #[error("request to J-Quants failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl JQuantsError {
    /// HTTP status reported by the provider, when there was one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            JQuantsError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, JQuantsError>;
