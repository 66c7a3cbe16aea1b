// src/services/token_cache.rs
use chrono::Duration;
use log::{debug, error, info};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{JQuantsError, Result};
use crate::models::Credential;
use super::clock::Clock;

/// ID tokens are valid for 24h upstream; we stop using them an hour early.
pub const TOKEN_LIFETIME_HOURS: i64 = 23;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    id_token: String,
}

/// Holds the current ID token and swaps it for a new one once it expires.
///
/// The state lock is held across the refresh exchange, so callers that miss
/// at the same time wait for one refresh instead of each issuing their own.
pub struct TokenCache {
    http: Client,
    base_url: String,
    refresh_token: Option<String>,
    clock: Arc<dyn Clock>,
    current: Mutex<Option<Credential>>,
}

impl TokenCache {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        refresh_token: Option<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        TokenCache {
            http,
            base_url: base_url.into(),
            refresh_token,
            clock,
            current: Mutex::new(None),
        }
    }

    pub async fn acquire(&self) -> Result<Credential> {
        // Held until the refresh below finishes so concurrent misses queue up
        let mut current = self.current.lock().await;

        // 1. Cached token still good?
        let now = self.clock.now();
        if let Some(credential) = current.as_ref() {
            if credential.is_valid_at(now) {
                debug!("Reusing cached ID token (expires {})", credential.expires_at);
                return Ok(credential.clone());
            }
        }

        let refresh_token = self.refresh_token.as_deref().ok_or_else(|| {
            JQuantsError::Configuration("JQUANTS_API_KEY (refresh token) is not set".to_string())
        })?;

        // 2. Exchange the refresh token for a new ID token
        info!("Refreshing J-Quants ID token");
        let url = format!("{}/token/auth_refresh", self.base_url);
        let resp = self
            .http
            .post(&url)
            .query(&[("refreshtoken", refresh_token)])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await?;
            error!("Token refresh rejected with status {}", status);
            return Err(JQuantsError::UpstreamAuth { body });
        }

        let body = resp.text().await?;
        let parsed: RefreshResponse = serde_json::from_str(&body)
            .map_err(|source| JQuantsError::Decode { endpoint: "token/auth_refresh", source })?;

        // 3. Cache it with an hour of slack
        let credential = Credential {
            token: parsed.id_token,
            expires_at: now + Duration::hours(TOKEN_LIFETIME_HOURS),
        };
        info!("ID token refreshed, valid until {}", credential.expires_at);
        *current = Some(credential.clone());

        Ok(credential)
    }

    /// Bearer token for the next request.
    pub async fn bearer(&self) -> Result<String> {
        Ok(self.acquire().await?.token)
    }
}
