// src/config.rs
use anyhow::{anyhow, bail, Context, Result};
use chrono_tz::Tz;
use log::warn;
use std::env;

use crate::services::business_date::DateMode;
use crate::services::jquants::DEFAULT_MARKET_CODE;

pub const DEFAULT_BASE_URL: &str = "https://api.jquants.com/v1";

/// Longest reporting lag accepted from the environment (ten years).
pub const MAX_DELAY_DAYS: u32 = 3650;

#[derive(Debug, Clone)]
pub struct JQuantsConfig {
    /// Refresh token exchanged for ID tokens. Checked lazily on first use.
    pub refresh_token: Option<String>,
    pub base_url: String,
    /// Reporting lag of the subscription plan (free plan: 84 days).
    pub delay_days: u32,
    pub market_code: String,
    pub timezone: Option<Tz>,
    pub date_mode: DateMode,
}

impl Default for JQuantsConfig {
    fn default() -> Self {
        JQuantsConfig {
            refresh_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            delay_days: 0,
            market_code: DEFAULT_MARKET_CODE.to_string(),
            timezone: None,
            date_mode: DateMode::Compatible,
        }
    }
}

impl JQuantsConfig {
    /// Reads the process environment. Call `dotenv().ok()` first if a
    /// `.env` file should be honored.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = JQuantsConfig::default();

        config.refresh_token = lookup("JQUANTS_API_KEY").filter(|v| !v.trim().is_empty());
        if config.refresh_token.is_none() {
            warn!("JQUANTS_API_KEY not set, every upstream call will fail until it is provided");
        }

        if let Some(base_url) = lookup("JQUANTS_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup("JQUANTS_DELAY_DAYS") {
            config.delay_days = raw
                .trim()
                .parse()
                .with_context(|| format!("JQUANTS_DELAY_DAYS must be a non-negative integer, got '{}'", raw))?;
            if config.delay_days > MAX_DELAY_DAYS {
                bail!("JQUANTS_DELAY_DAYS must be at most {}, got {}", MAX_DELAY_DAYS, config.delay_days);
            }
        }

        if let Some(code) = lookup("JQUANTS_MARKET_CODE") {
            config.market_code = code.trim().to_string();
        }

        if let Some(name) = lookup("JQUANTS_TIMEZONE") {
            let tz = name
                .trim()
                .parse::<Tz>()
                .map_err(|e| anyhow!("JQUANTS_TIMEZONE '{}' is not a valid IANA zone: {}", name, e))?;
            config.timezone = Some(tz);
        }

        if let Some(flag) = lookup("JQUANTS_STRICT_BUSINESS_DATE") {
            if matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                config.date_mode = DateMode::Strict;
            }
        }

        Ok(config)
    }
}
