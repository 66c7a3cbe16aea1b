// src/services/jquants.rs
use chrono::NaiveDate;
use log::{debug, error, info};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{JQuantsError, Result};
use crate::models::{DailyQuote, FinancialStatement, ListedSecurity};
use super::token_cache::TokenCache;

/// TSE Prime.
pub const DEFAULT_MARKET_CODE: &str = "0111";

#[derive(Debug, Deserialize)]
struct ListedInfoResponse {
    info: Vec<ListedSecurity>,
}

#[derive(Debug, Deserialize)]
struct DailyQuotesResponse {
    #[serde(default)]
    daily_quotes: Option<Vec<DailyQuote>>,
}

#[derive(Debug, Deserialize)]
struct StatementsResponse {
    #[serde(default)]
    statements: Option<Vec<FinancialStatement>>,
}

pub struct JQuantsClient {
    http: Client,
    base_url: String,
    tokens: TokenCache,
}

impl JQuantsClient {
    pub fn new(http: Client, base_url: impl Into<String>, tokens: TokenCache) -> Self {
        JQuantsClient {
            http,
            base_url: base_url.into(),
            tokens,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let token = self.tokens.bearer().await?;
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            error!("{} returned status {}", endpoint, status);
            return Err(JQuantsError::Upstream { endpoint, status: status.as_u16() });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|source| JQuantsError::Decode { endpoint, source })
    }

    /// Full listing, narrowed to one market segment.
    pub async fn fetch_listed_securities(&self, market_code: &str) -> Result<Vec<ListedSecurity>> {
        let data: ListedInfoResponse = self.get_json("listed/info", &[]).await?;
        let total = data.info.len();

        let listed: Vec<ListedSecurity> = data
            .info
            .into_iter()
            .filter(|security| security.market_code == market_code)
            .collect();

        info!("Listed info: {} of {} securities in market {}", listed.len(), total, market_code);
        Ok(listed)
    }

    /// All quotes for one trading date. Non-trading days come back empty.
    pub async fn fetch_daily_quotes(&self, date: NaiveDate) -> Result<Vec<DailyQuote>> {
        let date = date.format("%Y-%m-%d").to_string();
        let data: DailyQuotesResponse = self
            .get_json("prices/daily_quotes", &[("date", date.as_str())])
            .await?;

        let quotes = data.daily_quotes.unwrap_or_default();
        info!("Daily quotes for {}: {} rows", date, quotes.len());
        Ok(quotes)
    }

    pub async fn fetch_statements(&self, code: Option<&str>) -> Result<Vec<FinancialStatement>> {
        let query: Vec<(&str, &str)> = code.map(|c| vec![("code", c)]).unwrap_or_default();
        let data: StatementsResponse = self.get_json("fins/statements", &query).await?;

        let statements = data.statements.unwrap_or_default();
        info!("Statements: {} rows", statements.len());
        Ok(statements)
    }
}
