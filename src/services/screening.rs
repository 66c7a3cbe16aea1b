// src/services/screening.rs
use chrono::NaiveDate;
use log::{debug, info};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::JQuantsConfig;
use crate::error::{JQuantsError, Result};
use crate::models::{DailyQuote, FinancialStatement, ListedSecurity, ScreeningRecord, ScreeningSnapshot};
use super::business_date::{calendar_date, resolve_latest_business_date};
use super::clock::Clock;
use super::jquants::JQuantsClient;
use super::token_cache::TokenCache;

pub const UNCLASSIFIED_SECTOR: &str = "未分類";

// Stand-ins until a real fundamentals feed is wired in: PER 10x, PBR 1x.
const PLACEHOLDER_EPS_RATIO: f64 = 0.1;
const PLACEHOLDER_BPS_RATIO: f64 = 1.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Builds the screening row for one listed security and its quote.
/// Returns `None` when the quote carries no usable price.
pub fn screening_record(info: &ListedSecurity, quote: &DailyQuote) -> Option<ScreeningRecord> {
    // Close is null for issues that did not trade; use the adjusted close then
    let price = quote
        .close
        .filter(|close| *close != 0.0)
        .or(quote.adjustment_close)
        .unwrap_or(0.0);
    if price.is_nan() || price <= 0.0 {
        return None;
    }

    let reported_eps = positive(quote.earnings_per_share);
    let reported_bps = positive(quote.book_value_per_share);

    let sector = info
        .sector33_code_name
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| info.sector17_code_name.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or(UNCLASSIFIED_SECTOR);

    Some(ScreeningRecord {
        code: info.code.clone(),
        name: info.company_name.clone(),
        name_en: info.company_name_english.clone(),
        sector: sector.to_string(),
        market: info.market_code_name.clone(),
        price,
        volume: quote.volume,
        turnover: quote.turnover_value,
        eps: reported_eps.unwrap_or(price * PLACEHOLDER_EPS_RATIO),
        bps: reported_bps.unwrap_or(price * PLACEHOLDER_BPS_RATIO),
        per: reported_eps.map(|eps| round2(price / eps)),
        pbr: reported_bps.map(|bps| round2(price / bps)),
        eps_estimated: reported_eps.is_none(),
        bps_estimated: reported_bps.is_none(),
        date: quote.date,
    })
}

/// Inner join of listings and quotes on security code, in listing order.
/// Securities without a quote or without a positive price are dropped.
pub fn join_screening_records(listed: &[ListedSecurity], quotes: Vec<DailyQuote>) -> Vec<ScreeningRecord> {
    let mut by_code: HashMap<String, DailyQuote> = HashMap::with_capacity(quotes.len());
    // Last write wins; the provider sends one row per code per date
    for quote in quotes {
        by_code.insert(quote.code.clone(), quote);
    }

    listed
        .iter()
        .filter_map(|info| {
            let quote = by_code.get(&info.code);
            if quote.is_none() {
                debug!("No quote for {}, skipping", info.code);
            }
            quote.and_then(|q| screening_record(info, q))
        })
        .collect()
}

/// The pipeline behind `/api/stocks`.
pub struct ScreeningService {
    client: JQuantsClient,
    clock: Arc<dyn Clock>,
    config: JQuantsConfig,
}

impl ScreeningService {
    pub fn new(client: JQuantsClient, clock: Arc<dyn Clock>, config: JQuantsConfig) -> Self {
        ScreeningService { client, clock, config }
    }

    /// Wires the token cache and client from configuration.
    pub fn from_config(config: JQuantsConfig, clock: Arc<dyn Clock>) -> Self {
        let http = Client::new();
        let tokens = TokenCache::new(
            http.clone(),
            config.base_url.clone(),
            config.refresh_token.clone(),
            clock.clone(),
        );
        let client = JQuantsClient::new(http, config.base_url.clone(), tokens);
        ScreeningService::new(client, clock, config)
    }

    pub fn target_date(&self) -> Result<NaiveDate> {
        let today = calendar_date(self.clock.now(), self.config.timezone);
        resolve_latest_business_date(today, self.config.delay_days, self.config.date_mode).ok_or_else(|| {
            JQuantsError::Configuration(format!(
                "delay of {} days from {} is outside the supported calendar",
                self.config.delay_days, today
            ))
        })
    }

    pub async fn get_screening_data(&self) -> Result<ScreeningSnapshot> {
        // 1. Which trading day to ask for
        let date = self.target_date()?;
        info!("Building screening snapshot for {} (market {})", date, self.config.market_code);

        // 2. Listing and quotes together; either failure aborts the snapshot
        let (listed, quotes) = tokio::try_join!(
            self.client.fetch_listed_securities(&self.config.market_code),
            self.client.fetch_daily_quotes(date),
        )?;

        // 3. Join on code and derive ratios
        let stocks = join_screening_records(&listed, quotes);
        info!("Screening snapshot for {}: {} of {} listed securities", date, stocks.len(), listed.len());

        Ok(ScreeningSnapshot {
            count: stocks.len(),
            stocks,
            date,
        })
    }

    pub async fn get_listed_info(&self, market_code: Option<&str>) -> Result<Vec<ListedSecurity>> {
        let market_code = market_code.unwrap_or(self.config.market_code.as_str());
        self.client.fetch_listed_securities(market_code).await
    }

    pub async fn get_daily_quotes(&self, date: NaiveDate) -> Result<Vec<DailyQuote>> {
        self.client.fetch_daily_quotes(date).await
    }

    pub async fn get_statements(&self, code: Option<&str>) -> Result<Vec<FinancialStatement>> {
        self.client.fetch_statements(code).await
    }
}
