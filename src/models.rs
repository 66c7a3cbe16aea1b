// src/models.rs
use serde::{Serialize, Deserialize};
use chrono::{DateTime, NaiveDate, Utc};

/// Short-lived ID token and the instant it stops being usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// One entry of `/listed/info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListedSecurity {
    pub code: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_name_english: String,
    #[serde(default)]
    pub sector17_code_name: Option<String>,
    #[serde(default)]
    pub sector33_code_name: Option<String>,
    #[serde(default)]
    pub market_code: String,
    #[serde(default)]
    pub market_code_name: String,
}

/// One entry of `/prices/daily_quotes`. The provider sends `null` for
/// values it does not have (suspended issues, missing fundamentals).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DailyQuote {
    pub code: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub adjustment_close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub turnover_value: Option<f64>,
    #[serde(default)]
    pub earnings_per_share: Option<f64>,
    #[serde(default)]
    pub book_value_per_share: Option<f64>,
}

/// Subset of `/fins/statements`. Figures arrive as strings; an empty
/// string means the company did not disclose the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FinancialStatement {
    pub local_code: String,
    #[serde(default)]
    pub disclosed_date: String,
    #[serde(default)]
    pub type_of_document: String,
    #[serde(default)]
    pub net_sales: String,
    #[serde(default)]
    pub operating_profit: String,
    #[serde(default)]
    pub profit: String,
    #[serde(default)]
    pub earnings_per_share: String,
    #[serde(default)]
    pub book_value_per_share: String,
    #[serde(default)]
    pub equity: String,
    #[serde(default)]
    pub total_assets: String,
}

impl FinancialStatement {
    pub fn earnings_per_share_value(&self) -> Option<f64> {
        parse_disclosed(&self.earnings_per_share)
    }

    pub fn book_value_per_share_value(&self) -> Option<f64> {
        parse_disclosed(&self.book_value_per_share)
    }
}

fn parse_disclosed(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        trimmed.parse::<f64>().ok()
    }
}

/// Joined listing + quote row handed to the screening UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningRecord {
    pub code: String,
    pub name: String,
    pub name_en: String,
    pub sector: String,
    pub market: String,
    pub price: f64,
    pub volume: Option<f64>,
    pub turnover: Option<f64>,
    pub eps: f64,
    pub bps: f64,
    pub per: Option<f64>,
    pub pbr: Option<f64>,
    pub eps_estimated: bool,
    pub bps_estimated: bool,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningSnapshot {
    pub stocks: Vec<ScreeningRecord>,
    pub date: NaiveDate,
    pub count: usize,
}
