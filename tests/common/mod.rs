#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use jquants_screener::config::JQuantsConfig;
use jquants_screener::services::clock::ManualClock;
use jquants_screener::services::jquants::JQuantsClient;
use jquants_screener::services::screening::ScreeningService;
use jquants_screener::services::token_cache::TokenCache;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REFRESH_TOKEN: &str = "refresh-secret";
pub const ID_TOKEN: &str = "id-token-1";

/// Saturday 2024-05-11 03:00 UTC.
pub fn saturday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 11, 3, 0, 0).unwrap()
}

pub fn token_cache(server: &MockServer, clock: Arc<ManualClock>) -> TokenCache {
    TokenCache::new(Client::new(), server.uri(), Some(REFRESH_TOKEN.to_string()), clock)
}

pub fn client(server: &MockServer, clock: Arc<ManualClock>) -> JQuantsClient {
    JQuantsClient::new(Client::new(), server.uri(), token_cache(server, clock))
}

pub fn test_config(server: &MockServer) -> JQuantsConfig {
    JQuantsConfig {
        refresh_token: Some(REFRESH_TOKEN.to_string()),
        base_url: server.uri(),
        timezone: Some(chrono_tz::UTC),
        ..JQuantsConfig::default()
    }
}

pub fn service(server: &MockServer, clock: Arc<ManualClock>) -> ScreeningService {
    ScreeningService::from_config(test_config(server), clock)
}

pub async fn mount_token(server: &MockServer, id_token: &str) {
    Mock::given(method("POST"))
        .and(path("/token/auth_refresh"))
        .and(query_param("refreshtoken", REFRESH_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "idToken": id_token })))
        .mount(server)
        .await;
}

pub fn listed_entry(code: &str, market_code: &str) -> Value {
    json!({
        "Date": "2024-05-10",
        "Code": code,
        "CompanyName": format!("会社{}", code),
        "CompanyNameEnglish": format!("Company {}", code),
        "Sector17Code": "13",
        "Sector17CodeName": "商社・卸売",
        "Sector33Code": "6050",
        "Sector33CodeName": "卸売業",
        "ScaleCategory": "TOPIX Mid400",
        "MarketCode": market_code,
        "MarketCodeName": if market_code == "0111" { "プライム" } else { "スタンダード" }
    })
}

pub fn quote_entry(code: &str, close: Value, eps: Value) -> Value {
    json!({
        "Date": "2024-05-10",
        "Code": code,
        "Open": 990.0,
        "High": 1010.0,
        "Low": 985.0,
        "Close": close,
        "Volume": 12000.0,
        "TurnoverValue": 12000000.0,
        "AdjustmentClose": close,
        "EarningsPerShare": eps,
        "BookValuePerShare": null
    })
}
