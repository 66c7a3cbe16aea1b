mod common;

use chrono::NaiveDate;
use jquants_screener::error::JQuantsError;
use jquants_screener::services::clock::ManualClock;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client, listed_entry, mount_token, quote_entry, saturday_morning, ID_TOKEN};

fn friday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
}

#[tokio::test]
async fn listed_securities_are_filtered_to_the_requested_market() {
    let server = MockServer::start().await;
    mount_token(&server, ID_TOKEN).await;
    Mock::given(method("GET"))
        .and(path("/listed/info"))
        .and(header("authorization", format!("Bearer {}", ID_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "info": [
                listed_entry("13010", "0111"),
                listed_entry("13050", "0112"),
                listed_entry("72030", "0111"),
                listed_entry("99990", "0113"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Arc::new(ManualClock::new(saturday_morning())));
    let listed = client.fetch_listed_securities("0111").await.unwrap();

    let codes: Vec<&str> = listed.iter().map(|s| s.code.as_str()).collect();
    assert_eq!(codes, vec!["13010", "72030"]);
    assert!(listed.iter().all(|s| s.market_code == "0111"));
    assert_eq!(listed[0].company_name_english, "Company 13010");
}

#[tokio::test]
async fn daily_quotes_are_requested_for_the_given_date() {
    let server = MockServer::start().await;
    mount_token(&server, ID_TOKEN).await;
    Mock::given(method("GET"))
        .and(path("/prices/daily_quotes"))
        .and(query_param("date", "2024-05-10"))
        .and(header("authorization", format!("Bearer {}", ID_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily_quotes": [quote_entry("13010", json!(1000.0), json!(50.0))]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Arc::new(ManualClock::new(saturday_morning())));
    let quotes = client.fetch_daily_quotes(friday()).await.unwrap();

    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].close, Some(1000.0));
    assert_eq!(quotes[0].earnings_per_share, Some(50.0));
    assert_eq!(quotes[0].book_value_per_share, None);
}

#[tokio::test]
async fn missing_quote_payload_means_no_trading_not_failure() {
    let server = MockServer::start().await;
    mount_token(&server, ID_TOKEN).await;
    Mock::given(method("GET"))
        .and(path("/prices/daily_quotes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client(&server, Arc::new(ManualClock::new(saturday_morning())));
    let quotes = client.fetch_daily_quotes(friday()).await.unwrap();
    assert!(quotes.is_empty());
}

#[tokio::test]
async fn non_success_status_becomes_upstream_error() {
    let server = MockServer::start().await;
    mount_token(&server, ID_TOKEN).await;
    Mock::given(method("GET"))
        .and(path("/listed/info"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Forbidden" })))
        .mount(&server)
        .await;

    let client = client(&server, Arc::new(ManualClock::new(saturday_morning())));
    let err = client.fetch_listed_securities("0111").await.unwrap_err();

    assert_eq!(err.upstream_status(), Some(403));
    assert!(matches!(err, JQuantsError::Upstream { endpoint: "listed/info", .. }));
}

#[tokio::test]
async fn requests_share_one_token_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token/auth_refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "idToken": ID_TOKEN })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/prices/daily_quotes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "daily_quotes": [] })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server, Arc::new(ManualClock::new(saturday_morning())));
    client.fetch_daily_quotes(friday()).await.unwrap();
    client.fetch_daily_quotes(friday()).await.unwrap();
}

#[tokio::test]
async fn statements_pass_the_optional_code() {
    let server = MockServer::start().await;
    mount_token(&server, ID_TOKEN).await;
    Mock::given(method("GET"))
        .and(path("/fins/statements"))
        .and(query_param("code", "86970"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statements": [{
                "DisclosedDate": "2024-04-26",
                "LocalCode": "86970",
                "TypeOfDocument": "FYFinancialStatements_Consolidated_IFRS",
                "NetSales": "152000000000",
                "OperatingProfit": "",
                "Profit": "60000000000",
                "EarningsPerShare": "115.32",
                "BookValuePerShare": "",
                "Equity": "",
                "TotalAssets": ""
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Arc::new(ManualClock::new(saturday_morning())));
    let statements = client.fetch_statements(Some("86970")).await.unwrap();

    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].earnings_per_share_value(), Some(115.32));
    assert_eq!(statements[0].book_value_per_share_value(), None);
}
