// src/handlers/stocks.rs
use chrono::NaiveDate;
use log::{error, info};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::services::screening::ScreeningService;
use super::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct StocksQuery {
    pub action: Option<String>,
    pub date: Option<String>,
    pub market: Option<String>,
    pub code: Option<String>,
}

fn reject(err: ApiError) -> Rejection {
    warp::reject::custom(err)
}

pub async fn get_stocks(query: StocksQuery, service: Arc<ScreeningService>) -> Result<Json, Rejection> {
    let action = query.action.as_deref().unwrap_or("screening");
    info!("Handling /api/stocks action={}", action);

    match action {
        "screening" => {
            let snapshot = service.get_screening_data().await.map_err(|e| {
                error!("Failed to build screening snapshot: {}", e);
                reject(e.into())
            })?;
            Ok(warp::reply::json(&snapshot))
        }
        "listed" => {
            let info = service.get_listed_info(query.market.as_deref()).await.map_err(|e| {
                error!("Failed to fetch listed info: {}", e);
                reject(e.into())
            })?;
            Ok(warp::reply::json(&json!({ "count": info.len(), "info": info })))
        }
        "quotes" => {
            let raw = query
                .date
                .as_deref()
                .ok_or_else(|| reject(ApiError::bad_request("date parameter required")))?;
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                reject(ApiError::bad_request(format!("date must be YYYY-MM-DD, got '{}'", raw)))
            })?;

            let quotes = service.get_daily_quotes(date).await.map_err(|e| {
                error!("Failed to fetch daily quotes for {}: {}", date, e);
                reject(e.into())
            })?;
            Ok(warp::reply::json(&json!({ "count": quotes.len(), "quotes": quotes })))
        }
        "statements" => {
            let statements = service.get_statements(query.code.as_deref()).await.map_err(|e| {
                error!("Failed to fetch statements: {}", e);
                reject(e.into())
            })?;
            Ok(warp::reply::json(&json!({ "count": statements.len(), "statements": statements })))
        }
        other => {
            info!("Rejecting unknown action '{}'", other);
            Err(reject(ApiError::bad_request("Invalid action")))
        }
    }
}
