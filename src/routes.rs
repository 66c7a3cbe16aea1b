// src/routes.rs
use std::sync::Arc;
use warp::reject::Rejection;
use crate::handlers::stocks::{get_stocks, StocksQuery};
use crate::services::screening::ScreeningService;
use log::info;

use std::convert::Infallible;
use warp::{Filter, Reply};
use crate::handlers::error::ApiError;

// Render every rejection as {"error": message}
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = "Invalid query string".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(service: Arc<ScreeningService>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let service_filter = warp::any().map(move || service.clone());

    let stocks_route = warp::path!("api" / "stocks")
        .and(warp::get())
        .and(warp::query::<StocksQuery>())
        .and(service_filter)
        .and_then(get_stocks);

    info!("All routes configured successfully.");

    stocks_route.recover(handle_rejection)
}
