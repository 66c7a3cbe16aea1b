use dotenv::dotenv;
use jquants_screener::config::JQuantsConfig;
use jquants_screener::routes;
use jquants_screener::services::clock::SystemClock;
use jquants_screener::services::screening::ScreeningService;
use log::{info, warn};
use warp::Filter;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    // Get port from the environment, default to 3030
    let port_str = env::var("PORT").unwrap_or_else(|_| {
        warn!("$PORT not set, defaulting to 3030");
        "3030".to_string()
    });
    let port: u16 = port_str.parse().map_err(|_| anyhow::anyhow!("PORT must be a number, got '{}'", port_str))?;
    info!("Using PORT: {}", port);

    // J-Quants settings; a missing refresh token only fails on first request
    let config = JQuantsConfig::from_env()?;
    info!(
        "J-Quants base URL {}, market {}, delay {} days, date mode {:?}",
        config.base_url, config.market_code, config.delay_days, config.date_mode
    );
    let service = Arc::new(ScreeningService::from_config(config, Arc::new(SystemClock)));

    // Bind to all interfaces
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    // Set up CORS for the screening UI
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    // Set up routes
    let api = routes::routes(service).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api)
        .run(addr)
        .await;

    Ok(())
}
