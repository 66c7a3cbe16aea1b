// src/bin/fetch_snapshot.rs
use jquants_screener::config::JQuantsConfig;
use jquants_screener::services::clock::SystemClock;
use jquants_screener::services::screening::ScreeningService;
use log::{info, error};
use dotenv::dotenv;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = JQuantsConfig::from_env()?;
    let service = ScreeningService::from_config(config, Arc::new(SystemClock));

    info!("Fetching screening snapshot for {}...", service.target_date()?);

    match service.get_screening_data().await {
        Ok(snapshot) => {
            info!("SUCCESS: {} records for {}", snapshot.count, snapshot.date);
            for record in snapshot.stocks.iter().take(10) {
                println!(
                    "{:>6} {:<30} price={:>10.1} per={:?} pbr={:?}",
                    record.code, record.name_en, record.price, record.per, record.pbr
                );
            }
        }
        Err(e) => {
            error!("ERROR: Failed to build screening snapshot: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
