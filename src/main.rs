use review_status_bot::config::{init_tracing, log_file_from_env, Config};
use review_status_bot::services::monitor::{IntervalTicker, MonitorEngine};

#[tokio::main]
async fn main() {
    // Loads .env before anything else reads the environment
    let loaded = Config::from_env();

    let log_file = match &loaded {
        Ok(config) => config.log_file.clone(),
        Err(_) => log_file_from_env(),
    };
    let log_guard = init_tracing(&log_file);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration check failed, exiting");
            drop(log_guard);
            std::process::exit(1);
        }
    };
    tracing::debug!(?config, "Configuration loaded");

    let mut engine = MonitorEngine::from_config(&config);
    tracing::info!(
        interval_secs = config.poll_interval.as_secs(),
        endpoint = %config.endpoint,
        log_file = %config.log_file,
        "Polling homework statuses"
    );

    engine.run(IntervalTicker::new(config.poll_interval)).await;
}
