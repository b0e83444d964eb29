use std::sync::Arc;
use std::time::Duration;

use dotenv::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flight_school_gateway::build_rocket;
use flight_school_gateway::config::AppConfig;
use flight_school_gateway::services::persistence::HttpPersistenceApi;

#[rocket::launch]
async fn rocket() -> _ {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flight_school_gateway=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Connect to the persistence API
    let api = HttpPersistenceApi::new(
        config.backend_api_url.clone(),
        Duration::from_secs(config.backend_timeout_secs),
    )
    .expect("Failed to build persistence API client");
    tracing::info!(
        backend = %config.backend_api_url,
        strict_references = ?config.recorder.reference_policy,
        "Persistence API client ready"
    );

    build_rocket(config, Arc::new(api))
}
