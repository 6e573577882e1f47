mod classify;
mod config;
mod errors;
mod history;
mod metrics;
mod model;
mod poller;
mod render;
mod rest;
mod sensor;
mod state;
mod validate;
mod weather;

use clap::Parser;
use config::Config;
use poller::{Dashboard, PollerConfig};
use render::{LogRenderer, Renderer, SnapshotRenderer};
use sensor::SensorClient;
use state::{date_locale, DashboardState};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather::WeatherClient;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(config::log_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting air-quality dashboard");
    info!("Sensor source: {}", config.firebase_url);
    info!("Weather city: {}", config.city);
    info!("HTTP server: {}", config.http_addr);

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let thresholds = config.thresholds();
    info!(
        "Thresholds: temp_max={} co2_max={} tvoc_max={} humidity=[{}, {}]",
        thresholds.temp_max,
        thresholds.co2_max,
        thresholds.tvoc_max,
        thresholds.hum_min,
        thresholds.hum_max
    );

    // Initialize metrics
    if let Err(e) = metrics::init_metrics() {
        error!("Failed to register metrics: {}", e);
        std::process::exit(1);
    }

    let sensor = match SensorClient::new(&config.firebase_url, config.http_timeout()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build sensor client: {}", e);
            std::process::exit(1);
        }
    };

    let weather = match config.api_key() {
        Some(key) => match WeatherClient::new(
            key,
            &config.city,
            &config.weather_lang,
            config.http_timeout(),
        ) {
            Ok(client) => Some(client),
            Err(e) => {
                error!("Failed to build weather client: {}", e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    let (snapshot_renderer, snapshots) = SnapshotRenderer::channel();
    let renderers: Vec<Box<dyn Renderer>> = vec![Box::new(LogRenderer), Box::new(snapshot_renderer)];
    let dashboard_state = DashboardState::new(thresholds, date_locale(&config.weather_lang));
    let dashboard = Dashboard::new(dashboard_state, renderers);

    let poller_config = PollerConfig {
        sensor_interval: config.sensor_interval(),
        weather_interval: config.weather_interval(),
    };
    let poller_handle = tokio::spawn(async move {
        poller::run_poller(dashboard, sensor, weather, poller_config).await;
    });

    let app = rest::create_router(snapshots);

    // Start HTTP server
    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", config.http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", config.http_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap_or_else(|e| {
            error!("HTTP server error: {}", e);
        });
    });

    tokio::select! {
        _ = poller_handle => {
            error!("Poller task terminated");
        }
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down");
}
