mod reading;

use clap::Parser;
use rand::Rng;
use reading::Reading;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Parser)]
#[command(name = "simulator", about = "Writes synthetic station readings")]
struct Args {
    #[arg(
        long,
        env = "FIREBASE_URL",
        default_value = "https://estacion-de-calidad-default-rtdb.firebaseio.com"
    )]
    firebase_url: String,

    #[arg(long, env = "INTERVAL_MS", default_value_t = 3000)]
    interval_ms: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let url = format!("{}/current.json", args.firebase_url.trim_end_matches('/'));
    info!("Starting station simulator");
    info!("Target: {}, interval: {}ms", url, args.interval_ms);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|e| {
            error!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        });

    let mut rng = rand::thread_rng();
    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
    let mut counter = 0u64;

    loop {
        ticker.tick().await;

        let reading = generate_reading(&mut rng);
        debug!("Publishing {:?}", reading);

        match client.put(&url).json(&reading).send().await {
            Ok(response) if response.status().is_success() => {
                counter += 1;
            }
            Ok(response) => {
                warn!("Endpoint rejected reading: HTTP {}", response.status());
            }
            Err(e) => {
                warn!("Failed to publish: {}", e);
            }
        }

        // Log progress periodically
        if counter > 0 && counter % 100 == 0 {
            info!("Published {} readings", counter);
        }
    }
}

fn generate_reading(rng: &mut impl Rng) -> Reading {
    let temperature = if rng.gen_bool(0.05) {
        rng.gen_range(34.0..40.0) // 5% heat spikes
    } else {
        rng.gen_range(18.0..34.0)
    };

    let humidity = if rng.gen_bool(0.05) {
        rng.gen_range(10.0..100.0) // 5% outliers
    } else {
        rng.gen_range(35.0..85.0)
    };

    let co2 = if rng.gen_bool(0.05) {
        rng.gen_range(1200..3000) // 5% stale-air spikes
    } else {
        rng.gen_range(400..1200)
    };

    Reading {
        temperature,
        humidity,
        co2,
        tvoc: rng.gen_range(50..600),
        pressure: rng.gen_range(1000.0..1020.0),
        fan_active: co2 > 1000 || rng.gen_bool(0.2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_default_log_filter_keeps_info() {
        let filter = EnvFilter::new(DEFAULT_LOG_FILTER);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_generated_readings_are_plausible() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let reading = generate_reading(&mut rng);
            assert!((18.0..40.0).contains(&reading.temperature));
            assert!((10.0..100.0).contains(&reading.humidity));
            assert!((400..3000).contains(&reading.co2));
            assert!((50..600).contains(&reading.tvoc));
            assert!((1000.0..1020.0).contains(&reading.pressure));
            if reading.co2 > 1000 {
                assert!(reading.fan_active);
            }
        }
    }
}
