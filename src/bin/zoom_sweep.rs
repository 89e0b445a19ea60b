//! Zoom Sweep - clustering diagnostics across zoom levels
//!
//! Clusters a listing set at every integer zoom from 5 to 16 with both scan
//! strategies and prints marker counts, comparisons and timings.
//!
//! Usage:
//!   RECORDS_PATH=listings.json cargo run --release --bin zoom_sweep
//!   SYNTHETIC_COUNT=2000 SYNTHETIC_SEED=7 cargo run --release --bin zoom_sweep

use marker_cluster_rust::{cluster_with, GeoRecord, MapConfig, RecordSet, ScanStrategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marker_cluster_rust=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("MAP_CONFIG") {
        Ok(path) => MapConfig::load(Path::new(&path))?,
        Err(_) => MapConfig::default(),
    };

    let records = match std::env::var("RECORDS_PATH") {
        Ok(path) => RecordSet::load(Path::new(&path))?,
        Err(_) => {
            let count: usize = std::env::var("SYNTHETIC_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500);
            let seed: u64 = std::env::var("SYNTHETIC_SEED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(42);
            tracing::info!("No RECORDS_PATH set, generating {} synthetic listings (seed {})", count, seed);
            RecordSet::new(synthetic_listings(count, seed, &config))?
        }
    };

    println!("\n{}", "=".repeat(80));
    println!("ZOOM SWEEP ({} records)", records.len());
    println!("{}", "=".repeat(80));
    println!(
        "{:>5} {:>9} {:>9} {:>10} {:>12} {:>12} {:>10}",
        "zoom", "clusters", "singles", "largest", "cmp(full)", "cmp(window)", "speedup"
    );

    for zoom in 5..=16 {
        let zoom = zoom as f64;

        let mut exhaustive_cfg = config.clustering.clone();
        exhaustive_cfg.strategy = ScanStrategy::Exhaustive;
        let mut window_cfg = config.clustering.clone();
        window_cfg.strategy = ScanStrategy::LatitudeWindow;

        let t0 = Instant::now();
        let full = cluster_with(records.records(), zoom, &exhaustive_cfg);
        let t_full = t0.elapsed();

        let t1 = Instant::now();
        let windowed = cluster_with(records.records(), zoom, &window_cfg);
        let t_window = t1.elapsed();

        if full.clusters().len() != windowed.clusters().len()
            || full.singletons().len() != windowed.singletons().len()
        {
            anyhow::bail!("scan strategies disagree at zoom {}", zoom);
        }

        let largest = full.clusters().iter().map(|c| c.count()).max().unwrap_or(1);
        let speedup = if t_window.as_nanos() > 0 {
            t_full.as_secs_f64() / t_window.as_secs_f64()
        } else {
            1.0
        };

        println!(
            "{:>5} {:>9} {:>9} {:>10} {:>12} {:>12} {:>9.1}x",
            zoom,
            full.clusters().len(),
            full.singletons().len(),
            largest,
            full.comparisons(),
            windowed.comparisons(),
            speedup
        );
    }

    println!();
    Ok(())
}

/// Listings scattered around the initial map centre, roughly city-sized
fn synthetic_listings(count: usize, seed: u64, config: &MapConfig) -> Vec<GeoRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let center = config.viewport.initial_center;

    (0..count)
        .map(|i| {
            let lat = center.lat + rng.gen_range(-0.15..0.15);
            let lon = center.lon + rng.gen_range(-0.15..0.15);
            GeoRecord::new(i.to_string(), lat, lon, format!("Listing {}", i))
        })
        .collect()
}
