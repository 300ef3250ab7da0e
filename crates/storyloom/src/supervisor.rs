//! Run supervision: mutual exclusion, phase sequencing, exit codes.

use crate::lock::RunLock;
use crate::sync::GitSync;
use std::time::Duration;
use storyloom_comfy::ImageClient;
use storyloom_core::{Clock, RunConfig};
use storyloom_database::Store;
use storyloom_error::{
    LockErrorKind, ProviderErrorKind, StoryloomError, StoryloomErrorKind, StoryloomResult,
};
use storyloom_gateway::GatewayClient;
use storyloom_pipeline::Pipeline;
use storyloom_sitemap::SitemapPublisher;
use storyloom_trends::TrendClient;
use tracing::{error, info, warn};

/// Everything worked; content generated and synced (or nothing to do).
pub const EXIT_SUCCESS: i32 = 0;
/// Configuration could not be loaded or a credential file was unreadable.
pub const EXIT_CONFIG: i32 = 1;
/// The pipeline phase failed.
pub const EXIT_PIPELINE: i32 = 2;
/// Generation succeeded but the publish sync failed.
pub const EXIT_SYNC: i32 = 3;
/// Another run holds the lock; nothing was attempted.
pub const EXIT_LOCKED: i32 = 4;

fn failure_code(e: &StoryloomError) -> i32 {
    match e.kind() {
        StoryloomErrorKind::Config(_) => EXIT_CONFIG,
        StoryloomErrorKind::Provider(p)
            if matches!(p.kind, ProviderErrorKind::Credential(_)) =>
        {
            EXIT_CONFIG
        }
        _ => EXIT_PIPELINE,
    }
}

/// Full supervised run under the single-instance lock.
pub async fn run(config: &RunConfig) -> i32 {
    let stale_after = Duration::from_secs(config.runner.stale_minutes * 60);
    let _lock = match RunLock::acquire(&config.runner.lock_path, stale_after) {
        Ok(lock) => lock,
        Err(e) if matches!(e.kind, LockErrorKind::AlreadyRunning { .. }) => {
            warn!(error = %e, "Skipping run");
            return EXIT_LOCKED;
        }
        Err(e) => {
            error!(error = %e, "Lock acquisition failed");
            return EXIT_CONFIG;
        }
    };

    // The lock guard is dropped, and the marker removed, on every path out
    // of this function.
    supervised(config).await
}

async fn supervised(config: &RunConfig) -> i32 {
    let clock = Clock::from_offset_hours(config.runner.utc_offset_hours);

    if let Err(e) = pipeline_phase(config, clock).await {
        error!(error = %e, "Pipeline phase failed; skipping sync");
        return failure_code(&e);
    }

    if let Err(e) = sync_phase(config, clock).await {
        error!(error = %e, "Sync phase failed");
        return EXIT_SYNC;
    }

    stamp_last_run(config);
    info!("Run completed");
    EXIT_SUCCESS
}

/// Ingest, generate, and republish the sitemap.
async fn pipeline_phase(config: &RunConfig, clock: Clock) -> StoryloomResult<()> {
    let store = Store::open(&config.store.database_path)?;
    let trends = TrendClient::new(&config.provider)?;
    let gateway = GatewayClient::new(&config.generation, &config.retry);
    let renderer = ImageClient::new(&config.image, clock);

    let pipeline = Pipeline::new(
        store.clone(),
        gateway,
        renderer,
        config.generation.clone(),
        config.pipeline.clone(),
        &config.store,
        clock,
    );

    let batch = trends.fetch().await?;
    let summary = pipeline.run(&batch).await?;
    info!(
        persisted = summary.persisted(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        "Generation finished"
    );

    let publisher = SitemapPublisher::new(&config.sitemap.path, &config.sitemap.base_url);
    publisher.publish(&store.distinct_narrative_dates()?, &clock.today())?;

    Ok(())
}

async fn sync_phase(config: &RunConfig, clock: Clock) -> StoryloomResult<()> {
    let sync = GitSync::new(config.runner.base_dir.clone(), config.sync.clone());
    sync.sync(&clock.today_compact()).await
}

fn stamp_last_run(config: &RunConfig) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    if let Err(e) = std::fs::write(&config.runner.last_run_path, &timestamp) {
        warn!(error = %e, "Failed to stamp last-run file");
    } else {
        info!(timestamp = %timestamp, "Stamped last run");
    }
}

/// Fetch the current batch and store it; no generation, no lock.
pub async fn ingest(config: &RunConfig) -> i32 {
    let clock = Clock::from_offset_hours(config.runner.utc_offset_hours);

    let outcome = async {
        let store = Store::open(&config.store.database_path)?;
        let trends = TrendClient::new(&config.provider)?;
        let batch = trends.fetch().await?;
        let count = store.insert_topics(&batch, &clock.today())?;
        info!(count, "Ingested trending batch");
        Ok::<(), StoryloomError>(())
    }
    .await;

    match outcome {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!(error = %e, "Ingestion failed");
            failure_code(&e)
        }
    }
}

/// Rebuild the sitemap from the store; no lock.
pub fn republish_sitemap(config: &RunConfig) -> i32 {
    let clock = Clock::from_offset_hours(config.runner.utc_offset_hours);

    let outcome = (|| {
        let store = Store::open(&config.store.database_path)?;
        let publisher = SitemapPublisher::new(&config.sitemap.path, &config.sitemap.base_url);
        publisher.publish(&store.distinct_narrative_dates()?, &clock.today())?;
        Ok::<(), StoryloomError>(())
    })();

    match outcome {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!(error = %e, "Sitemap republication failed");
            failure_code(&e)
        }
    }
}
