//! Background refresh scheduler.
//!
//! Registers a recurring job that re-fetches every brand's rows on both
//! platforms, using the cron expression from configuration.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use brandpulse_core::{AppConfig, BrandsFile, Platform};
use brandpulse_store::{refresh_brands, PostStore, SheetClient};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process; dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    store: Arc<PostStore>,
    sheets: Arc<SheetClient>,
    brands: Arc<BrandsFile>,
    config: Arc<AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(config.refresh_cron.as_str(), move |_uuid, _lock| {
        let store = Arc::clone(&store);
        let sheets = Arc::clone(&sheets);
        let brands = Arc::clone(&brands);

        Box::pin(async move {
            tracing::info!("scheduler: starting full refresh");
            run_full_refresh(&store, &sheets, &brands).await;
            tracing::info!("scheduler: full refresh complete");
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

/// Refresh every brand on both platforms.
pub async fn run_full_refresh(store: &PostStore, sheets: &SheetClient, brands: &BrandsFile) {
    for platform in Platform::ALL {
        let outcomes = refresh_brands(store, sheets, &brands.brands, platform).await;
        let total: usize = outcomes.iter().map(|o| o.post_count).sum();
        tracing::info!(
            %platform,
            brand_count = outcomes.len(),
            post_count = total,
            "scheduler: platform refresh finished"
        );
    }
}
