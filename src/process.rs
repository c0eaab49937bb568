use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::config::Config;
use crate::dates::{date_range, DateUnit};
use crate::executor::DateQueryExecutor;
use crate::output::{CsvDayWriter, DayWriter};
use crate::queue::WorkQueue;
use crate::request::{HttpSearchClient, SearchClient};
use crate::retry::RetryPolicy;
use crate::token::fetch_token;
use crate::worker::{WorkerContext, WorkerPool, WorkerStats};
use crate::{info_time, Result};

/// What a finished run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub days_completed: usize,
    pub records_written: usize,
    pub failed_attempts: usize,
    pub rows_skipped: usize,
    /// Dates dropped after hitting the attempt cap. Always empty without one.
    pub abandoned: Vec<DateUnit>,
}

/// Dates, concurrency and retry behaviour of one run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub dates: Vec<DateUnit>,
    pub workers: usize,
    pub retry: RetryPolicy,
}

impl RunPlan {
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dates: date_range(config.start_date, config.end_date)?,
            workers: config.workers,
            retry: config.retry_policy(),
        })
    }
}

/// Runs against the live site, writing day-files into `config.output_dir`.
pub async fn run(config: &Config) -> Result<RunSummary> {
    let plan = RunPlan::from_config(config)?;
    let client = HttpSearchClient::new(config.url.clone(), config.request_timeout())?;
    let writer = CsvDayWriter::new(config.output_dir.clone());

    run_with(Arc::new(client), Arc::new(writer), plan).await
}

/// Fetches the token, then drains every planned date through the worker pool.
/// Only a missing token (or a crashed worker) fails the run.
pub async fn run_with(
    client: Arc<dyn SearchClient>,
    writer: Arc<dyn DayWriter>,
    plan: RunPlan,
) -> Result<RunSummary> {
    let started_at = Local::now();
    info_time!("Started processing");

    let pool = WorkerPool::new(plan.workers)?;
    let token = Arc::new(fetch_token(client.as_ref()).await?);
    info!(fields = token.len(), "session token ready");

    let num_dates = plan.dates.len();
    let queue = Arc::new(WorkQueue::new());
    queue.seed(plan.dates);

    let ctx = Arc::new(WorkerContext {
        queue: queue.clone(),
        token,
        executor: DateQueryExecutor::new(client),
        writer,
        retry: plan.retry,
    });
    let mut workers = pool.spawn(ctx);
    info!(workers = pool.size(), dates = num_dates, "waiting on workers to complete");

    let mut stats = WorkerStats::default();
    {
        let drained = queue.join_until_drained();
        tokio::pin!(drained);
        loop {
            tokio::select! {
                _ = &mut drained => break,
                // A worker only ends early if it failed, surface that instead of hanging.
                joined = workers.join_next() => match joined {
                    Some(res) => stats.merge(res??),
                    None => break,
                },
            }
        }
    }
    while let Some(res) = workers.join_next().await {
        stats.merge(res??);
    }

    if !stats.abandoned.is_empty() {
        warn!(count = stats.abandoned.len(), "some dates were abandoned");
    }
    info_time!(started_at, "Ended processing");

    Ok(RunSummary {
        started_at,
        finished_at: Local::now(),
        days_completed: stats.days_completed,
        records_written: stats.records_written,
        failed_attempts: stats.failed_attempts,
        rows_skipped: stats.rows_skipped,
        abandoned: stats.abandoned,
    })
}
