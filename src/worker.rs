use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::dates::DateUnit;
use crate::executor::DateQueryExecutor;
use crate::output::DayWriter;
use crate::queue::{Job, WorkQueue};
use crate::record::extract_all;
use crate::retry::{RetryDecision, RetryPolicy};
use crate::token::SessionToken;
use crate::{Error, Result};

/// Everything a worker shares with its siblings. Only `queue` is mutable.
pub struct WorkerContext {
    pub queue: Arc<WorkQueue>,
    pub token: Arc<SessionToken>,
    pub executor: DateQueryExecutor,
    pub writer: Arc<dyn DayWriter>,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub days_completed: usize,
    pub records_written: usize,
    pub failed_attempts: usize,
    pub rows_skipped: usize,
    pub abandoned: Vec<DateUnit>,
}

impl WorkerStats {
    pub fn merge(&mut self, other: WorkerStats) {
        self.days_completed += other.days_completed;
        self.records_written += other.records_written;
        self.failed_attempts += other.failed_attempts;
        self.rows_skipped += other.rows_skipped;
        self.abandoned.extend(other.abandoned);
    }
}

/// Fixed number of workers draining one [`WorkQueue`].
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfig("worker count must be at least 1".into()));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Starts every worker. Each one returns its stats once the queue is drained.
    pub fn spawn(&self, ctx: Arc<WorkerContext>) -> JoinSet<Result<WorkerStats>> {
        let mut workers = JoinSet::new();
        for worker_id in 0..self.size {
            workers.spawn({
                let ctx = ctx.clone();
                async move { run_worker(worker_id, ctx).await }
            });
        }
        workers
    }
}

async fn run_worker(worker_id: usize, ctx: Arc<WorkerContext>) -> Result<WorkerStats> {
    let mut stats = WorkerStats::default();

    while let Some(job) = ctx.queue.take().await {
        debug!(worker_id, date = %job.unit, attempt = job.attempt, "capturing arrests");

        let failure = match ctx.executor.execute(&ctx.token, job.unit).await {
            Ok(rows) => {
                let extraction = extract_all(&rows);
                match ctx.writer.write_day(job.unit, &extraction.records).await {
                    Ok(()) => {
                        ctx.queue.complete(&job)?;
                        stats.days_completed += 1;
                        stats.records_written += extraction.records.len();
                        stats.rows_skipped += extraction.skipped;
                        info!(
                            worker_id,
                            date = %job.unit,
                            records = extraction.records.len(),
                            skipped = extraction.skipped,
                            "saved arrests"
                        );
                        continue;
                    }
                    Err(e) => format!("couldn't save day: {e}"),
                }
            }
            Err(e) => e.to_string(),
        };

        stats.failed_attempts += 1;
        handle_failure(worker_id, &ctx, job, &failure, &mut stats).await?;
    }

    Ok(stats)
}

async fn handle_failure(
    worker_id: usize,
    ctx: &WorkerContext,
    job: Job,
    failure: &str,
    stats: &mut WorkerStats,
) -> Result<()> {
    match ctx.retry.decide(job.attempt) {
        RetryDecision::Retry(delay) => {
            warn!(
                worker_id,
                date = %job.unit,
                attempt = job.attempt,
                error = failure,
                "adding arrest date back into queue"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            ctx.queue.requeue(job)
        }
        RetryDecision::GiveUp => {
            error!(
                worker_id,
                date = %job.unit,
                attempt = job.attempt,
                error = failure,
                "giving up on arrest date"
            );
            stats.abandoned.push(job.unit);
            ctx.queue.complete(&job)
        }
    }
}
