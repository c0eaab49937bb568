use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;

use crate::retry::RetryPolicy;
use crate::{Error, Result, END_DATE, OUTPUT_DIR, SEARCH_URL, START_DATE, WORKER_COUNT};

/// Download every arrest booking between two dates, one file per day.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// First booking date to fetch (YYYY-MM-DD)
    #[arg(long, default_value = START_DATE)]
    pub start_date: NaiveDate,

    /// Last booking date to fetch, inclusive (YYYY-MM-DD)
    #[arg(long, default_value = END_DATE)]
    pub end_date: NaiveDate,

    /// Number of concurrent workers
    #[arg(long, short = 'w', default_value_t = WORKER_COUNT)]
    pub workers: usize,

    /// Directory the day-files are written to
    #[arg(long, short = 'o', default_value = OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Search page URL
    #[arg(long, default_value = SEARCH_URL)]
    pub url: String,

    /// Give up on a date after this many failed attempts. Retries forever if not set.
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Delay before the first retry of a date, doubled on each further failure
    #[arg(long, default_value_t = 0)]
    pub backoff_ms: u64,

    /// Upper bound for the retry delay
    #[arg(long, default_value_t = 30_000)]
    pub max_backoff_ms: u64,

    /// Per-request timeout. Requests may hang forever if not set.
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from(["arrest-scrap"])
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidConfig("--workers must be at least 1".into()));
        }
        if self.start_date > self.end_date {
            return Err(Error::InvalidDateRange {
                start: self.start_date.to_string(),
                end: self.end_date.to_string(),
            });
        }
        if self.max_attempts == Some(0) {
            return Err(Error::InvalidConfig("--max-attempts must be at least 1".into()));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
