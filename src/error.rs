use thiserror::Error;

use crate::dates::DateUnit;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Couldn't obtain a session token, no query can be authorized: {0}")]
    TokenUnavailable(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Date {0} was completed or requeued without being taken from the queue.")]
    NotCheckedOut(DateUnit),

    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
