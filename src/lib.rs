//! ARREST BOOKING SCRAPER
//! Walks the booking-date search one day at a time and saves every day to its own file.
//!
//! [`process::run`] fetches the session token, seeds a [`queue::WorkQueue`] with every date,
//! and lets a [`worker::WorkerPool`] drain it. Failed dates go back into the queue.

mod error;
mod macros;
mod parse;

pub mod config;
pub mod dates;
pub mod executor;
pub mod output;
pub mod process;
pub mod queue;
pub mod record;
pub mod request;
pub mod retry;
pub mod token;
pub mod worker;

pub use config::Config;
pub use error::{Error, Result};

pub const SEARCH_URL: &str = "http://www.polksheriff.org/inq/Pages/Jail.aspx";
pub const START_DATE: &str = "1990-01-01";
pub const END_DATE: &str = "2017-01-03";
pub const WORKER_COUNT: usize = 50;
pub const OUTPUT_DIR: &str = "data";
