use arrest_scrap::{process::run, Config};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("arrest_scrap=info"));

    if json_format {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let config = Config::parse();

    match run(&config).await {
        Ok(summary) => info!(
            days = summary.days_completed,
            records = summary.records_written,
            failed_attempts = summary.failed_attempts,
            rows_skipped = summary.rows_skipped,
            abandoned = summary.abandoned.len(),
            "run finished"
        ),
        Err(e) => {
            error!("Run failed: {e}");
            std::process::exit(1);
        }
    }
}
