use std::sync::Arc;

use thiserror::Error;
use tokio::task::spawn_blocking;

use crate::dates::DateUnit;
use crate::parse::parse_results_rows;
use crate::record::RawRow;
use crate::request::SearchClient;
use crate::token::SessionToken;
use crate::Error;

/// ASP.NET naming container of the booking-date search controls.
pub const FORM_FIELD_PREFIX: &str = "ctl00$ctl15$g_413cdd9d_e152_40ad_9a7a_a595a01d2d51$ctl00$";

/// A single query attempt didn't produce a results table. Always retryable.
#[derive(Debug, Error)]
pub enum QueryFailed {
    #[error("search request failed: {0}")]
    Transport(#[source] Error),
    #[error("response has no results table")]
    MissingResultsTable,
    #[error("couldn't parse response: {0}")]
    Parse(#[source] Error),
}

pub struct DateQueryExecutor {
    client: Arc<dyn SearchClient>,
}

impl DateQueryExecutor {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self { client }
    }

    /// One query-and-parse attempt for `unit`.
    /// `Ok` with no rows means nobody was booked that day.
    pub async fn execute(
        &self,
        token: &SessionToken,
        unit: DateUnit,
    ) -> Result<Vec<RawRow>, QueryFailed> {
        let form = build_query_form(token, unit);
        let html = self
            .client
            .search(&form)
            .await
            .map_err(QueryFailed::Transport)?;

        let rows = spawn_blocking(move || parse_results_rows(&html))
            .await
            .map_err(|e| QueryFailed::Parse(e.into()))?
            .map_err(QueryFailed::Parse)?;

        rows.ok_or(QueryFailed::MissingResultsTable)
    }
}

/// Token fields plus the booking-date controls. Built fresh for every attempt.
pub fn build_query_form(token: &SessionToken, unit: DateUnit) -> Vec<(String, String)> {
    let mut form: Vec<(String, String)> = token
        .fields()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let controls = [
        ("ddlBookingMonth", unit.month().to_string()),
        ("ddlBookingDay", unit.day().to_string()),
        ("ddlBookingYear", unit.year().to_string()),
        ("btnBookingDateSearch", "Search".to_string()),
    ];
    form.extend(
        controls
            .into_iter()
            .map(|(name, value)| (format!("{FORM_FIELD_PREFIX}{name}"), value)),
    );
    form
}
