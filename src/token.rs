use std::collections::BTreeMap;

use tokio::task::spawn_blocking;
use tracing::debug;

use crate::parse::{parse_hidden_fields, FORM_ID, REQUIRED_FIELDS};
use crate::request::SearchClient;
use crate::{Error, Result};

/// Hidden form state the search endpoint requires on every query.
/// Fetched once per run and shared read-only between workers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToken {
    fields: BTreeMap<String, String>,
}

impl SessionToken {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Loads the landing page and reads the view-state fields off its form.
/// Any failure here is fatal for the run.
pub async fn fetch_token(client: &dyn SearchClient) -> Result<SessionToken> {
    let html = client
        .landing_page()
        .await
        .map_err(|e| Error::TokenUnavailable(format!("landing page request failed: {e}")))?;

    let fields =
        spawn_blocking(move || parse_hidden_fields(&html, FORM_ID, &REQUIRED_FIELDS)).await??;
    debug!(fields = fields.len(), "fetched session token");

    Ok(SessionToken::new(fields))
}
