use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::Result;

/// The remote search form. One GET for the landing page, one POST per query.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Returns the HTML of the page carrying the search form.
    async fn landing_page(&self) -> Result<String>;

    /// Submits the search form and returns the HTML of the response.
    async fn search(&self, form: &[(String, String)]) -> Result<String>;
}

pub struct HttpSearchClient {
    client: Client,
    url: String,
}

impl HttpSearchClient {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn landing_page(&self) -> Result<String> {
        let res = self.client.get(&self.url).send().await?.error_for_status()?;
        let html = res.text().await?;
        Ok(html)
    }

    async fn search(&self, form: &[(String, String)]) -> Result<String> {
        let res = self
            .client
            .post(&self.url)
            .form(form)
            .send()
            .await?
            .error_for_status()?;
        let html = res.text().await?;
        Ok(html)
    }
}
