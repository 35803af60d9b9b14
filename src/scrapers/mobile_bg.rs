use crate::error::{Result, ScoutError};
use crate::scrapers::traits::ListingSource;
use crate::scrapers::types::SourceParams;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

/// mobile.bg search results page fetcher
pub struct MobileBgSource {
    client: Client,
    params: SourceParams,
}

impl MobileBgSource {
    /// Create a source for the default BMW 240 search page
    pub fn new() -> Result<Self> {
        Self::with_params(SourceParams::default())
    }

    /// Create a source with custom request parameters
    pub fn with_params(params: SourceParams) -> Result<Self> {
        let client = Client::builder()
            .timeout(params.timeout)
            .user_agent(params.user_agent.clone())
            .build()
            .map_err(ScoutError::Fetch)?;

        Ok(Self { client, params })
    }

    pub fn url(&self) -> &str {
        &self.params.url
    }
}

#[async_trait]
impl ListingSource for MobileBgSource {
    async fn fetch_page(&self) -> Result<String> {
        info!("Fetching listing page {}", self.params.url);

        let response = self
            .client
            .get(&self.params.url)
            .send()
            .await
            .map_err(ScoutError::Fetch)?;

        if !response.status().is_success() {
            warn!("mobile.bg returned status: {}", response.status());
            return Err(ScoutError::FetchStatus(response.status()));
        }

        let html = response.text().await.map_err(ScoutError::Fetch)?;

        debug!("Downloaded {} bytes of HTML", html.len());

        Ok(html)
    }

    fn source_name(&self) -> &'static str {
        "mobile.bg"
    }
}
