use crate::config::{Config, DEFAULT_HTTP_TIMEOUT_SECS, LISTING_URL, USER_AGENT};
use std::time::Duration;

/// Request parameters for the listing page fetch
#[derive(Debug, Clone)]
pub struct SourceParams {
    /// Search results page to poll
    pub url: String,
    /// Browser-like User-Agent header
    pub user_agent: String,
    /// Bound on the whole request, connect included
    pub timeout: Duration,
}

impl SourceParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.listing_url.clone(),
            user_agent: USER_AGENT.to_string(),
            timeout: config.http_timeout,
        }
    }
}

impl Default for SourceParams {
    fn default() -> Self {
        Self {
            url: LISTING_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}
