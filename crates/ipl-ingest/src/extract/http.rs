use std::time::Duration;

use polars::prelude::DataFrame;
use reqwest::blocking::Client;

use super::{Extractor, parse_source};
use crate::error::ExtractError;

/// Default timeout for a source download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads a CSV document of batting records over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpExtractor {
    url: String,
    timeout: Duration,
}

impl HttpExtractor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn unavailable(&self, err: impl ToString) -> ExtractError {
        ExtractError::SourceUnavailable {
            origin: self.url.clone(),
            reason: err.to_string(),
        }
    }
}

impl Extractor for HttpExtractor {
    fn origin(&self) -> String {
        self.url.clone()
    }

    fn extract(&self) -> Result<DataFrame, ExtractError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("ipl-etl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| self.unavailable(err))?;

        let response = client
            .get(&self.url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|err| self.unavailable(err))?;
        let body = response.bytes().map_err(|err| self.unavailable(err))?;

        let df = parse_source(&self.url, body.to_vec())?;
        tracing::debug!(url = %self.url, rows = df.height(), "downloaded source");
        Ok(df)
    }
}
