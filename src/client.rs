// SRU HTTP client: single searches and bounded-concurrency batches

use crate::config::{ConfigError, SruConfig, Zone};
use crate::query::{make_url, SearchParams};
use crate::response::SruResponse;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_WORKERS: usize = 4;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClientStats {
    pub requests_sent: usize,
    pub requests_succeeded: usize,
    pub requests_failed: usize,
}

// GET a URL and return the response body as text
#[async_trait]
pub trait HttpFetcher: Send + Sync + 'static {
    async fn get(&self, url: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

pub struct SruClient<F: HttpFetcher = ReqwestFetcher> {
    config: SruConfig,
    fetcher: F,
    stats: Mutex<ClientStats>,
}

impl SruClient<ReqwestFetcher> {
    pub fn new(config: SruConfig) -> Self {
        Self::with_fetcher(config, ReqwestFetcher::new())
    }
}

impl<F: HttpFetcher> SruClient<F> {
    pub fn with_fetcher(config: SruConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            stats: Mutex::new(ClientStats::default()),
        }
    }

    pub fn config(&self) -> &SruConfig {
        &self.config
    }

    pub fn stats(&self) -> ClientStats {
        self.stats.lock().clone()
    }

    // Transport failures are returned as-is, never retried
    pub async fn search(&self, url: &str) -> Result<String, FetchError> {
        self.stats.lock().requests_sent += 1;
        debug!(url, "SRU request");

        let result = self.fetcher.get(url).await;

        let mut stats = self.stats.lock();
        match &result {
            Ok(_) => stats.requests_succeeded += 1,
            Err(e) => {
                stats.requests_failed += 1;
                warn!(url, error = %e, "SRU request failed");
            }
        }
        result
    }

    /// Fetches every URL with at most `workers` requests in flight.
    ///
    /// Results come back in the order of `urls`, whatever order the requests
    /// complete in.
    pub async fn searches(
        &self,
        urls: &[String],
        workers: usize,
    ) -> Vec<Result<String, FetchError>> {
        stream::iter(urls)
            .map(|url| self.search(url))
            .buffered(workers.max(1))
            .collect()
            .await
    }

    pub async fn search_and_parse(
        &self,
        zone: Zone,
        params: &SearchParams,
    ) -> Result<SruResponse, ClientError> {
        let url = make_url(&self.config, zone, params)?;
        let raw = self.search(&url).await?;
        Ok(SruResponse::parse(raw, &self.config.context(zone)))
    }

    pub async fn search_many(
        &self,
        zone: Zone,
        queries: &[SearchParams],
        workers: usize,
    ) -> Result<Vec<Result<SruResponse, FetchError>>, ConfigError> {
        let urls = queries
            .iter()
            .map(|params| make_url(&self.config, zone, params))
            .collect::<Result<Vec<_>, _>>()?;
        let ctx = self.config.context(zone);

        Ok(self
            .searches(&urls, workers)
            .await
            .into_iter()
            .map(|result| result.map(|raw| SruResponse::parse(raw, &ctx)))
            .collect())
    }
}
