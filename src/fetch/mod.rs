use anyhow::Result;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

use crate::archive::ArchivePage;
use crate::config::Config;
use crate::error::RetrievalError;

pub mod cache;

use cache::Cache;

pub fn build_client(cfg: &Config) -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("snarchive/", env!("CARGO_PKG_VERSION")))
        .timeout(cfg.timeout)
        .build()?;
    Ok(client)
}

pub async fn download(client: &Client, url: &str) -> Result<Bytes, RetrievalError> {
    let net = |source| RetrievalError::Network { url: url.to_string(), source };
    let resp = client.get(url).send().await.map_err(net)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(RetrievalError::Status { url: url.to_string(), status });
    }
    resp.bytes().await.map_err(net)
}

/// Archive page retrieval behind the on-disk cache.
pub struct PageFetcher {
    client: Client,
    cache: Cache,
}

impl PageFetcher {
    pub fn new(client: Client, cache: Cache) -> Self {
        PageFetcher { client, cache }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(PageFetcher::new(build_client(cfg)?, Cache::open(&cfg.cache_dir)?))
    }

    pub async fn fetch(&self, page: &ArchivePage) -> Result<Bytes, RetrievalError> {
        match self.cache.load(&page.url, page.expiry()) {
            Ok(Some(body)) => {
                debug!(url = %page.url, bytes = body.len(), "cache hit");
                return Ok(body);
            }
            Ok(None) => debug!(url = %page.url, "cache miss"),
            Err(e) => warn!(url = %page.url, error = %e, "cache read failed"),
        }

        let body = download(&self.client, &page.url).await?;
        if let Err(e) = self.cache.save(&page.url, &body) {
            warn!(url = %page.url, error = %e, "cache write failed");
        }
        Ok(body)
    }
}
