//! HTTP asset fetching
//!
//! Retrieves raw audio bytes for a resolved URL. Every request carries a
//! `timestamp` query parameter so intermediary caches never serve stale
//! bytes, and advertises range support via a `Range: 0-*` header; a server
//! answering 206 Partial Content is therefore as valid as a full 200.

use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE, RANGE};
use reqwest::Client;
use url::Url;

use crate::error::{Error, Result};

/// Fetches raw bytes for audio asset URLs.
#[derive(Debug, Clone, Default)]
pub struct AssetFetcher {
    client: Client,
}

impl AssetFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Fetch the raw bytes behind `url`.
    ///
    /// Success only on HTTP 200 (full content) or 206 (partial content); any
    /// other status or a transport failure is a `Network` error.
    pub async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let busted = cache_busted(url);
        debug!("fetching {}", busted);

        let response = self
            .client
            .get(busted)
            .header(CONTENT_TYPE, "audio/*")
            .header(ACCEPT, "audio/*")
            .header(RANGE, "0-*")
            .send()
            .await
            .map_err(Error::transport)?;

        match response.status().as_u16() {
            200 | 206 => {
                let bytes = response.bytes().await.map_err(Error::transport)?;
                Ok(bytes.to_vec())
            }
            status => Err(Error::http_status(status)),
        }
    }
}

/// Append an epoch-millisecond `timestamp` query parameter.
fn cache_busted(url: &Url) -> Url {
    let mut busted = url.clone();
    let timestamp = chrono::Utc::now().timestamp_millis();
    busted
        .query_pairs_mut()
        .append_pair("timestamp", &timestamp.to_string());
    busted
}
