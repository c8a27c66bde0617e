//! Fetching registry descriptors over HTTP.

use std::collections::HashMap;
use std::error::Error;
use std::time::Duration;

use crate::models::RegistryItem;

/// Source of registry descriptors, keyed by URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<RegistryItem, FetchError>;
}

/// Blocking HTTP fetcher with connect and request timeouts.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("mcpreg/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(FetchError::HttpClient)?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<RegistryItem, FetchError> {
        tracing::debug!("GET {}", url);
        let resp = self.client.get(url).send().map_err(|e| FetchError::Request {
            url: url.to_string(),
            cause: e,
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.text().map_err(|e| FetchError::Request {
            url: url.to_string(),
            cause: e,
        })?;
        serde_json::from_str(&body).map_err(|e| FetchError::Parse {
            url: url.to_string(),
            cause: e,
        })
    }
}

/// Descriptors held in memory, for offline use.
impl Fetcher for HashMap<String, RegistryItem> {
    fn fetch(&self, url: &str) -> Result<RegistryItem, FetchError> {
        self.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("Request to {url} failed: {}", chain(.cause))]
    Request {
        url: String,
        #[source]
        cause: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("{url} did not return a registry item: {cause}")]
    Parse {
        url: String,
        #[source]
        cause: serde_json::Error,
    },
}

// reqwest's top-level message rarely says what went wrong; include the causes.
fn chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut source: Option<&(dyn Error + 'static)> = err.source();
    while let Some(s) = source {
        out.push_str(": ");
        out.push_str(&s.to_string());
        source = s.source();
    }
    out
}
