// Trait seams for the two network collaborators of a scan.
//
// StoreClient: app store metadata, search and review pages.
// UrlProber: single HTTP GET used by the reachability check.
//
// Production impls wrap PlayStoreClient and reqwest; tests swap in the
// mocks from `testing`.

use std::time::Duration;

use async_trait::async_trait;
use play_store_client::{
    AppDetails, ContinuationToken, PlayStoreClient, PlayStoreError, ReviewPage, SearchHit,
};

// ---------------------------------------------------------------------------
// StoreClient
// ---------------------------------------------------------------------------

#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Fetch listing details for one app.
    async fn app(&self, app_id: &str) -> Result<AppDetails, PlayStoreError>;

    /// Keyword search, at most `limit` hits.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, PlayStoreError>;

    /// One page of newest reviews, continuing from `cursor` when given.
    async fn reviews(
        &self,
        app_id: &str,
        count: u32,
        cursor: Option<&ContinuationToken>,
    ) -> Result<ReviewPage, PlayStoreError>;
}

#[async_trait]
impl StoreClient for PlayStoreClient {
    async fn app(&self, app_id: &str) -> Result<AppDetails, PlayStoreError> {
        PlayStoreClient::app(self, app_id).await
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, PlayStoreError> {
        PlayStoreClient::search(self, query, limit).await
    }

    async fn reviews(
        &self,
        app_id: &str,
        count: u32,
        cursor: Option<&ContinuationToken>,
    ) -> Result<ReviewPage, PlayStoreError> {
        PlayStoreClient::reviews(self, app_id, count, cursor).await
    }
}

// ---------------------------------------------------------------------------
// UrlProber
// ---------------------------------------------------------------------------

/// What a completed GET looked like after redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub final_url: String,
}

/// Transport-level probe failure (no HTTP status was received).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    Timeout,
    Connect(String),
    Other(String),
}

impl ProbeFailure {
    /// Error tag stored on the source row.
    pub fn tag(&self) -> String {
        match self {
            ProbeFailure::Timeout => "timeout".to_string(),
            ProbeFailure::Connect(detail) => format!("connect_error:{detail}"),
            ProbeFailure::Other(detail) => format!("error:{detail}"),
        }
    }
}

#[async_trait]
pub trait UrlProber: Send + Sync {
    async fn get(&self, url: &str) -> Result<ProbeResponse, ProbeFailure>;
}

/// reqwest-backed prober with a fixed user-agent and timeout.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl UrlProber for HttpProber {
    async fn get(&self, url: &str) -> Result<ProbeResponse, ProbeFailure> {
        match self.client.get(url).send().await {
            Ok(resp) => Ok(ProbeResponse {
                status: resp.status().as_u16(),
                final_url: resp.url().to_string(),
            }),
            Err(e) if e.is_timeout() => Err(ProbeFailure::Timeout),
            Err(e) if e.is_connect() => Err(ProbeFailure::Connect(e.to_string())),
            Err(e) => Err(ProbeFailure::Other(e.to_string())),
        }
    }
}
