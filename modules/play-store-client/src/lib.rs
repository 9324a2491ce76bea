pub mod error;
mod parse;
pub mod types;

pub use error::{PlayStoreError, Result};
pub use types::{AppDetails, ContinuationToken, Review, ReviewPage, SearchHit};

use std::time::Duration;

const BASE_URL: &str = "https://play.google.com";

/// Largest page the review RPC will serve in one call.
pub const MAX_REVIEWS_PER_PAGE: u32 = 200;

/// Client for the public Google Play web endpoints. Every call is scoped to
/// the language and country the client was built with.
pub struct PlayStoreClient {
    client: reqwest::Client,
    base_url: String,
    lang: String,
    country: String,
}

impl PlayStoreClient {
    pub fn new(lang: &str, country: &str) -> Result<Self> {
        Self::with_base_url(BASE_URL, lang, country)
    }

    /// Point the client at a different host (used for local fixtures).
    pub fn with_base_url(base_url: &str, lang: &str, country: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            lang: lang.to_string(),
            country: country.to_string(),
        })
    }

    async fn get_page(&self, path: &str, query: &[(&str, &str)], target: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("hl", self.lang.as_str()), ("gl", self.country.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PlayStoreError::from_status(status.as_u16(), target, body));
        }

        Ok(resp.text().await?)
    }

    /// Fetch the listing details of one app.
    pub async fn app(&self, app_id: &str) -> Result<AppDetails> {
        tracing::debug!(app_id, "Fetching app details");
        let html = self
            .get_page("/store/apps/details", &[("id", app_id)], app_id)
            .await?;
        parse::parse_app_details(app_id, &html)
    }

    /// Search apps by keyword. Returns at most `limit` hits in store order.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        tracing::debug!(query, limit, "Searching store");
        let html = self
            .get_page("/store/search", &[("q", query), ("c", "apps")], query)
            .await?;
        Ok(parse::parse_search_hits(&html, limit))
    }

    /// Fetch one page of newest reviews. Pass the cursor from the previous
    /// page to continue; `count` is clamped to [`MAX_REVIEWS_PER_PAGE`].
    pub async fn reviews(
        &self,
        app_id: &str,
        count: u32,
        token: Option<&ContinuationToken>,
    ) -> Result<ReviewPage> {
        let count = count.min(MAX_REVIEWS_PER_PAGE);
        tracing::debug!(app_id, count, continued = token.is_some(), "Fetching review page");

        let url = format!("{}/_/PlayStoreUi/data/batchexecute", self.base_url);
        let body = parse::reviews_request_body(app_id, count, token);
        let resp = self
            .client
            .post(&url)
            .query(&[
                ("rpcids", parse::REVIEWS_RPC_ID),
                ("hl", self.lang.as_str()),
                ("gl", self.country.as_str()),
            ])
            .form(&[("f.req", body)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PlayStoreError::from_status(status.as_u16(), app_id, body));
        }

        let text = resp.text().await?;
        parse::parse_reviews_response(&text)
    }
}
