// Extraction of structured data from Play store responses.
//
// Details and search pages embed their data as
// `AF_initDataCallback({key: 'ds:N', hash: '..', data:[...], sideChannel: {}});`
// script blocks. Reviews come back from the `batchexecute` RPC endpoint as a
// JSON envelope whose payload is itself a JSON-encoded string.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::DateTime;
use regex::Regex;
use serde_json::{json, Value};

use crate::error::{PlayStoreError, Result};
use crate::types::{AppDetails, ContinuationToken, Review, ReviewPage, SearchHit};

/// RPC id of the review listing call.
pub(crate) const REVIEWS_RPC_ID: &str = "UsvDTd";

/// Sort order code for "newest first".
const SORT_NEWEST: u8 = 2;

static DATA_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)AF_initDataCallback\(\{key:\s*'(?P<key>ds:\d+)'.*?data:(?P<data>.*?),\s*sideChannel:\s*\{\}\}\);",
    )
    .unwrap()
});
static APP_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/store/apps/details\?id=(?P<id>[A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)+)").unwrap()
});

/// Collect every `ds:N` data block on the page. Blocks that fail to parse as
/// JSON are skipped.
pub(crate) fn data_blocks(html: &str) -> HashMap<String, Value> {
    DATA_BLOCK_RE
        .captures_iter(html)
        .filter_map(|caps| {
            let key = caps.name("key")?.as_str().to_string();
            let value = serde_json::from_str::<Value>(caps.name("data")?.as_str()).ok()?;
            Some((key, value))
        })
        .collect()
}

/// Walk nested arrays by index.
pub(crate) fn lookup<'a>(value: &'a Value, path: &[usize]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, &i| v.get(i))
}

fn string_at(value: &Value, path: &[usize]) -> Option<String> {
    lookup(value, path)
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|s| !s.is_empty())
}

fn u64_at(value: &Value, path: &[usize]) -> Option<u64> {
    lookup(value, path).and_then(Value::as_u64)
}

fn f64_at(value: &Value, path: &[usize]) -> Option<f64> {
    lookup(value, path).and_then(Value::as_f64)
}

/// Parse the details page of `app_id`.
pub(crate) fn parse_app_details(app_id: &str, html: &str) -> Result<AppDetails> {
    let blocks = data_blocks(html);
    let root = blocks
        .get("ds:5")
        .ok_or_else(|| PlayStoreError::Parse(format!("no ds:5 data block for {app_id}")))?;

    let title = string_at(root, &[1, 2, 0, 0])
        .ok_or_else(|| PlayStoreError::Parse(format!("no title in details for {app_id}")))?;

    Ok(AppDetails {
        app_id: app_id.to_string(),
        title,
        developer: string_at(root, &[1, 2, 68, 0]),
        summary: string_at(root, &[1, 2, 73, 0, 1]),
        description: string_at(root, &[1, 2, 72, 0, 1]),
        installs: string_at(root, &[1, 2, 13, 0]),
        min_installs: u64_at(root, &[1, 2, 13, 1]),
        real_installs: u64_at(root, &[1, 2, 13, 2]),
        score: f64_at(root, &[1, 2, 51, 0, 1]),
        ratings: u64_at(root, &[1, 2, 51, 2, 1]),
        reviews: u64_at(root, &[1, 2, 51, 3, 1]),
        genre: string_at(root, &[1, 2, 79, 0, 0, 0]),
    })
}

/// Pull app ids out of a search results page in document order, deduplicated.
pub(crate) fn parse_search_hits(html: &str, limit: usize) -> Vec<SearchHit> {
    let mut seen = std::collections::HashSet::new();
    APP_LINK_RE
        .captures_iter(html)
        .filter_map(|caps| caps.name("id").map(|m| m.as_str().to_string()))
        .filter(|id| seen.insert(id.clone()))
        .take(limit)
        .map(|app_id| SearchHit {
            app_id,
            ..SearchHit::default()
        })
        .collect()
}

/// Build the `f.req` form value for one page of newest reviews.
pub(crate) fn reviews_request_body(
    app_id: &str,
    count: u32,
    token: Option<&ContinuationToken>,
) -> String {
    let cursor = token.map(|t| Value::String(t.0.clone())).unwrap_or(Value::Null);
    let inner = json!([
        null,
        null,
        [2, SORT_NEWEST, [count, null, cursor], null, []],
        [app_id, 7]
    ]);
    json!([[[REVIEWS_RPC_ID, inner.to_string(), null, "generic"]]]).to_string()
}

fn parse_review(item: &Value) -> Option<Review> {
    let review_id = string_at(item, &[0])?;
    Some(Review {
        review_id,
        user_name: string_at(item, &[1, 0]),
        content: string_at(item, &[4]).unwrap_or_default(),
        score: u64_at(item, &[2]).map(|s| s.min(5) as u8).unwrap_or(0),
        thumbs_up: u64_at(item, &[6]).unwrap_or(0),
        at: lookup(item, &[5, 0])
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        app_version: string_at(item, &[10]),
    })
}

/// Parse a `batchexecute` response into a review page.
pub(crate) fn parse_reviews_response(body: &str) -> Result<ReviewPage> {
    let start = body
        .find('[')
        .ok_or_else(|| PlayStoreError::Parse("empty review response".to_string()))?;
    let envelope: Value = serde_json::from_str(&body[start..])?;

    let payload = match lookup(&envelope, &[0, 2]).and_then(Value::as_str) {
        Some(p) => p,
        // No payload means the app has no (more) reviews.
        None => return Ok(ReviewPage::default()),
    };
    let data: Value = serde_json::from_str(payload)?;

    let reviews = lookup(&data, &[0])
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_review).collect())
        .unwrap_or_default();

    let next = data
        .as_array()
        .into_iter()
        .flatten()
        .skip(1)
        .filter_map(Value::as_array)
        .find_map(|arr| arr.last().and_then(Value::as_str))
        .map(|t| ContinuationToken(t.to_string()));

    Ok(ReviewPage { reviews, next })
}
