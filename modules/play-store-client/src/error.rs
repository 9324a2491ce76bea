use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlayStoreError>;

#[derive(Debug, Error)]
pub enum PlayStoreError {
    #[error("App not found: {0}")]
    NotFound(String),

    #[error("Rate limited by store (status {0})")]
    RateLimited(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl PlayStoreError {
    /// Map a non-success HTTP status to the matching error variant.
    pub fn from_status(status: u16, target: &str, body: String) -> Self {
        match status {
            404 => PlayStoreError::NotFound(target.to_string()),
            429 | 503 => PlayStoreError::RateLimited(status),
            _ => PlayStoreError::Api {
                status,
                message: body,
            },
        }
    }

    /// Short machine-readable tag, used when the error is recorded on a report row.
    pub fn kind(&self) -> &'static str {
        match self {
            PlayStoreError::NotFound(_) => "not_found",
            PlayStoreError::RateLimited(_) => "rate_limited",
            PlayStoreError::Network(_) => "network",
            PlayStoreError::Api { .. } => "api",
            PlayStoreError::Parse(_) => "parse",
        }
    }
}

impl From<reqwest::Error> for PlayStoreError {
    fn from(err: reqwest::Error) -> Self {
        PlayStoreError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for PlayStoreError {
    fn from(err: serde_json::Error) -> Self {
        PlayStoreError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_distinguishes_not_found_and_rate_limit() {
        assert!(matches!(
            PlayStoreError::from_status(404, "com.example", String::new()),
            PlayStoreError::NotFound(id) if id == "com.example"
        ));
        assert!(matches!(
            PlayStoreError::from_status(429, "x", String::new()),
            PlayStoreError::RateLimited(429)
        ));
        assert_eq!(
            PlayStoreError::from_status(500, "x", "boom".into()).kind(),
            "api"
        );
    }
}
