use tracing::{info, warn};

use crate::traits::{ProbeFailure, ProbeResponse, UrlProber};
use crate::types::SourceStatus;

/// Turn one probe outcome into a source row.
pub fn classify(
    name: &str,
    url: &str,
    outcome: Result<ProbeResponse, ProbeFailure>,
) -> SourceStatus {
    match outcome {
        Ok(resp) if (200..400).contains(&resp.status) => {
            let login_gate = resp.final_url.to_lowercase().contains("login");
            SourceStatus {
                name: name.to_string(),
                url: url.to_string(),
                status: resp.status,
                reachable: true,
                data_accessible: !login_gate,
                final_url: resp.final_url,
                error: String::new(),
            }
        }
        Ok(resp) => SourceStatus {
            name: name.to_string(),
            url: url.to_string(),
            status: resp.status,
            reachable: false,
            data_accessible: false,
            final_url: url.to_string(),
            error: format!("http_error:{}", resp.status),
        },
        Err(failure) => SourceStatus {
            name: name.to_string(),
            url: url.to_string(),
            status: 0,
            reachable: false,
            data_accessible: false,
            final_url: url.to_string(),
            error: failure.tag(),
        },
    }
}

/// Probe every `(name, url)` pair in order. Never fails; failures land on the row.
pub async fn probe_sources(prober: &dyn UrlProber, sources: &[(&str, &str)]) -> Vec<SourceStatus> {
    let mut rows = Vec::with_capacity(sources.len());
    for (name, url) in sources {
        let row = classify(name, url, prober.get(url).await);
        if row.reachable {
            info!(source = name, status = row.status, data_accessible = row.data_accessible, "Source reachable");
        } else {
            warn!(source = name, status = row.status, error = %row.error, "Source not reachable");
        }
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProber;

    fn ok(status: u16, final_url: &str) -> Result<ProbeResponse, ProbeFailure> {
        Ok(ProbeResponse {
            status,
            final_url: final_url.to_string(),
        })
    }

    #[test]
    fn redirect_to_login_is_reachable_but_not_accessible() {
        let row = classify("AppMagic", "https://appmagic.rocks", ok(200, "https://appmagic.rocks/Login?next=/"));
        assert!(row.reachable);
        assert!(!row.data_accessible);
        assert!(row.error.is_empty());
    }

    #[test]
    fn http_error_status_is_recorded() {
        let row = classify("x", "https://x.test", ok(403, "https://x.test/blocked"));
        assert_eq!(row.status, 403);
        assert!(!row.reachable);
        assert_eq!(row.error, "http_error:403");
        assert_eq!(row.final_url, "https://x.test");
    }

    #[test]
    fn transport_failure_yields_status_zero() {
        let row = classify("x", "https://x.test", Err(ProbeFailure::Timeout));
        assert_eq!(row.status, 0);
        assert_eq!(row.error, "timeout");

        let row = classify("x", "https://x.test", Err(ProbeFailure::Connect("refused".into())));
        assert_eq!(row.error, "connect_error:refused");
    }

    #[tokio::test]
    async fn probe_sources_keeps_order_and_absorbs_failures() {
        let prober = MockProber::new()
            .on_get("https://a.test", 200, "https://a.test/")
            .on_failure("https://b.test", ProbeFailure::Other("dns".into()));

        let rows = probe_sources(&prober, &[("A", "https://a.test"), ("B", "https://b.test")]).await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "A");
        assert!(rows[0].data_accessible);
        assert_eq!(rows[1].error, "error:dns");
    }
}
