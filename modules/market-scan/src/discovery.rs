use tracing::{info, warn};

use play_store_client::SearchHit;

use crate::catalog::segment_queries;
use crate::traits::StoreClient;
use crate::types::{Candidate, Segment};

/// Candidates keyed by app id, in first-sighting order.
#[derive(Debug, Default)]
pub struct CandidateMap {
    order: Vec<String>,
    by_id: std::collections::HashMap<String, Candidate>,
}

impl CandidateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, app_id: &str) -> Option<&Candidate> {
        self.by_id.get(app_id)
    }

    /// Insert a seed package. Re-seeding an existing id only sets the flag.
    pub fn insert_seed(&mut self, app_id: &str) {
        match self.by_id.get_mut(app_id) {
            Some(existing) => existing.seed = true,
            None => {
                self.order.push(app_id.to_string());
                self.by_id.insert(app_id.to_string(), Candidate::seed(app_id));
            }
        }
    }

    /// Merge a search hit found under `segment`: segments are unioned, the
    /// install estimate keeps the maximum, title and score hints take the
    /// latest non-empty value.
    pub fn merge_hit(&mut self, segment: Segment, hit: &SearchHit) {
        let entry = self
            .by_id
            .entry(hit.app_id.clone())
            .or_insert_with(|| {
                self.order.push(hit.app_id.clone());
                Candidate {
                    app_id: hit.app_id.clone(),
                    ..Candidate::default()
                }
            });

        entry.segments.insert(segment);
        entry.installs_hint = match (entry.installs_hint, hit.installs) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        if hit.title.is_some() {
            entry.title_hint = hit.title.clone();
        }
        if hit.score.is_some() {
            entry.score_hint = hit.score;
        }
    }

    /// Candidates in first-sighting order.
    pub fn into_candidates(mut self) -> Vec<Candidate> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.remove(id))
            .collect()
    }
}

/// Outcome counters for one discovery pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryStats {
    pub queries_run: u32,
    pub queries_failed: u32,
    pub hits: u32,
}

/// Seed the map, then run every segment query. A `hits_per_query` of zero
/// skips search entirely.
pub async fn discover_candidates(
    store: &dyn StoreClient,
    seeds: &[&str],
    hits_per_query: usize,
) -> (Vec<Candidate>, DiscoveryStats) {
    let mut map = CandidateMap::new();
    let mut stats = DiscoveryStats::default();

    for seed in seeds {
        map.insert_seed(seed);
    }

    if hits_per_query == 0 {
        info!(seeds = map.len(), "Search disabled, using seed packages only");
        return (map.into_candidates(), stats);
    }

    for segment in Segment::ALL {
        for query in segment_queries(segment) {
            stats.queries_run += 1;
            match store.search(query, hits_per_query).await {
                Ok(hits) => {
                    stats.hits += hits.len() as u32;
                    for hit in &hits {
                        map.merge_hit(segment, hit);
                    }
                }
                Err(e) => {
                    stats.queries_failed += 1;
                    warn!(segment = %segment, query, error = %e, "Search failed");
                }
            }
        }
    }

    info!(
        candidates = map.len(),
        queries = stats.queries_run,
        failed = stats.queries_failed,
        "Discovery complete"
    );
    (map.into_candidates(), stats)
}
