//! Fuzzy error clustering.
//!
//! Failures are grouped by their cluster key, then deduplicated inside each
//! group by comparing free-text fields against the samples already kept.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::config::ParserConfig;
use crate::similarity;
use crate::types::{ErrorCluster, ParsedFailure};

/// Comparison text for a failure without a response body.
const ABSENT_BODY: &str = "None";

/// Free-text fields compared for duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedField {
    ResponseBody,
    RequestParams,
    GatlingError,
}

impl TrackedField {
    /// Comparison order; the first matching field decides.
    pub const PRIORITY: [TrackedField; 3] = [
        TrackedField::ResponseBody,
        TrackedField::RequestParams,
        TrackedField::GatlingError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResponseBody => "response_body",
            Self::RequestParams => "request_params",
            Self::GatlingError => "gatling_error",
        }
    }

    fn value<'a>(&self, failure: &'a ParsedFailure) -> &'a str {
        match self {
            Self::ResponseBody => failure.response_body.as_deref().unwrap_or(ABSENT_BODY),
            Self::RequestParams => &failure.request_params,
            Self::GatlingError => &failure.raw_gatling_error,
        }
    }
}

impl std::fmt::Display for TrackedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single `ingest` call did to the cluster map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// First failure for this key; cluster created with one sample per field.
    NewCluster,
    /// Similar to an existing sample in the given field; counter incremented.
    Duplicate(TrackedField),
    /// No field matched; the failure was kept as new samples.
    NewSample,
}

impl ErrorCluster {
    fn seed(key: String, failure: &ParsedFailure) -> Self {
        Self {
            key,
            request_name: failure.request_name.clone(),
            request_method: failure.request_method.clone(),
            request_url: failure.request_url.clone(),
            headers: failure.headers.clone(),
            environment: failure.environment.clone(),
            response_code: failure.response_code.clone(),
            error_code: failure.error_code.clone(),
            error_count: 1,
            response_bodies: Vec::new(),
            request_params: Vec::new(),
            gatling_errors: Vec::new(),
            first_seen: None,
            last_seen: None,
        }
    }

    fn has_similar(&self, field: TrackedField, value: &str, threshold: f64) -> bool {
        let exceeds = |sample: &str| similarity::ratio(value, sample) > threshold;
        match field {
            TrackedField::ResponseBody => self
                .response_bodies
                .iter()
                .any(|s| exceeds(s.as_deref().unwrap_or(ABSENT_BODY))),
            TrackedField::RequestParams => self.request_params.iter().any(|s| exceeds(s.as_str())),
            TrackedField::GatlingError => self.gatling_errors.iter().any(|s| exceeds(s.as_str())),
        }
    }

    fn push_sample(&mut self, field: TrackedField, failure: &ParsedFailure) {
        match field {
            TrackedField::ResponseBody => self.response_bodies.push(failure.response_body.clone()),
            TrackedField::RequestParams => {
                self.request_params.push(failure.request_params.clone())
            }
            TrackedField::GatlingError => {
                self.gatling_errors.push(failure.raw_gatling_error.clone())
            }
        }
    }

    fn observe(&mut self, at: Option<DateTime<Utc>>) {
        let Some(at) = at else { return };
        self.first_seen = Some(self.first_seen.map_or(at, |seen| seen.min(at)));
        self.last_seen = Some(self.last_seen.map_or(at, |seen| seen.max(at)));
    }
}

/// Owns the cluster map for one parse pass.
///
/// Clusters are kept in first-seen order so output never depends on hash
/// iteration order.
#[derive(Debug, Clone)]
pub struct ErrorAggregator {
    similarity_threshold: f64,
    clusters: Vec<ErrorCluster>,
    index: HashMap<String, usize>,
}

impl ErrorAggregator {
    pub fn new(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
            clusters: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(config.similarity_threshold)
    }

    /// Fold one failure into the cluster map. Must be called in file order.
    pub fn ingest(&mut self, failure: &ParsedFailure) -> IngestOutcome {
        let key = failure.cluster_key();
        let (idx, created) = match self.index.get(&key) {
            Some(&idx) => (idx, false),
            None => {
                let idx = self.clusters.len();
                self.index.insert(key.clone(), idx);
                self.clusters.push(ErrorCluster::seed(key, failure));
                (idx, true)
            }
        };

        let threshold = self.similarity_threshold;
        let cluster = &mut self.clusters[idx];
        cluster.observe(failure.started_at);

        for field in TrackedField::PRIORITY {
            if cluster.has_similar(field, field.value(failure), threshold) {
                cluster.error_count += 1;
                tracing::debug!(
                    key = %cluster.key,
                    field = %field,
                    error_count = cluster.error_count,
                    "duplicate failure"
                );
                return IngestOutcome::Duplicate(field);
            }
            cluster.push_sample(field, failure);
        }

        if created {
            IngestOutcome::NewCluster
        } else {
            IngestOutcome::NewSample
        }
    }

    pub fn get(&self, key: &str) -> Option<&ErrorCluster> {
        self.index.get(key).map(|&idx| &self.clusters[idx])
    }

    /// Clusters in first-seen order.
    pub fn clusters(&self) -> &[ErrorCluster] {
        &self.clusters
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Hand the cluster map over to a reporting collaborator.
    pub fn into_clusters(self) -> Vec<ErrorCluster> {
        self.clusters
    }
}

impl Default for ErrorAggregator {
    fn default() -> Self {
        Self::from_config(&ParserConfig::default())
    }
}
