//! Metrics for the enrichment pipeline
//!
//! Recording goes through the `metrics` facade and is a no-op until a
//! recorder is installed with [`init`].

use crate::common::error::{EnricherError, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::fmt;
use std::sync::OnceLock;
use tracing::info;

/// All metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Fetch metrics
    FetchSuccess,
    FetchNotFound,
    FetchRateLimited,
    FetchFailed,
    FetchRetriesExhausted,
    FetchRequestDuration,

    // Pipeline metrics
    PipelineRuns,
    PipelineInvalidIds,
    PipelineUniqueIds,
    PipelineSuccessful,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::FetchSuccess => "enricher_fetch_success_total",
            MetricName::FetchNotFound => "enricher_fetch_not_found_total",
            MetricName::FetchRateLimited => "enricher_fetch_rate_limited_total",
            MetricName::FetchFailed => "enricher_fetch_failed_total",
            MetricName::FetchRetriesExhausted => "enricher_fetch_retries_exhausted_total",
            MetricName::FetchRequestDuration => "enricher_fetch_request_duration_seconds",
            MetricName::PipelineRuns => "enricher_pipeline_runs_total",
            MetricName::PipelineInvalidIds => "enricher_pipeline_invalid_ids_total",
            MetricName::PipelineUniqueIds => "enricher_pipeline_unique_ids",
            MetricName::PipelineSuccessful => "enricher_pipeline_successful",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Safe to call more than once.
pub fn init() -> Result<()> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| EnricherError::Metrics(format!("Failed to install Prometheus recorder: {}", e)))?;
    METRICS_HANDLE.set(handle).ok();
    info!("Metrics system initialized");
    Ok(())
}

/// Prometheus exposition text, if [`init`] has run
pub fn render() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

// ============================================================================
// Fetch Metrics
// ============================================================================

pub mod fetch {
    use super::MetricName;

    pub fn success() {
        ::metrics::counter!(MetricName::FetchSuccess.as_str()).increment(1);
    }

    pub fn not_found() {
        ::metrics::counter!(MetricName::FetchNotFound.as_str()).increment(1);
    }

    pub fn rate_limited() {
        ::metrics::counter!(MetricName::FetchRateLimited.as_str()).increment(1);
    }

    /// `reason` is one of `status`, `transport`, `payload`
    pub fn failed(reason: &'static str) {
        ::metrics::counter!(MetricName::FetchFailed.as_str(), "reason" => reason).increment(1);
    }

    pub fn retries_exhausted() {
        ::metrics::counter!(MetricName::FetchRetriesExhausted.as_str()).increment(1);
    }

    pub fn request_duration(secs: f64) {
        ::metrics::histogram!(MetricName::FetchRequestDuration.as_str()).record(secs);
    }
}

// ============================================================================
// Pipeline Metrics
// ============================================================================

pub mod pipeline {
    use super::MetricName;

    pub fn run_finished(invalid: usize, unique: usize, successful: usize) {
        ::metrics::counter!(MetricName::PipelineRuns.as_str()).increment(1);
        ::metrics::counter!(MetricName::PipelineInvalidIds.as_str()).increment(invalid as u64);
        ::metrics::gauge!(MetricName::PipelineUniqueIds.as_str()).set(unique as f64);
        ::metrics::gauge!(MetricName::PipelineSuccessful.as_str()).set(successful as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_prometheus_conventions() {
        let all = [
            MetricName::FetchSuccess,
            MetricName::FetchNotFound,
            MetricName::FetchRateLimited,
            MetricName::FetchFailed,
            MetricName::FetchRetriesExhausted,
            MetricName::FetchRequestDuration,
            MetricName::PipelineRuns,
            MetricName::PipelineInvalidIds,
            MetricName::PipelineUniqueIds,
            MetricName::PipelineSuccessful,
        ];
        for name in all {
            let s = name.to_string();
            assert!(s.starts_with("enricher_"));
            assert!(s.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    #[test]
    fn recording_never_panics() {
        fetch::success();
        fetch::failed("status");
        fetch::request_duration(0.25);
        pipeline::run_finished(1, 2, 1);
    }

    #[test]
    fn prometheus_handle_renders_recorded_counters() {
        init().unwrap();
        // second call keeps the installed recorder
        init().unwrap();

        fetch::success();
        fetch::failed("status");

        let text = render().expect("recorder installed");
        assert!(text.contains("enricher_fetch_success_total"));
        assert!(text.contains("enricher_fetch_failed_total"));
        assert!(text.contains(r#"reason="status""#));
    }
}
