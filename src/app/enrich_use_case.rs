use crate::app::ports::EventSinkPort;
use crate::domain::{Event, RawIdentifier};
use crate::pipeline::dedupe::dedupe_counted;
use crate::pipeline::fetch::{FetchOutcome, ResilientFetcher};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

/// Use case for enriching a batch of raw company identifiers with registry records
pub struct EnrichUseCase {
    fetcher: ResilientFetcher,
    events: Arc<dyn EventSinkPort>,
}

/// Payloads and run statistics of one enrichment run
#[derive(Debug, Clone, Serialize)]
pub struct Enrichment {
    pub records: Vec<Value>,
    pub report: EnrichmentReport,
}

/// Statistics for one enrichment run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichmentReport {
    pub raw_inputs: usize,
    pub invalid_inputs: usize,
    pub unique_ids: usize,
    pub successful: usize,
    pub not_found: usize,
    /// Error statuses, transport errors and unparseable payloads
    pub failed: usize,
    pub retries_exhausted: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl EnrichmentReport {
    fn new(raw_inputs: usize, invalid_inputs: usize, unique_ids: usize) -> Self {
        let now = Utc::now();
        Self {
            raw_inputs,
            invalid_inputs,
            unique_ids,
            successful: 0,
            not_found: 0,
            failed: 0,
            retries_exhausted: 0,
            started_at: now,
            finished_at: now,
        }
    }

    fn record(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Success(_) => self.successful += 1,
            FetchOutcome::NotFound => self.not_found += 1,
            FetchOutcome::RetriesExhausted => self.retries_exhausted += 1,
            FetchOutcome::RequestFailed { .. }
            | FetchOutcome::TransportFailed { .. }
            | FetchOutcome::MalformedPayload { .. } => self.failed += 1,
        }
    }

    /// Success rate over unique ids as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.unique_ids == 0 {
            return 0.0;
        }
        self.successful as f64 / self.unique_ids as f64 * 100.0
    }
}

impl EnrichUseCase {
    pub fn new(fetcher: ResilientFetcher, events: Arc<dyn EventSinkPort>) -> Self {
        Self { fetcher, events }
    }

    /// Enrich a batch and return only the retrieved records
    pub async fn enrich(&self, raw: &[RawIdentifier]) -> Vec<Value> {
        self.enrich_with_report(raw).await.records
    }

    /// Normalize and dedupe `raw`, then fetch every unique id in order.
    ///
    /// Per-identifier failures are reported through the event sink and never
    /// abort the run; `pipeline_finish` is always emitted.
    #[instrument(skip(self, raw), fields(raw_inputs = raw.len()))]
    pub async fn enrich_with_report(&self, raw: &[RawIdentifier]) -> Enrichment {
        let deduplicated = dedupe_counted(raw, self.events.as_ref());
        let mut report = EnrichmentReport::new(raw.len(), deduplicated.rejected, deduplicated.ids.len());

        self.events.emit(Event::PipelineStart {
            total_unique_ids: deduplicated.ids.len(),
        });

        let mut records = Vec::new();
        for company_id in &deduplicated.ids {
            self.events.emit(Event::RequestStart {
                company_id: company_id.clone(),
            });

            let outcome = self.fetcher.fetch(company_id).await;
            report.record(&outcome);

            if let Some(payload) = outcome.into_payload() {
                self.events.emit(Event::RequestSuccess {
                    company_id: company_id.clone(),
                });
                records.push(payload);
            }
        }

        self.events.emit(Event::PipelineFinish {
            successful: records.len(),
        });

        report.finished_at = Utc::now();
        crate::observability::metrics::pipeline::run_finished(
            report.invalid_inputs,
            report.unique_ids,
            report.successful,
        );
        info!(
            "Enrichment finished: {}/{} ids retrieved ({} not found, {} failed, {} exhausted)",
            report.successful, report.unique_ids, report.not_found, report.failed, report.retries_exhausted
        );

        Enrichment { records, report }
    }
}
