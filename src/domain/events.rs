use crate::domain::identifiers::CanonicalId;
use serde::Serialize;

/// Structured lifecycle events emitted by the pipeline.
///
/// Each variant serializes as a flat JSON object whose `event` key is the
/// snake_case variant name, followed by the variant's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    InvalidId {
        raw_value: String,
    },
    CompanyNotFound {
        company_id: CanonicalId,
    },
    RateLimited {
        company_id: CanonicalId,
        /// 1-based number of the attempt that was throttled
        attempt: u32,
        backoff_seconds: u64,
    },
    RequestFailed {
        company_id: CanonicalId,
        status_code: u16,
        response_text: String,
    },
    MaxRetriesExceeded {
        company_id: CanonicalId,
    },
    TransportError {
        company_id: CanonicalId,
        error: String,
    },
    MalformedPayload {
        company_id: CanonicalId,
        error: String,
    },
    PipelineStart {
        total_unique_ids: usize,
    },
    RequestStart {
        company_id: CanonicalId,
    },
    RequestSuccess {
        company_id: CanonicalId,
    },
    PipelineFinish {
        successful: usize,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::InvalidId { .. } => "invalid_id",
            Event::CompanyNotFound { .. } => "company_not_found",
            Event::RateLimited { .. } => "rate_limited",
            Event::RequestFailed { .. } => "request_failed",
            Event::MaxRetriesExceeded { .. } => "max_retries_exceeded",
            Event::TransportError { .. } => "transport_error",
            Event::MalformedPayload { .. } => "malformed_payload",
            Event::PipelineStart { .. } => "pipeline_start",
            Event::RequestStart { .. } => "request_start",
            Event::RequestSuccess { .. } => "request_success",
            Event::PipelineFinish { .. } => "pipeline_finish",
        }
    }

    pub fn company_id(&self) -> Option<&CanonicalId> {
        match self {
            Event::CompanyNotFound { company_id }
            | Event::RateLimited { company_id, .. }
            | Event::RequestFailed { company_id, .. }
            | Event::MaxRetriesExceeded { company_id }
            | Event::TransportError { company_id, .. }
            | Event::MalformedPayload { company_id, .. }
            | Event::RequestStart { company_id }
            | Event::RequestSuccess { company_id } => Some(company_id),
            Event::InvalidId { .. } | Event::PipelineStart { .. } | Event::PipelineFinish { .. } => None,
        }
    }

    /// Single-line JSON rendering, `{"event": "...", ...fields}`
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!(r#"{{"event":"{}"}}"#, self.name()))
    }
}
