use crate::app::ports::{EventSinkPort, HttpClientPort, HttpGetResult, SleepPort};
use crate::domain::{CanonicalId, Event};
use crate::observability::metrics;
use crate::pipeline::retry::RetryPolicy;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument};

/// Terminal result of fetching one identifier
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(Value),
    NotFound,
    RequestFailed { status: u16, body: String },
    RetriesExhausted,
    TransportFailed { message: String },
    MalformedPayload { message: String },
}

impl FetchOutcome {
    pub fn into_payload(self) -> Option<Value> {
        match self {
            FetchOutcome::Success(payload) => Some(payload),
            _ => None,
        }
    }
}

/// How a single response moves the retry loop
#[derive(Debug, PartialEq)]
enum Attempt {
    Finished(FetchOutcome),
    RateLimited { retry_after: Option<String> },
}

/// Looks up one company at a time, retrying only throttled responses.
///
/// 404 and other error statuses are terminal on the first response. A 429
/// waits for the server's `Retry-After` (or `base^attempt` seconds) and tries
/// again until the policy's attempt budget is spent. Transport errors are
/// terminal too. Every non-success outcome is reported to the event sink
/// here, so callers only need to handle the payload.
pub struct ResilientFetcher {
    http: Arc<dyn HttpClientPort>,
    sleeper: Arc<dyn SleepPort>,
    events: Arc<dyn EventSinkPort>,
    base_url: String,
    policy: RetryPolicy,
}

impl ResilientFetcher {
    pub fn new(
        http: Arc<dyn HttpClientPort>,
        sleeper: Arc<dyn SleepPort>,
        events: Arc<dyn EventSinkPort>,
        base_url: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            http,
            sleeper,
            events,
            base_url: base_url.into(),
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn url_for(&self, id: &CanonicalId) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), id)
    }

    #[instrument(skip(self, id), fields(company_id = %id))]
    pub async fn fetch(&self, id: &CanonicalId) -> FetchOutcome {
        let url = self.url_for(id);

        for attempt in 0..self.policy.max_attempts {
            let started = Instant::now();
            let response = match self.http.get(&url).await {
                Ok(response) => response,
                Err(error) => {
                    metrics::fetch::failed("transport");
                    self.events.emit(Event::TransportError {
                        company_id: id.clone(),
                        error: error.clone(),
                    });
                    return FetchOutcome::TransportFailed { message: error };
                }
            };
            metrics::fetch::request_duration(started.elapsed().as_secs_f64());
            debug!("Attempt {} returned status {}", attempt + 1, response.status);

            match self.evaluate(id, response) {
                Attempt::Finished(outcome) => return outcome,
                Attempt::RateLimited { retry_after } => {
                    let delay = self.policy.backoff_for(attempt, retry_after.as_deref());
                    metrics::fetch::rate_limited();
                    self.events.emit(Event::RateLimited {
                        company_id: id.clone(),
                        attempt: attempt + 1,
                        backoff_seconds: delay.as_secs(),
                    });
                    self.sleeper.sleep(delay).await;
                }
            }
        }

        metrics::fetch::retries_exhausted();
        self.events.emit(Event::MaxRetriesExceeded {
            company_id: id.clone(),
        });
        FetchOutcome::RetriesExhausted
    }

    fn evaluate(&self, id: &CanonicalId, response: HttpGetResult) -> Attempt {
        match response.status {
            200 => match serde_json::from_slice::<Value>(&response.bytes) {
                Ok(payload) => {
                    metrics::fetch::success();
                    Attempt::Finished(FetchOutcome::Success(payload))
                }
                Err(e) => {
                    metrics::fetch::failed("payload");
                    self.events.emit(Event::MalformedPayload {
                        company_id: id.clone(),
                        error: e.to_string(),
                    });
                    Attempt::Finished(FetchOutcome::MalformedPayload { message: e.to_string() })
                }
            },
            404 => {
                metrics::fetch::not_found();
                self.events.emit(Event::CompanyNotFound {
                    company_id: id.clone(),
                });
                Attempt::Finished(FetchOutcome::NotFound)
            }
            429 => Attempt::RateLimited {
                retry_after: response.retry_after,
            },
            status => {
                let body = response.text();
                metrics::fetch::failed("status");
                self.events.emit(Event::RequestFailed {
                    company_id: id.clone(),
                    status_code: status,
                    response_text: body.clone(),
                });
                Attempt::Finished(FetchOutcome::RequestFailed { status, body })
            }
        }
    }
}
