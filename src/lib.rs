//! Batch enrichment of company numbers against the Companies House registry

pub mod app;
pub mod common;
pub mod config;
pub mod domain;
pub mod infra;
pub mod observability;
pub mod pipeline;

#[cfg(test)]
mod test_support;

pub use app::enrich_use_case::{EnrichUseCase, Enrichment, EnrichmentReport};
pub use common::error::{EnricherError, Result};
pub use domain::{CanonicalId, Event, RawIdentifier};
pub use pipeline::{FetchOutcome, ResilientFetcher, RetryPolicy};
