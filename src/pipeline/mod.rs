// Enrichment stages: dedupe the raw batch, then fetch each id with retries

pub mod dedupe;
pub mod fetch;
pub mod retry;

pub use dedupe::{dedupe, UniqueIdentifierSet};
pub use fetch::{FetchOutcome, ResilientFetcher};
pub use retry::RetryPolicy;
