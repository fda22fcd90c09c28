/// Companies House company profile endpoint; the canonical id is appended as the last path segment
pub const API_BASE_URL: &str = "https://api.company-information.service.gov.uk/company";

/// Attempts per identifier, including the first request
pub const MAX_RETRIES: u32 = 5;

/// Base of the exponential backoff used when a 429 carries no Retry-After
pub const BASE_BACKOFF: u64 = 2;

pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Width of a canonical company number
pub const COMPANY_ID_WIDTH: usize = 8;

// Environment variables read by the CLI and config loader
pub const API_KEY_ENV: &str = "COMPANIES_HOUSE_API_KEY";
pub const BASE_URL_ENV: &str = "COMPANY_ENRICHER_BASE_URL";
pub const MAX_RETRIES_ENV: &str = "COMPANY_ENRICHER_MAX_RETRIES";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// tracing target for structured pipeline events
pub const EVENT_TARGET: &str = "company_enricher::events";
