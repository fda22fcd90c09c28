use crate::common::constants::COMPANY_ID_WIDTH;
use crate::common::error::{EnricherError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// ASCII only: `\d` would also accept non-Latin decimal digits
static COMPANY_ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{8}$").unwrap());

/// A candidate identifier exactly as supplied by the caller.
///
/// Input lists come from JSON, so entries may be missing (`null`), strings,
/// or anything else a hand-edited file can contain. Only `Text` can ever
/// normalize to a [`CanonicalId`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum RawIdentifier {
    Absent,
    Text(String),
    Other(Value),
}

impl From<Value> for RawIdentifier {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawIdentifier::Absent,
            Value::String(s) => RawIdentifier::Text(s),
            other => RawIdentifier::Other(other),
        }
    }
}

impl From<&str> for RawIdentifier {
    fn from(value: &str) -> Self {
        RawIdentifier::Text(value.to_string())
    }
}

impl From<String> for RawIdentifier {
    fn from(value: String) -> Self {
        RawIdentifier::Text(value)
    }
}

impl<T: Into<RawIdentifier>> From<Option<T>> for RawIdentifier {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawIdentifier::Absent)
    }
}

/// Rendering used for the `invalid_id` event's `raw_value`
impl fmt::Display for RawIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawIdentifier::Absent => write!(f, "None"),
            RawIdentifier::Text(s) => write!(f, "{s}"),
            RawIdentifier::Other(v) => write!(f, "{v}"),
        }
    }
}

/// Parse a JSON array of raw identifiers, e.g. `["00445790", null, 2065]`
pub fn parse_raw_list(json: &str) -> Result<Vec<RawIdentifier>> {
    Ok(serde_json::from_str(json)?)
}

/// A company number in canonical form: exactly eight ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    /// Canonicalize a raw candidate.
    ///
    /// Surrounding whitespace is trimmed and purely numeric values are
    /// zero-padded on the left to eight digits. Padding never truncates, so
    /// overlong numbers fail the final format check along with everything
    /// else that is not exactly eight digits.
    pub fn normalize(raw: &RawIdentifier) -> Option<Self> {
        match raw {
            RawIdentifier::Text(s) => Self::from_text(s),
            RawIdentifier::Absent | RawIdentifier::Other(_) => None,
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        Self::from_text(value).ok_or_else(|| EnricherError::InvalidIdentifier(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_text(value: &str) -> Option<Self> {
        let cleaned = value.trim();
        let candidate = if !cleaned.is_empty() && cleaned.bytes().all(|b| b.is_ascii_digit()) {
            format!("{:0>width$}", cleaned, width = COMPANY_ID_WIDTH)
        } else {
            cleaned.to_string()
        };

        COMPANY_ID_PATTERN
            .is_match(&candidate)
            .then_some(CanonicalId(candidate))
    }
}

impl FromStr for CanonicalId {
    type Err = EnricherError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Free-function form of [`CanonicalId::normalize`]
pub fn normalize(raw: &RawIdentifier) -> Option<CanonicalId> {
    CanonicalId::normalize(raw)
}
