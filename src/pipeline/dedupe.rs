use crate::app::ports::EventSinkPort;
use crate::domain::{normalize, CanonicalId, Event, RawIdentifier};
use std::collections::BTreeSet;

/// Unique canonical identifiers, iterated in ascending order
pub type UniqueIdentifierSet = BTreeSet<CanonicalId>;

/// Result of deduplicating one batch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Deduplicated {
    pub ids: UniqueIdentifierSet,
    /// Entries that failed normalization
    pub rejected: usize,
}

/// Normalize a batch, reporting each invalid entry as `invalid_id`.
///
/// Duplicates collapse silently into the set.
pub fn dedupe(raw: &[RawIdentifier], events: &dyn EventSinkPort) -> UniqueIdentifierSet {
    dedupe_counted(raw, events).ids
}

pub fn dedupe_counted(raw: &[RawIdentifier], events: &dyn EventSinkPort) -> Deduplicated {
    let mut result = Deduplicated::default();

    for raw_id in raw {
        match normalize(raw_id) {
            Some(id) => {
                result.ids.insert(id);
            }
            None => {
                events.emit(Event::InvalidId {
                    raw_value: raw_id.to_string(),
                });
                result.rejected += 1;
            }
        }
    }

    result
}
