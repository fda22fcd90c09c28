// Domain data shapes shared across layers

pub mod events;
pub mod identifiers;

pub use events::Event;
pub use identifiers::{normalize, CanonicalId, RawIdentifier};
