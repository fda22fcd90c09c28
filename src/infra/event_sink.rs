use crate::app::ports::EventSinkPort;
use crate::common::constants::EVENT_TARGET;
use crate::domain::Event;
use std::sync::Mutex;
use tracing::{info, warn};

/// Writes each event as a JSON line through `tracing`.
///
/// Failure-type events are logged at WARN, everything else at INFO.
pub struct TracingEventSink;

impl EventSinkPort for TracingEventSink {
    fn emit(&self, event: Event) {
        let line = event.to_json_line();
        match event {
            Event::InvalidId { .. }
            | Event::RequestFailed { .. }
            | Event::MaxRetriesExceeded { .. }
            | Event::TransportError { .. }
            | Event::MalformedPayload { .. } => {
                warn!(target: EVENT_TARGET, event_type = event.name(), "{}", line)
            }
            _ => info!(target: EVENT_TARGET, event_type = event.name(), "{}", line),
        }
    }
}

/// Keeps every emitted event in memory, in emission order
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(Event::name).collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events().iter().filter(|e| e.name() == name).count()
    }
}

impl EventSinkPort for RecordingEventSink {
    fn emit(&self, event: Event) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).push(event);
    }
}
