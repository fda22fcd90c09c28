use crate::domain::Event;
use async_trait::async_trait;
use std::time::Duration;

/// Credentialed HTTP GET against the registry service.
///
/// Implementations own the credential; callers only supply the URL. An `Err`
/// means the request never produced an HTTP response (DNS, connect, timeout,
/// body read).
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult, String>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    /// Raw `Retry-After` header value, if the server sent one
    pub retry_after: Option<String>,
}

impl HttpGetResult {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Suspends the current fetch for a backoff delay
#[async_trait]
pub trait SleepPort: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sink for structured pipeline events
pub trait EventSinkPort: Send + Sync {
    fn emit(&self, event: Event);
}
