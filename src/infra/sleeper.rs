use crate::app::ports::SleepPort;
use async_trait::async_trait;
use std::time::Duration;

/// Backoff waits on the tokio timer
pub struct TokioSleeper;

#[async_trait]
impl SleepPort for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
