//! Scripted ports for unit tests

use crate::app::ports::{HttpClientPort, HttpGetResult, SleepPort};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tracing_subscriber::fmt::MakeWriter;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replays canned responses per company id (the last URL path segment)
#[derive(Default)]
pub struct ScriptedHttp {
    scripts: Mutex<HashMap<String, VecDeque<Result<HttpGetResult, String>>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, id: &str, responses: Vec<Result<HttpGetResult, String>>) -> Self {
        self.scripts.lock().unwrap().insert(id.to_string(), responses.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClientPort for ScriptedHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult, String> {
        self.requests.lock().unwrap().push(url.to_string());
        let id = url.rsplit('/').next().unwrap_or_default();
        self.scripts
            .lock()
            .unwrap()
            .get_mut(id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(format!("no scripted response for {id}")))
    }
}

pub fn respond(status: u16, body: &str) -> Result<HttpGetResult, String> {
    Ok(HttpGetResult {
        status,
        bytes: body.as_bytes().to_vec(),
        retry_after: None,
    })
}

pub fn throttled(retry_after: Option<&str>) -> Result<HttpGetResult, String> {
    Ok(HttpGetResult {
        status: 429,
        bytes: Vec::new(),
        retry_after: retry_after.map(str::to_string),
    })
}

/// Records requested delays instead of waiting
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl SleepPort for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// In-memory log sink for a scoped `tracing_subscriber::fmt` subscriber
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
