#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Registry stand-in serving scripted replies on `/company/:id`
pub struct MockRegistry {
    pub base_url: String,
    state: RegistryState,
}

pub struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl Reply {
    pub fn json(body: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            status: StatusCode::OK,
            headers,
            body: body.to_string(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    pub fn throttled(retry_after: Option<&str>) -> Self {
        let mut headers = HeaderMap::new();
        if let Some(value) = retry_after {
            headers.insert(RETRY_AFTER, HeaderValue::from_str(value).unwrap());
        }
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            headers,
            body: String::new(),
        }
    }

    pub fn error(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.to_string(),
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

#[derive(Clone)]
struct RecordedRequest {
    path: String,
    authorization: Option<String>,
}

#[derive(Clone, Default)]
struct RegistryState {
    replies: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

async fn company(
    State(state): State<RegistryState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Reply {
    state.requests.lock().unwrap().push(RecordedRequest {
        path: format!("/company/{id}"),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });
    state
        .replies
        .lock()
        .unwrap()
        .get_mut(&id)
        .and_then(VecDeque::pop_front)
        .unwrap_or_else(Reply::not_found)
}

impl MockRegistry {
    /// Start serving; `routes` maps a company number to its successive replies.
    /// Unscripted or exhausted ids get a 404.
    pub async fn start(routes: Vec<(&str, Vec<Reply>)>) -> Self {
        let state = RegistryState::default();
        state.replies.lock().unwrap().extend(
            routes
                .into_iter()
                .map(|(id, replies)| (id.to_string(), VecDeque::from(replies))),
        );

        let app = Router::new()
            .route("/company/:id", get(company))
            .with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock registry");
        let addr = listener.local_addr().expect("mock registry address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            base_url: format!("http://{addr}/company"),
            state,
        }
    }

    /// Request paths in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().iter().map(|r| r.path.clone()).collect()
    }

    /// `Authorization` header of each request, in arrival order
    pub fn authorizations(&self) -> Vec<Option<String>> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.authorization.clone())
            .collect()
    }
}
