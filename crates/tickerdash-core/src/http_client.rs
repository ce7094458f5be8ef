use std::collections::{BTreeMap, VecDeque};
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

/// HTTP methods used by the dashboard endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// HTTP request envelope handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    /// `None` waits for the server indefinitely.
    pub timeout_ms: Option<u64>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            timeout_ms: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// POST with a JSON body and JSON content negotiation headers.
    pub fn post_json(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json")
            .with_body(body)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// HTTP response envelope returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Transport contract for the dashboard API.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// Production HTTP client backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::Client::builder()
                    .user_agent(concat!("tickerdash/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new()),
            ),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(&request.url),
                HttpMethod::Post => self.client.post(&request.url),
            };

            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            if let Some(timeout_ms) = request.timeout_ms {
                builder = builder.timeout(std::time::Duration::from_millis(timeout_ms));
            }

            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::new(format!("request timeout: {e}"))
                } else if e.is_connect() {
                    HttpError::new(format!("connection failed: {e}"))
                } else {
                    HttpError::new(format!("request failed: {e}"))
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| HttpError::new(format!("failed to read response body: {e}")))?;

            Ok(HttpResponse { status, body })
        })
    }
}

/// In-memory transport replaying canned responses per `METHOD path` route.
///
/// Requests are recorded in arrival order. A route with no queued response
/// answers 404 with an empty JSON object.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    routes: Mutex<BTreeMap<String, VecDeque<Result<HttpResponse, HttpError>>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method` on any URL ending in `path`.
    pub fn respond(self, method: HttpMethod, path: &str, response: HttpResponse) -> Self {
        self.push(method, path, Ok(response));
        self
    }

    /// Queue a transport failure for `method` on any URL ending in `path`.
    pub fn fail(self, method: HttpMethod, path: &str, error: HttpError) -> Self {
        self.push(method, path, Err(error));
        self
    }

    pub fn recorded_requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, method: HttpMethod, path: &str, outcome: Result<HttpResponse, HttpError>) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(route_key(method, path))
            .or_default()
            .push_back(outcome);
    }

    fn next_outcome(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let key = routes
            .keys()
            .find(|key| {
                key.split_once(' ').is_some_and(|(method, path)| {
                    method == request.method.as_str() && request.url.ends_with(path)
                })
            })
            .cloned();

        key.and_then(|key| routes.get_mut(&key).and_then(VecDeque::pop_front))
            .unwrap_or_else(|| Ok(HttpResponse::new(404, "{}")))
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let outcome = self.next_outcome(&request);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        Box::pin(async move { outcome })
    }
}

fn route_key(method: HttpMethod, path: &str) -> String {
    format!("{} {path}", method.as_str())
}
