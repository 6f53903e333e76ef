use std::fmt;
use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::{
    options::{self, RetryOptions},
    strategy::{AttemptOutcome, DelayStrategy, ErrorStrategy, RetryStrategy},
};

/// Request body payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    /// JSON payload, sent with `Content-Type: application/json`.
    Json(Value),
    /// Plain text payload, sent as-is.
    Text(String),
}

impl Body {
    /// Builds a JSON body from any serializable value.
    pub fn json<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(Self::Json)
    }

    /// Builds a plain text body.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Basic-auth credentials folded into the transport credential slot.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub user: String,
    pub pass: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

/// Caller-facing request descriptor with per-call policy overrides.
///
/// Converts from a bare URL string, which means no overrides at all:
///
/// ```no_run
/// use fetch_retry::FetchClient;
///
/// # async fn run() -> fetch_retry::Result<()> {
/// let client = FetchClient::new();
/// let reply = client.get("https://example.com/api/users").await?;
/// # Ok(())
/// # }
/// ```
///
/// The HTTP method is supplied by the verb call, not the descriptor.
#[derive(Clone, Default)]
pub struct Request {
    /// Target URL.
    pub url: String,
    /// Header name/value pairs, applied in order.
    pub headers: Vec<(String, String)>,
    /// Query parameters, serialized onto the URL in insertion order.
    pub query: Vec<(String, String)>,
    /// Basic-auth credentials.
    pub auth: Option<BasicAuth>,
    /// Request body.
    pub body: Option<Body>,
    /// Retry budget override.
    pub retry: Option<u32>,
    /// Delay override in milliseconds.
    pub delay_ms: Option<u64>,
    /// Resolve and reject with the full raw response.
    pub full_response: bool,
    /// Retry strategy override.
    pub retry_strategy: Option<RetryStrategy>,
    /// Delay strategy override.
    pub delay_strategy: Option<DelayStrategy>,
    /// Error strategy override.
    pub error_strategy: Option<ErrorStrategy>,
}

impl Request {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a query parameter; values are stringified verbatim.
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn basic_auth(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.auth = Some(BasicAuth {
            user: user.into(),
            pass: pass.into(),
        });
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Overrides the retry budget for this call.
    pub fn retry(mut self, retry: u32) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Overrides the delay between attempts for this call.
    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    /// Resolve and reject with the full raw response instead of the body.
    pub fn full_response(mut self, full_response: bool) -> Self {
        self.full_response = full_response;
        self
    }

    /// Overrides the retry strategy for this call.
    pub fn retry_strategy<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&AttemptOutcome) -> bool + Send + Sync + 'static,
    {
        self.retry_strategy = Some(Arc::new(strategy));
        self
    }

    /// Overrides the delay strategy for this call.
    pub fn delay_strategy<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&AttemptOutcome, u64) -> u64 + Send + Sync + 'static,
    {
        self.delay_strategy = Some(Arc::new(strategy));
        self
    }

    /// Overrides the error strategy for this call.
    pub fn error_strategy<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&AttemptOutcome) -> bool + Send + Sync + 'static,
    {
        self.error_strategy = Some(Arc::new(strategy));
        self
    }

    /// Splits the descriptor into a transport-ready request and the
    /// resolved policy bundle.
    ///
    /// Applied exactly once per call: query parameters are appended to the
    /// URL as `key=value` pairs joined with `&` (plain interpolation, no
    /// URL-encoding), credentials are folded into a colon-joined
    /// `user:pass` string, and every policy field is stripped so the
    /// remainder can be handed to the transport untouched.
    pub fn normalize(self, method: Method) -> (TransportRequest, RetryOptions) {
        let defaults = options::defaults();
        let options = RetryOptions {
            retry: self.retry.unwrap_or(defaults.retry),
            delay_ms: self.delay_ms.unwrap_or(defaults.delay_ms),
            full_response: self.full_response,
            retry_strategy: self.retry_strategy.unwrap_or(defaults.retry_strategy),
            delay_strategy: self.delay_strategy.unwrap_or(defaults.delay_strategy),
            error_strategy: self.error_strategy.unwrap_or(defaults.error_strategy),
        };

        let mut url = self.url;
        if !self.query.is_empty() {
            let pairs: Vec<String> = self
                .query
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            url.push('?');
            url.push_str(&pairs.join("&"));
        }

        let auth = self
            .auth
            .map(|credentials| format!("{}:{}", credentials.user, credentials.pass));

        let transport = TransportRequest {
            method,
            url,
            headers: self.headers,
            auth,
            data: self.body,
        };
        (transport, options)
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("auth", &self.auth)
            .field("body", &self.body)
            .field("retry", &self.retry)
            .field("delay_ms", &self.delay_ms)
            .field("full_response", &self.full_response)
            .finish_non_exhaustive()
    }
}

impl From<&str> for Request {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for Request {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}

/// Transport-ready request with every policy field stripped.
///
/// This is the exact shape handed to the HTTP transport: method, URL,
/// headers, an optional colon-joined `user:pass` credential, and an
/// optional data payload.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub auth: Option<String>,
    pub data: Option<Body>,
}
