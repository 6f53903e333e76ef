use std::time::Duration;

use reqwest::Method;
use tokio::time::sleep;

use crate::{
    options::RetryOptions,
    request::{Body, Request, TransportRequest},
    response::{RawResponse, Reply, ResponseBody},
    strategy::AttemptOutcome,
    FetchError, Result, StatusError,
};

/// HTTP client that retries per the configured strategies.
///
/// Each verb method accepts either a bare URL string or a [`Request`]
/// descriptor and resolves to a [`Reply`], or fails with a
/// [`FetchError`].
#[derive(Clone, Debug, Default)]
pub struct FetchClient {
    http: reqwest::Client,
}

impl FetchClient {
    /// Creates a client with a fresh transport.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Creates a client over an existing transport, keeping its pool and
    /// TLS configuration.
    pub fn with_http(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub async fn get(&self, request: impl Into<Request>) -> Result<Reply> {
        self.fetch(Method::GET, request.into()).await
    }

    pub async fn post(&self, request: impl Into<Request>) -> Result<Reply> {
        self.fetch(Method::POST, request.into()).await
    }

    pub async fn put(&self, request: impl Into<Request>) -> Result<Reply> {
        self.fetch(Method::PUT, request.into()).await
    }

    pub async fn patch(&self, request: impl Into<Request>) -> Result<Reply> {
        self.fetch(Method::PATCH, request.into()).await
    }

    pub async fn delete(&self, request: impl Into<Request>) -> Result<Reply> {
        self.fetch(Method::DELETE, request.into()).await
    }

    pub async fn head(&self, request: impl Into<Request>) -> Result<Reply> {
        self.fetch(Method::HEAD, request.into()).await
    }

    /// Drives the attempt loop for one top-level call.
    ///
    /// The retry strategy is consulted before the budget: both must allow a
    /// retry, otherwise the outcome resolves without touching the delay
    /// strategy.
    async fn fetch(&self, method: Method, request: Request) -> Result<Reply> {
        let (request, options) = request.normalize(method);
        let mut remaining = options.retry;
        loop {
            let outcome = self.attempt(&request).await;
            if (options.retry_strategy)(&outcome) && remaining > 0 {
                remaining -= 1;
                let wait = (options.delay_strategy)(&outcome, options.delay_ms);

                #[cfg(feature = "tracing")]
                tracing::debug!(
                    "retrying {} {} after {} ms",
                    request.method,
                    request.url,
                    wait
                );

                sleep(Duration::from_millis(wait)).await;
                continue;
            }
            return resolve(outcome, &options);
        }
    }

    /// Invokes the transport once and captures the outcome.
    async fn attempt(&self, request: &TransportRequest) -> AttemptOutcome {
        let mut builder = self.http.request(request.method.clone(), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(credentials) = &request.auth {
            let (user, pass) = credentials
                .split_once(':')
                .unwrap_or((credentials.as_str(), ""));
            builder = builder.basic_auth(user, Some(pass));
        }
        match &request.data {
            Some(Body::Json(value)) => builder = builder.json(value),
            Some(Body::Text(text)) => builder = builder.body(text.clone()),
            None => {}
        }

        match builder.send().await {
            Ok(response) => {
                let status = response.status();
                let headers = response.headers().clone();
                match response.text().await {
                    Ok(body) => AttemptOutcome::Response(RawResponse {
                        status: status.as_u16(),
                        status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                        headers,
                        body,
                    }),
                    Err(err) => AttemptOutcome::Transport(err),
                }
            }
            Err(err) => AttemptOutcome::Transport(err),
        }
    }
}

/// Converts the terminal outcome into a value or an error.
fn resolve(outcome: AttemptOutcome, options: &RetryOptions) -> Result<Reply> {
    let failed = (options.error_strategy)(&outcome);
    match outcome {
        // No response exists to return, so a transport failure surfaces
        // regardless of what the error strategy says.
        AttemptOutcome::Transport(err) => Err(FetchError::Transport(err)),
        AttemptOutcome::Response(response) if failed => Err(FetchError::Status(
            StatusError::from_response(response, options.full_response),
        )),
        AttemptOutcome::Response(response) => {
            if options.full_response {
                Ok(Reply::Full(response))
            } else {
                Ok(Reply::Body(ResponseBody::parse(&response.body)))
            }
        }
    }
}

/// Issues a GET request with a throwaway client.
pub async fn get(request: impl Into<Request>) -> Result<Reply> {
    FetchClient::new().get(request).await
}

/// Issues a POST request with a throwaway client.
pub async fn post(request: impl Into<Request>) -> Result<Reply> {
    FetchClient::new().post(request).await
}

/// Issues a PUT request with a throwaway client.
pub async fn put(request: impl Into<Request>) -> Result<Reply> {
    FetchClient::new().put(request).await
}

/// Issues a PATCH request with a throwaway client.
pub async fn patch(request: impl Into<Request>) -> Result<Reply> {
    FetchClient::new().patch(request).await
}

/// Issues a DELETE request with a throwaway client.
pub async fn delete(request: impl Into<Request>) -> Result<Reply> {
    FetchClient::new().delete(request).await
}

/// Issues a HEAD request with a throwaway client.
pub async fn head(request: impl Into<Request>) -> Result<Reply> {
    FetchClient::new().head(request).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::header::HeaderMap;

    use super::resolve;
    use crate::{
        options::RetryOptions,
        strategy::{self, AttemptOutcome},
        FetchError, RawResponse, Reply, ResponseBody,
    };

    fn default_options() -> RetryOptions {
        RetryOptions {
            retry: 1,
            delay_ms: 100,
            full_response: false,
            retry_strategy: Arc::new(strategy::default_retry),
            delay_strategy: Arc::new(strategy::default_delay),
            error_strategy: Arc::new(strategy::default_error),
        }
    }

    fn response(status: u16, status_text: &str, body: &str) -> AttemptOutcome {
        AttemptOutcome::Response(RawResponse {
            status,
            status_text: status_text.to_owned(),
            headers: HeaderMap::new(),
            body: body.to_owned(),
        })
    }

    #[test]
    fn resolve_returns_raw_text_for_non_json_bodies() {
        let reply = resolve(response(200, "OK", "output"), &default_options())
            .expect("must resolve");
        assert_eq!(reply, Reply::Body(ResponseBody::Text("output".to_owned())));
    }

    #[test]
    fn resolve_parses_json_bodies() {
        let reply = resolve(response(200, "OK", r#"{"msg":"deleted"}"#), &default_options())
            .expect("must resolve");
        assert_eq!(reply.as_json(), Some(&serde_json::json!({"msg": "deleted"})));
    }

    #[test]
    fn resolve_full_response_returns_untouched_response() {
        let options = RetryOptions {
            full_response: true,
            ..default_options()
        };
        let reply = resolve(response(200, "OK", "output"), &options).expect("must resolve");
        let raw = reply.into_full().expect("must carry full response");
        assert_eq!(raw.status, 200);
        assert_eq!(raw.body, "output");
    }

    #[test]
    fn resolve_wraps_failing_status_into_structured_error() {
        let err = resolve(
            response(500, "Internal Server Error", "Some Error"),
            &default_options(),
        )
        .expect_err("must fail");
        match err {
            FetchError::Status(status) => {
                assert_eq!(status.status, 500);
                assert_eq!(status.to_string(), "500 - Some Error");
            }
            FetchError::Transport(_) => panic!("expected status error"),
        }
    }

    #[test]
    fn resolve_honors_custom_error_strategy() {
        let options = RetryOptions {
            full_response: true,
            error_strategy: Arc::new(|_: &AttemptOutcome| false),
            ..default_options()
        };
        let reply = resolve(response(401, "Unauthorized", "output"), &options)
            .expect("must resolve despite 401");
        assert_eq!(reply.as_full().map(|raw| raw.status), Some(401));
    }
}
