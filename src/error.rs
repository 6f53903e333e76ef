use crate::response::{RawResponse, ResponseBody};

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network or request execution error from `reqwest`.
    ///
    /// Surfaced as-is: no status code or body exists to report.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Response classified as a failure by the error strategy.
    #[error(transparent)]
    Status(#[from] StatusError),
}

impl FetchError {
    /// Status code of the failing response, absent for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(_) => None,
            Self::Status(error) => Some(error.status),
        }
    }
}

/// Structured failure built from a non-success response.
#[derive(Debug, thiserror::Error)]
#[error("{status} - {body}")]
pub struct StatusError {
    /// HTTP status code of the failing response.
    pub status: u16,
    /// Canonical status text, e.g. `Internal Server Error`.
    pub status_text: String,
    /// Best-effort-parsed response body.
    pub body: ResponseBody,
    /// Untouched response, kept when the full-response flag is set.
    pub response: Option<RawResponse>,
}

impl StatusError {
    /// Builds the structured error from a terminal response.
    ///
    /// Deterministic: the same response always yields the same error.
    pub fn from_response(response: RawResponse, full_response: bool) -> Self {
        Self {
            status: response.status,
            status_text: response.status_text.clone(),
            body: ResponseBody::parse(&response.body),
            response: full_response.then_some(response),
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderMap;
    use serde_json::json;

    use crate::{RawResponse, ResponseBody, StatusError};

    fn server_error() -> RawResponse {
        RawResponse {
            status: 500,
            status_text: "Internal Server Error".to_owned(),
            headers: HeaderMap::new(),
            body: "Some Error".to_owned(),
        }
    }

    #[test]
    fn message_is_status_and_body() {
        let error = StatusError::from_response(server_error(), false);
        assert_eq!(error.to_string(), "500 - Some Error");
        assert_eq!(error.status, 500);
        assert_eq!(error.status_text, "Internal Server Error");
        assert_eq!(error.body, ResponseBody::Text("Some Error".to_owned()));
        assert!(error.response.is_none());
    }

    #[test]
    fn json_bodies_are_parsed() {
        let response = RawResponse {
            status: 400,
            status_text: "Bad Request".to_owned(),
            headers: HeaderMap::new(),
            body: r#"{"reason":"missing field"}"#.to_owned(),
        };
        let error = StatusError::from_response(response, false);
        assert_eq!(
            error.body,
            ResponseBody::Json(json!({"reason": "missing field"}))
        );
    }

    #[test]
    fn full_response_keeps_raw_response() {
        let error = StatusError::from_response(server_error(), true);
        let raw = error.response.expect("must keep raw response");
        assert_eq!(raw.status, 500);
        assert_eq!(raw.body, "Some Error");
    }

    #[test]
    fn construction_is_idempotent() {
        let first = StatusError::from_response(server_error(), true);
        let second = StatusError::from_response(server_error(), true);
        assert_eq!(first.status, second.status);
        assert_eq!(first.status_text, second.status_text);
        assert_eq!(first.body, second.body);
        assert_eq!(first.response, second.response);
    }
}
