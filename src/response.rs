use std::fmt;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Response snapshot captured from one transport attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Canonical status text, e.g. `Internal Server Error`.
    pub status_text: String,
    /// Response headers as received.
    pub headers: HeaderMap,
    /// Raw response body text.
    pub body: String,
}

/// Response body after best-effort parsing.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    /// Body that parsed as JSON.
    Json(Value),
    /// Body kept as raw text.
    Text(String),
}

impl ResponseBody {
    /// Parses the text as JSON when valid, otherwise keeps it unchanged.
    ///
    /// Total: never fails, the fallback is the raw text.
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text.to_owned()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Json(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    /// Deserializes a JSON body into a typed value.
    pub fn json_as<T: DeserializeOwned>(&self) -> Option<T> {
        match self {
            Self::Json(value) => serde_json::from_value(value.clone()).ok(),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Value a resolved call produces.
///
/// [`Reply::Body`] carries the parsed body (the default mode);
/// [`Reply::Full`] carries the untouched response when the full-response
/// flag was set on the request.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Body(ResponseBody),
    Full(RawResponse),
}

impl Reply {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Body(body) => body.as_json(),
            Self::Full(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Body(body) => body.as_text(),
            Self::Full(_) => None,
        }
    }

    pub fn as_full(&self) -> Option<&RawResponse> {
        match self {
            Self::Body(_) => None,
            Self::Full(response) => Some(response),
        }
    }

    pub fn into_full(self) -> Option<RawResponse> {
        match self {
            Self::Body(_) => None,
            Self::Full(response) => Some(response),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use crate::ResponseBody;

    #[test]
    fn parse_keeps_json_structure() {
        let body = ResponseBody::parse(r#"{"msg":"deleted"}"#);
        assert_eq!(body, ResponseBody::Json(json!({"msg": "deleted"})));
    }

    #[test]
    fn parse_falls_back_to_raw_text() {
        let body = ResponseBody::parse("output");
        assert_eq!(body, ResponseBody::Text("output".to_owned()));
    }

    #[test]
    fn parse_accepts_bare_json_scalars() {
        assert_eq!(ResponseBody::parse("123"), ResponseBody::Json(json!(123)));
        assert_eq!(
            ResponseBody::parse(""),
            ResponseBody::Text(String::new())
        );
    }

    #[test]
    fn parse_roundtrips_serialized_objects() {
        let original = json!({"user": "bob", "age": 23});
        let body = ResponseBody::parse(&original.to_string());
        assert_eq!(body.as_json(), Some(&original));
    }

    #[test]
    fn display_uses_raw_text() {
        assert_eq!(ResponseBody::parse("Some Error").to_string(), "Some Error");
        assert_eq!(
            ResponseBody::parse(r#"{"msg":"boom"}"#).to_string(),
            r#"{"msg":"boom"}"#
        );
    }

    #[test]
    fn json_as_decodes_typed_values() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Message {
            msg: String,
        }

        let body = ResponseBody::parse(r#"{"msg":"patched"}"#);
        assert_eq!(
            body.json_as::<Message>(),
            Some(Message {
                msg: "patched".to_owned()
            })
        );
        assert_eq!(ResponseBody::parse("plain").json_as::<Message>(), None);
    }
}
