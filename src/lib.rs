//! `fetch-retry` is an async HTTP request wrapper with pluggable retry,
//! delay, and error strategies.
//!
//! Every HTTP verb has one call, each accepting a bare URL or a [`Request`]
//! descriptor:
//! - [`FetchClient::get`] / [`get`]
//! - [`FetchClient::post`] / [`post`]
//! - [`FetchClient::put`] / [`put`]
//! - [`FetchClient::patch`] / [`patch`]
//! - [`FetchClient::delete`] / [`delete`]
//! - [`FetchClient::head`] / [`head`]
//!
//! A call resolves to the parsed response body (or the full response when
//! the full-response flag is set) and fails with a [`StatusError`] for
//! non-success responses, or the original transport error for network-level
//! failures. Retry budget, delay, and the three strategies can be
//! overridden per call on [`Request`] or process-wide via
//! [`update_defaults`].

mod client;
mod error;
mod options;
mod request;
mod response;
mod strategy;

pub use client::{delete, get, head, patch, post, put, FetchClient};
pub use error::{FetchError, StatusError};
pub use options::{defaults, set_defaults, update_defaults, Defaults, RetryOptions};
pub use request::{BasicAuth, Body, Request, TransportRequest};
pub use response::{RawResponse, Reply, ResponseBody};
pub use strategy::{
    default_delay, default_error, default_retry, AttemptOutcome, DelayStrategy, ErrorStrategy,
    RetryStrategy,
};

pub type Result<T> = std::result::Result<T, FetchError>;
