use std::sync::Arc;

use crate::{options, RawResponse};

/// Outcome of a single transport attempt.
///
/// Exactly one variant exists per attempt: either the transport produced a
/// response, or it failed before one was available.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// A response was received, whatever its status code.
    Response(RawResponse),
    /// The transport failed at the network level; no response exists.
    Transport(reqwest::Error),
}

impl AttemptOutcome {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Status code of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response(response) => Some(response.status),
            Self::Transport(_) => None,
        }
    }
}

/// Decides whether a completed attempt should be retried.
pub type RetryStrategy = Arc<dyn Fn(&AttemptOutcome) -> bool + Send + Sync>;

/// Computes the wait in milliseconds before the next attempt, given the
/// outcome and the currently configured delay.
pub type DelayStrategy = Arc<dyn Fn(&AttemptOutcome, u64) -> u64 + Send + Sync>;

/// Decides whether a terminal outcome is reported as a failure.
pub type ErrorStrategy = Arc<dyn Fn(&AttemptOutcome) -> bool + Send + Sync>;

/// Default retry strategy: transport failures and 5xx responses retry.
pub fn default_retry(outcome: &AttemptOutcome) -> bool {
    match outcome {
        AttemptOutcome::Transport(_) => true,
        AttemptOutcome::Response(response) => response.status >= 500,
    }
}

/// Default delay strategy.
///
/// After a transport failure with the delay still at its unmodified
/// process-wide default, the larger network-error delay is substituted so an
/// unreachable host is not hammered. Explicit caller-chosen delays pass
/// through untouched. The comparison is against the live default value, not
/// a frozen constant.
pub fn default_delay(outcome: &AttemptOutcome, delay_ms: u64) -> u64 {
    let defaults = options::defaults();
    if outcome.is_transport() && delay_ms == defaults.delay_ms {
        defaults.network_error_delay_ms
    } else {
        delay_ms
    }
}

/// Default error strategy: transport failures and statuses outside
/// `[200, 300)` are failures.
pub fn default_error(outcome: &AttemptOutcome) -> bool {
    match outcome {
        AttemptOutcome::Transport(_) => true,
        AttemptOutcome::Response(response) => response.status < 200 || response.status >= 300,
    }
}
