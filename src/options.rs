use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::strategy::{self, DelayStrategy, ErrorStrategy, RetryStrategy};

/// Process-wide fallback policy values.
///
/// Every call reads these at entry for any field it does not override. They
/// are plain shared configuration behind a lock: mutating them while calls
/// are in flight races on which values apply to attempts issued after the
/// mutation, and that race is the caller's to manage. Per-call overrides on
/// [`crate::Request`] never touch this state.
#[derive(Clone)]
pub struct Defaults {
    /// Additional attempts permitted after a failed attempt.
    pub retry: u32,
    /// Wait between attempts in milliseconds.
    pub delay_ms: u64,
    /// Wait substituted after a network-level failure when the delay is
    /// still at its unmodified default.
    pub network_error_delay_ms: u64,
    /// Fallback retry strategy.
    pub retry_strategy: RetryStrategy,
    /// Fallback delay strategy.
    pub delay_strategy: DelayStrategy,
    /// Fallback error strategy.
    pub error_strategy: ErrorStrategy,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            retry: 1,
            delay_ms: 100,
            network_error_delay_ms: 1_000,
            retry_strategy: Arc::new(strategy::default_retry),
            delay_strategy: Arc::new(strategy::default_delay),
            error_strategy: Arc::new(strategy::default_error),
        }
    }
}

impl fmt::Debug for Defaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Defaults")
            .field("retry", &self.retry)
            .field("delay_ms", &self.delay_ms)
            .field("network_error_delay_ms", &self.network_error_delay_ms)
            .finish_non_exhaustive()
    }
}

fn store() -> &'static RwLock<Defaults> {
    static STORE: OnceLock<RwLock<Defaults>> = OnceLock::new();
    STORE.get_or_init(|| RwLock::new(Defaults::default()))
}

/// Snapshot of the current process-wide defaults.
pub fn defaults() -> Defaults {
    store()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replaces the process-wide defaults, affecting subsequently issued calls.
pub fn set_defaults(defaults: Defaults) {
    *store().write().unwrap_or_else(PoisonError::into_inner) = defaults;
}

/// Mutates the process-wide defaults in place.
///
/// ```
/// fetch_retry::update_defaults(|defaults| defaults.retry = 2);
/// # fetch_retry::set_defaults(fetch_retry::Defaults::default());
/// ```
pub fn update_defaults(apply: impl FnOnce(&mut Defaults)) {
    apply(&mut store().write().unwrap_or_else(PoisonError::into_inner));
}

/// Policy bundle resolved once per top-level call.
///
/// Built by [`crate::Request::normalize`] from per-call overrides falling
/// back to [`defaults`], then carried by value through every attempt of
/// that call.
#[derive(Clone)]
pub struct RetryOptions {
    /// Remaining retry budget at call entry.
    pub retry: u32,
    /// Configured wait between attempts in milliseconds.
    pub delay_ms: u64,
    /// Resolve and reject with the full raw response.
    pub full_response: bool,
    /// Resolved retry strategy.
    pub retry_strategy: RetryStrategy,
    /// Resolved delay strategy.
    pub delay_strategy: DelayStrategy,
    /// Resolved error strategy.
    pub error_strategy: ErrorStrategy,
}

#[cfg(test)]
pub(crate) fn test_defaults_guard() -> std::sync::MutexGuard<'static, ()> {
    static GUARD: std::sync::Mutex<()> = std::sync::Mutex::new(());
    GUARD.lock().unwrap_or_else(PoisonError::into_inner)
}
