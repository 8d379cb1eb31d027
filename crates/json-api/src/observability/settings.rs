//! Request tracing policy, fixed once at startup.

use std::{sync::OnceLock, time::Duration};

use crate::config::observability::ObservabilityConfig;

static POLICY: OnceLock<RequestPolicy> = OnceLock::new();

/// How the request middleware traces and flags requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RequestPolicy {
    /// Requests slower than this are logged at `warn`.
    pub(super) slow_request: Duration,

    /// Adopt a caller's `traceparent` as the span parent.
    pub(super) adopt_remote_parent: bool,
}

impl RequestPolicy {
    fn from_config(config: &ObservabilityConfig) -> Self {
        Self {
            slow_request: Duration::from_millis(config.slow_request_threshold_ms),
            // A remote parent is pointless when nothing is exported.
            adopt_remote_parent: config.otel_enabled && config.otel_parent_propagation_enabled,
        }
    }
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            slow_request: Duration::from_secs(1),
            adopt_remote_parent: false,
        }
    }
}

/// Fixes the policy; later calls keep the first value.
pub(super) fn install(config: &ObservabilityConfig) {
    _ = POLICY.set(RequestPolicy::from_config(config));
}

/// Installed policy, or the defaults when observability was never initialised.
pub(super) fn policy() -> RequestPolicy {
    POLICY.get().copied().unwrap_or_default()
}
