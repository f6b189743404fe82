//! Per-call request options: cancellation, timeout, extra headers.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Aborts the in-flight request when cancelled.
    pub cancel: Option<CancellationToken>,
    /// Per-request timeout. Races `cancel`; whichever fires first wins.
    pub timeout: Option<Duration>,
    /// Extra headers, added before the auth hook runs.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}
