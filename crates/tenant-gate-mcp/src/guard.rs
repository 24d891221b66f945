//! Execution timeout wrapper

use std::future::Future;
use std::time::Duration;

use crate::Error;

/// Default timeout applied to every executor call.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Bounds the wall-clock time of executor calls.
///
/// The gate caps rows but not cost; this is the caller-side bound.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionGuard {
    timeout: Duration,
}

impl ExecutionGuard {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `fut`, failing with [`Error::QueryTimeout`] once the timeout expires.
    pub async fn execute<F, T, E>(&self, fut: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<Error>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| Error::QueryTimeout(self.timeout))?
            .map_err(Into::into)
    }
}

impl Default for ExecutionGuard {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_TIMEOUT)
    }
}
