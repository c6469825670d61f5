//! Cooperative deadlines for parsing and evaluation.
//!
//! Nothing here preempts a running computation. The cursor polls
//! [`TimeoutManager::check`] on every advance, the evaluator polls it before
//! every node that can recurse, and summations poll it once per iteration.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::errors::TimeoutError;

/// Timeout applied when the caller does not supply one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared flag used to request cancellation from another thread.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A fixed deadline plus an optional cancellation token.
///
/// The deadline is computed once at construction. A timeout so large that the
/// deadline cannot be represented never expires.
#[derive(Debug, Clone)]
pub struct TimeoutManager {
    timeout: Duration,
    deadline: Option<Instant>,
    cancel: Option<CancelToken>,
}

impl TimeoutManager {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: Instant::now().checked_add(timeout),
            cancel: None,
        }
    }

    pub fn with_cancel_token(timeout: Duration, token: CancelToken) -> Self {
        Self {
            cancel: Some(token),
            ..Self::new(timeout)
        }
    }

    /// The duration this manager was created with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cancel_token(&self) -> Option<&CancelToken> {
        self.cancel.as_ref()
    }

    pub fn is_expired(&self) -> bool {
        self.check().is_err()
    }

    /// Fail if the deadline has passed or cancellation was requested.
    #[inline]
    pub fn check(&self) -> Result<(), TimeoutError> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            tracing::warn!("evaluation cancelled");
            return Err(TimeoutError { cancelled: true });
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                tracing::warn!(timeout = ?self.timeout, "evaluation timed out");
                Err(TimeoutError { cancelled: false })
            }
            _ => Ok(()),
        }
    }
}

impl Default for TimeoutManager {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}
