//! Cancellable delays
//!
//! An [`AbortController`] hands out [`AbortSignal`]s; aborting the controller
//! wakes every waiter. The first abort reason sticks.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::errors::{error, type_error, ErrorCause, ErrorCauseObject, UtilError};

/// Why an operation was aborted
#[derive(Debug, Clone, PartialEq)]
pub enum AbortReason {
    Message(String),
    Error(UtilError),
}

impl From<&str> for AbortReason {
    fn from(message: &str) -> Self {
        AbortReason::Message(message.to_string())
    }
}

impl From<String> for AbortReason {
    fn from(message: String) -> Self {
        AbortReason::Message(message)
    }
}

impl From<UtilError> for AbortReason {
    fn from(err: UtilError) -> Self {
        AbortReason::Error(err)
    }
}

impl AbortReason {
    /// `{ cause: error }` for errors, `{ cause: { reason } }` otherwise
    fn into_cause(self) -> ErrorCause {
        let inner = match self {
            AbortReason::Error(err) => ErrorCause::from(err),
            AbortReason::Message(reason) => {
                ErrorCause::from(ErrorCauseObject::new().with_field("reason", reason))
            }
        };
        ErrorCause::from(ErrorCauseObject::new().with_cause(inner))
    }
}

/// Read side of an [`AbortController`]; cheap to clone
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    token: CancellationToken,
    reason: Arc<OnceLock<AbortReason>>,
}

impl AbortSignal {
    pub fn aborted(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn reason(&self) -> Option<AbortReason> {
        self.reason.get().cloned()
    }

    /// Resolves once the signal is aborted
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    fn cause(&self) -> ErrorCause {
        self.reason()
            .unwrap_or_else(|| AbortReason::from("signal is aborted without reason"))
            .into_cause()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AbortController {
    signal: AbortSignal,
}

impl AbortController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Abort with a reason; later calls keep the first reason
    pub fn abort(&self, reason: impl Into<AbortReason>) {
        let _ = self.signal.reason.set(reason.into());
        self.signal.token.cancel();
    }
}

/// Wait for `duration` unless `signal` aborts first
///
/// The timer is dropped as soon as the signal fires.
pub async fn sleep(duration: Duration, signal: Option<&AbortSignal>) -> Result<(), UtilError> {
    let Some(signal) = signal else {
        tokio::time::sleep(duration).await;
        return Ok(());
    };

    if signal.aborted() {
        return Err(error(
            "The sleep method was aborted before start.",
            Some(signal.cause()),
        ));
    }

    tokio::select! {
        biased;

        _ = signal.cancelled() => {
            tracing::debug!(?duration, "sleep aborted");
            Err(error("The sleep method aborted.", Some(signal.cause())))
        }
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}

/// [`sleep`] taking milliseconds, which must be a non-negative integer
pub async fn sleep_millis(timeout: f64, signal: Option<&AbortSignal>) -> Result<(), UtilError> {
    if !timeout.is_finite() || timeout.fract() != 0.0 || timeout < 0.0 {
        return Err(type_error(
            "Timeout must be a valid integer.",
            Some(ErrorCauseObject::received(timeout).into()),
        ));
    }
    sleep(Duration::from_millis(timeout as u64), signal).await
}
