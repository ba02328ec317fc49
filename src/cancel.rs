//! Cancellation and per-call deadlines.
//!
//! A [`CallGuard`] wraps every call to an external collaborator. The call races against the
//! guard's deadline and its [`CancellationSignal`]; whichever finishes first decides the
//! result. Cancellation surfaces as [`PipelineError::Cancelled`], a deadline expiry as
//! [`PipelineError::DeadlineExceeded`].

use crate::error::PipelineError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::warn;

/// Creates a connected handle/signal pair.
pub fn cancellation_pair() -> (CancelHandle, CancellationSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx: Arc::new(tx) }, CancellationSignal { rx })
}

/// Trigger side. Cancelling is idempotent and cannot be undone.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Observing side, cheap to clone.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    rx: watch::Receiver<bool>,
}

impl CancellationSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested. Pends forever if the handle is dropped
    /// without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::never()
    }
}

/// Deadline plus cancellation wrapper around one external call.
#[derive(Debug, Clone)]
pub struct CallGuard {
    timeout: Option<Duration>,
    signal: CancellationSignal,
}

impl CallGuard {
    pub fn new(timeout: Option<Duration>, signal: CancellationSignal) -> Self {
        Self { timeout, signal }
    }

    /// No deadline, never cancelled.
    pub fn unbounded() -> Self {
        Self::new(None, CancellationSignal::never())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.is_cancelled()
    }

    /// Fails fast with [`PipelineError::Cancelled`] when already cancelled.
    pub fn check(&self, operation: &str) -> Result<(), PipelineError> {
        if self.is_cancelled() {
            return Err(PipelineError::Cancelled(operation.to_string()));
        }
        Ok(())
    }

    pub async fn run<T, F>(&self, operation: &str, call: F) -> Result<T, PipelineError>
    where
        F: Future<Output = Result<T, PipelineError>>,
    {
        self.check(operation)?;

        let bounded = async {
            match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!(operation, timeout_ms = limit.as_millis() as u64, "Call deadline exceeded");
                        Err(PipelineError::DeadlineExceeded {
                            operation: operation.to_string(),
                            timeout_ms: limit.as_millis() as u64,
                        })
                    }
                },
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.signal.cancelled() => Err(PipelineError::Cancelled(operation.to_string())),
            result = bounded => result,
        }
    }
}

impl Default for CallGuard {
    fn default() -> Self {
        Self::unbounded()
    }
}
