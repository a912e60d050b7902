//! Lifetime of a mounted view.
//!
//! Every request a controller makes runs inside its `ViewScope`. Once the
//! scope is cancelled (explicitly, through a [`CancelHandle`] held by another
//! task, or by dropping the view) in-flight requests resolve to
//! `ErrorKind::Cancelled` and their results never reach view state.

use crate::error::{ErrorKind, Result};
use std::{future::Future, sync::Arc};
use tokio::sync::watch;

#[derive(Debug)]
pub struct ViewScope {
    cancelled: Arc<watch::Sender<bool>>,
}

/// Cloneable remote control for a scope, e.g. for a router that unmounts
/// the view while one of its requests is still pending.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    cancelled: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            cancelled: Arc::new(tx),
        }
    }

    pub fn handle(&self) -> CancelHandle {
        CancelHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Drives `fut` unless the scope is cancelled first.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output> {
        let mut rx = self.cancelled.subscribe();
        if *rx.borrow_and_update() {
            return Err(ErrorKind::Cancelled.into());
        }

        tokio::select! {
            biased;
            _ = rx.wait_for(|cancelled| *cancelled) => Err(ErrorKind::Cancelled.into()),
            out = fut => Ok(out),
        }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancel();
    }
}
