//! Concrete cancel capabilities stored in a [`CancelBag`](crate::cancel::CancelBag).

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::{AbortHandle, JoinHandle};

/// A single cancel capability.
///
/// Cancellation is cooperative and advisory: `cancel` requests that the
/// underlying work stop and returns immediately, it never waits for the work
/// to observably finish. Every implementation is idempotent.
pub trait Cancellable: Send + Sync {
    fn cancel(&self);
}

/// Cancels by aborting a spawned tokio task.
pub struct TaskCancel {
    handle: AbortHandle,
}

impl TaskCancel {
    pub fn new(handle: AbortHandle) -> Self {
        Self { handle }
    }

    /// Capture the abort handle of `task` without consuming it.
    pub fn for_task<T>(task: &JoinHandle<T>) -> Self {
        Self::new(task.abort_handle())
    }
}

impl Cancellable for TaskCancel {
    fn cancel(&self) {
        // Aborting twice is a no-op on tokio's side.
        self.handle.abort();
    }
}

/// Cancels by firing a oneshot signal the work listens on.
///
/// Unlike [`TaskCancel`] this lets the work wind down at its own checkpoint
/// instead of being torn out of the executor.
pub struct SignalCancel {
    tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl SignalCancel {
    /// The handle plus the receiver to select on inside the work.
    pub fn pair() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tx: Mutex::new(Some(tx)),
            },
            rx,
        )
    }
}

impl Cancellable for SignalCancel {
    fn cancel(&self) {
        if let Some(tx) = self.tx.lock().take() {
            // The work may already have finished and dropped its receiver.
            let _ = tx.send(());
        }
    }
}

/// Cancels by running an arbitrary closure at most once.
///
/// The escape hatch for anything that is neither a task nor a signal: timer
/// invalidation, observer removal, closing a subscription.
pub struct ClosureCancel {
    action: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl ClosureCancel {
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            action: Mutex::new(Some(Box::new(action))),
        }
    }
}

impl Cancellable for ClosureCancel {
    fn cancel(&self) {
        if let Some(action) = self.action.lock().take() {
            action();
        }
    }
}
