//! Cancellation tracking for in-flight asynchronous work.
//!
//! [`CancelBag`] owns one [`Cancellable`] handle per string key and guarantees
//! each is cancelled at most once; inserting under an in-use key supersedes
//! (cancels) the prior entry.

pub mod bag;
pub mod handle;

pub use bag::CancelBag;
pub use handle::{Cancellable, ClosureCancel, SignalCancel, TaskCancel};
