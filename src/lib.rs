// Core infrastructure modules
pub mod any;
pub mod errors;

// The two concurrency-bearing subsystems
pub mod cancel; // cancellation-handle bag
pub mod registry; // type-keyed dependency container

// Contracts honored by the (external) view/action layer
pub mod action;

// Re-exports for convenience
pub use cancel::{CancelBag, Cancellable, ClosureCancel, SignalCancel, TaskCancel};
pub use errors::{KeelError, Result};
pub use registry::{Dependency, DependencyContainer, Scope};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::action::{Action, AsyncAction, State};

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        value: i64,
    }

    impl State for Counter {}

    #[derive(Debug)]
    enum CounterAction {
        Increment,
        Refresh,
    }

    #[derive(Debug)]
    struct Increment;

    #[derive(Debug)]
    struct Refresh;

    impl TryFrom<CounterAction> for Increment {
        type Error = CounterAction;
        fn try_from(action: CounterAction) -> std::result::Result<Self, CounterAction> {
            match action {
                CounterAction::Increment => Ok(Increment),
                other => Err(other),
            }
        }
    }

    impl TryFrom<CounterAction> for Refresh {
        type Error = CounterAction;
        fn try_from(action: CounterAction) -> std::result::Result<Self, CounterAction> {
            match action {
                CounterAction::Refresh => Ok(Refresh),
                other => Err(other),
            }
        }
    }

    impl AsyncAction for Refresh {
        fn cancel_key(&self) -> String {
            "refresh".into()
        }
    }

    impl Action for CounterAction {
        type Sync = Increment;
        type Async = Refresh;
    }

    #[tokio::test]
    async fn test_counter_refresh_supersession() {
        // Wire the container the way application start-up would.
        let container = DependencyContainer::new();
        container.register(Scope::Both, || Counter { value: 0 });

        let singleton: Counter = container.resolve(Scope::Singleton);
        let fresh: Counter = container.resolve(Scope::Factory);
        assert_eq!(singleton.value, 0);
        assert_eq!(fresh.value, 0);

        // The async subset of the action carries the supersession key.
        let action = Refresh::try_from(CounterAction::Refresh).unwrap();
        assert_eq!(action.cancel_key(), "refresh");
        assert!(Refresh::try_from(CounterAction::Increment).is_err());

        let bag = CancelBag::new();

        // First refresh: long-running work listening for its cancel signal.
        let (handle, mut cancel_rx) = SignalCancel::pair();
        let first_cancelled = Arc::new(AtomicBool::new(false));
        let observed = first_cancelled.clone();
        let first = tokio::spawn(async move {
            tokio::select! {
                _ = &mut cancel_rx => {
                    observed.store(true, Ordering::SeqCst);
                }
                _ = tokio::time::sleep(Duration::from_secs(30)) => {}
            }
        });
        bag.add(action.cancel_key(), Arc::new(handle));

        // Second refresh under the same key supersedes the first.
        let (second_handle, _second_rx) = SignalCancel::pair();
        bag.add(action.cancel_key(), Arc::new(second_handle));

        tokio::time::timeout(Duration::from_secs(1), first)
            .await
            .expect("first refresh did not observe its cancel signal")
            .unwrap();
        assert!(first_cancelled.load(Ordering::SeqCst));
        assert_eq!(bag.len(), 1);

        bag.cancel_all();
        assert!(bag.is_empty());
    }
}
