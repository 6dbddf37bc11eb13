//! Contracts honored by the view/action layer driving the core.
//!
//! The declarative view layer itself lives outside this crate; these traits
//! are the seam it plugs into.

pub mod hooks;

pub use hooks::{ActionHook, CompositeHook, LoggingHook};

/// Marker for state value types.
///
/// Equality is required so bindings can suppress redundant change
/// notifications when a dispatched action leaves the state untouched.
pub trait State: Clone + PartialEq + Send + Sync + 'static {}

/// A dispatchable action, partitionable into its synchronous and
/// asynchronous subsets.
///
/// Both conversions use `TryFrom<Self, Error = Self>`: an action belonging to
/// the other subset is handed back unchanged rather than treated as an error.
///
/// # Example
///
/// ```
/// use keel::action::{Action, AsyncAction};
///
/// #[derive(Debug)]
/// enum CounterAction {
///     Increment,
///     Refresh,
/// }
///
/// #[derive(Debug)]
/// struct Increment;
///
/// #[derive(Debug)]
/// struct Refresh;
///
/// impl TryFrom<CounterAction> for Increment {
///     type Error = CounterAction;
///     fn try_from(action: CounterAction) -> Result<Self, CounterAction> {
///         match action {
///             CounterAction::Increment => Ok(Increment),
///             other => Err(other),
///         }
///     }
/// }
///
/// impl TryFrom<CounterAction> for Refresh {
///     type Error = CounterAction;
///     fn try_from(action: CounterAction) -> Result<Self, CounterAction> {
///         match action {
///             CounterAction::Refresh => Ok(Refresh),
///             other => Err(other),
///         }
///     }
/// }
///
/// impl AsyncAction for Refresh {
///     fn cancel_key(&self) -> String {
///         "refresh".into()
///     }
/// }
///
/// impl Action for CounterAction {
///     type Sync = Increment;
///     type Async = Refresh;
/// }
/// ```
pub trait Action: Sized + Send + 'static {
    /// The synchronous subset of this action type.
    type Sync: TryFrom<Self, Error = Self> + Send + 'static;
    /// The asynchronous subset; each case carries a cancellation key.
    type Async: AsyncAction + TryFrom<Self, Error = Self>;
}

/// An asynchronous action correlated with its in-flight work by a stable key.
pub trait AsyncAction: Send + 'static {
    /// Key under which this action's work is tracked in a
    /// [`CancelBag`](crate::cancel::CancelBag). Starting a new action with
    /// the same key supersedes (cancels) the previous one.
    fn cancel_key(&self) -> String;
}
