//! Event bus and ability registry ("the bag").
//!
//! - `event`: the named events and their contextual data
//! - `filter`: structural filters on subscriptions
//! - `bag`: the subscription registry and pending-trigger queue

pub mod bag;
pub mod event;
pub mod filter;

pub use bag::{PendingTrigger, Subscription, TriggerBag};
pub use event::{EventKind, GameEvent};
pub use filter::{EventFilter, FilterContext};
