//! Creative Studio event bus and approval notifications.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`StudioEvent`]: the domain event envelope published for design
//!   lifecycle and review transitions.
//! - [`ApprovalNotifier`]: background consumer that turns review events
//!   into [`Notification`]s for a pluggable [`NotificationSink`].

pub mod bus;
pub mod notifier;

pub use bus::{event_types, EventBus, StudioEvent};
pub use notifier::{
    notification_for, ApprovalNotifier, LogSink, Notification, NotificationKind, NotificationSink,
    NotifyError,
};
