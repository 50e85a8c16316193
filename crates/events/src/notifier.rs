//! Review-event notifications.
//!
//! [`ApprovalNotifier`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and hands one [`Notification`] per review event to a
//! [`NotificationSink`]. Which channel the sink uses (email, in-app) is the
//! sink's concern. The notifier only decides who is told what.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use studio_core::types::EntityId;
use tokio::sync::broadcast;

use crate::bus::{event_types, StudioEvent};

/// Prefix of the group recipient for a brand's reviewers.
pub const REVIEWERS_RECIPIENT_PREFIX: &str = "reviewers:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ApprovalRequested,
    Approved,
    Rejected,
    Scheduled,
}

/// A message for one recipient about one design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// User id, or `reviewers:<brand_id>` for a brand's review group.
    pub recipient: String,
    pub kind: NotificationKind,
    pub design_id: EntityId,
    pub brand_id: EntityId,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Destination for notifications.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn deliver(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Sink that writes each notification as a structured log record.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn deliver(&self, notification: Notification) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %notification.recipient,
            kind = ?notification.kind,
            design_id = %notification.design_id,
            brand_id = %notification.brand_id,
            message = %notification.message,
            "Notification delivered"
        );
        Ok(())
    }
}

/// Background service routing review events to a [`NotificationSink`].
pub struct ApprovalNotifier {
    sink: Arc<dyn NotificationSink>,
}

impl ApprovalNotifier {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Run the notification loop.
    ///
    /// Exits when the channel is closed (i.e. the bus is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<StudioEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let Some(notification) = notification_for(&event) else {
                        continue;
                    };
                    if let Err(e) = self.sink.deliver(notification).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to deliver notification"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Approval notifier lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, approval notifier shutting down");
                    break;
                }
            }
        }
    }
}

/// Map a review event to its notification. Non-review events map to `None`.
///
/// Approval requests go to the brand's reviewers; decisions and scheduling
/// go back to whoever requested the review.
pub fn notification_for(event: &StudioEvent) -> Option<Notification> {
    let design_id = event.design_id.clone()?;
    let brand_id = event.brand_id.clone()?;
    let name = event.payload_str("name").unwrap_or("Untitled design");
    let requester = event.payload_str("requestedBy");

    let (kind, recipient, message) = match event.event_type.as_str() {
        event_types::APPROVAL_REQUESTED => (
            NotificationKind::ApprovalRequested,
            format!("{REVIEWERS_RECIPIENT_PREFIX}{brand_id}"),
            format!("\"{name}\" is waiting for your approval"),
        ),
        event_types::APPROVED => (
            NotificationKind::Approved,
            requester?.to_string(),
            format!("\"{name}\" was approved"),
        ),
        event_types::REJECTED => {
            let reason = event.payload_str("rejectionReason").unwrap_or("no reason given");
            (
                NotificationKind::Rejected,
                requester?.to_string(),
                format!("\"{name}\" was rejected: {reason}"),
            )
        }
        event_types::SCHEDULED => {
            let date = event.payload_str("scheduledDate").unwrap_or("an upcoming date");
            (
                NotificationKind::Scheduled,
                requester?.to_string(),
                format!("\"{name}\" is scheduled for {date}"),
            )
        }
        _ => return None,
    };

    Some(Notification {
        recipient,
        kind,
        design_id,
        brand_id,
        message,
        created_at: event.timestamp,
    })
}
