//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`StudioEvent`]s and is
//! shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use studio_core::approval::ApprovalActionKind;
use studio_core::design::Design;
use studio_core::types::EntityId;
use tokio::sync::broadcast;

/// Dot-separated event names.
pub mod event_types {
    pub const DESIGN_CREATED: &str = "design.created";
    pub const DESIGN_SAVED: &str = "design.saved";
    pub const DESIGN_DELETED: &str = "design.deleted";
    pub const APPROVAL_REQUESTED: &str = "design.approval_requested";
    pub const APPROVED: &str = "design.approved";
    pub const REJECTED: &str = "design.rejected";
    pub const SCHEDULED: &str = "design.scheduled";
}

// ---------------------------------------------------------------------------
// StudioEvent
// ---------------------------------------------------------------------------

/// A domain event concerning a design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioEvent {
    /// Dot-separated event name, see [`event_types`].
    pub event_type: String,

    pub design_id: Option<EntityId>,

    pub brand_id: Option<EntityId>,

    /// User that triggered the event, when known.
    pub actor_id: Option<EntityId>,

    /// Event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl StudioEvent {
    /// Create an event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            design_id: None,
            brand_id: None,
            actor_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the design (and its brand) the event is about.
    pub fn with_design(mut self, design: &Design) -> Self {
        self.design_id = Some(design.id.clone());
        self.brand_id = Some(design.brand_id.clone());
        self
    }

    pub fn with_actor(mut self, actor_id: impl Into<EntityId>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Event describing a successful review transition that produced `design`.
    pub fn approval(design: &Design, action: ApprovalActionKind, actor: Option<&str>) -> Self {
        let event_type = match action {
            ApprovalActionKind::RequestApproval => event_types::APPROVAL_REQUESTED,
            ApprovalActionKind::Approve => event_types::APPROVED,
            ApprovalActionKind::Reject => event_types::REJECTED,
            ApprovalActionKind::Schedule => event_types::SCHEDULED,
        };
        let record = design.approval();
        let payload = serde_json::json!({
            "name": design.name,
            "status": record.status(),
            "requestedBy": record.requested_by(),
            "rejectionReason": record.rejection_reason(),
            "approvalNotes": record.notes(),
            "scheduledDate": design.schedule().scheduled_date(),
        });

        let event = StudioEvent::new(event_type)
            .with_design(design)
            .with_payload(payload);
        match actor {
            Some(a) => event.with_actor(a),
            None => event,
        }
    }

    /// Read a string field from the payload.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(serde_json::Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// When the buffer is full the oldest unconsumed events are dropped and slow
/// receivers observe `RecvError::Lagged`.
pub struct EventBus {
    sender: broadcast::Sender<StudioEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: StudioEvent) {
        tracing::debug!(event_type = %event.event_type, design_id = ?event.design_id, "Publishing event");
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StudioEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use studio_core::approval::{apply_approval_action_now, ApprovalAction};
    use studio_core::design::create_initial_design;
    use studio_core::format::DesignFormat;

    use super::*;

    fn pending_design() -> Design {
        let draft = create_initial_design(DesignFormat::StoryPortrait, "brand-1", None).unwrap();
        apply_approval_action_now(
            &draft,
            ApprovalAction::RequestApproval {
                requester_id: "creator-1".into(),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(StudioEvent::new("design.created").with_actor("u1"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event_type, "design.created");
        assert_eq!(received.actor_id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn every_subscriber_gets_every_event() {
        let bus = EventBus::new(16);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(StudioEvent::new("one"));
        bus.publish(StudioEvent::new("two"));

        for rx in [&mut a, &mut b] {
            assert_eq!(rx.recv().await.unwrap().event_type, "one");
            assert_eq!(rx.recv().await.unwrap().event_type, "two");
        }
    }

    #[test]
    fn publish_without_subscribers_does_not_panic() {
        EventBus::default().publish(StudioEvent::new("nobody.listening"));
    }

    #[test]
    fn approval_event_carries_design_context() {
        let design = pending_design();
        let event = StudioEvent::approval(
            &design,
            ApprovalActionKind::RequestApproval,
            Some("creator-1"),
        );

        assert_eq!(event.event_type, event_types::APPROVAL_REQUESTED);
        assert_eq!(event.design_id.as_deref(), Some(design.id.as_str()));
        assert_eq!(event.brand_id.as_deref(), Some("brand-1"));
        assert_eq!(event.actor_id.as_deref(), Some("creator-1"));
        assert_eq!(event.payload_str("status"), Some("pending_approval"));
        assert_eq!(event.payload_str("requestedBy"), Some("creator-1"));
        assert_eq!(event.payload_str("rejectionReason"), None);
    }
}
