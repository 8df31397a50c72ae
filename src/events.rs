use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted by the services after a mutation commits. Delivery
/// is best-effort; a full channel or a dropped receiver never fails the
/// originating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    LeaveSubmitted(Uuid),
    LeaveApproved(Uuid),
    LeaveRejected(Uuid),
    LeaveCancelled(Uuid),
    BalanceAllocated(Uuid),
    SignupSubmitted(Uuid),
    SignupApproved { request_id: Uuid, user_id: Uuid },
    SignupRejected(Uuid),
    UserCreated(Uuid),
    UserUpdated(Uuid),
    UserDeleted(Uuid),
    OutletCreated(Uuid),
    OutletUpdated(Uuid),
    OutletDeleted(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event, logging instead of propagating on failure.
    pub async fn send(&self, event: Event) {
        if let Err(e) = self.sender.send(event).await {
            warn!("Failed to publish event: {}", e);
        }
    }
}

/// Drains the event channel. Currently events are only surfaced to the logs;
/// notification fan-out hangs off this loop when a delivery channel exists.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::LeaveApproved(id) => info!(leave_id = %id, "Leave approved"),
            Event::LeaveRejected(id) => info!(leave_id = %id, "Leave rejected"),
            Event::SignupApproved {
                request_id,
                user_id,
            } => {
                info!(request_id = %request_id, user_id = %user_id, "Signup request approved")
            }
            other => info!("Event: {:?}", other),
        }
    }

    info!("Event channel closed; stopping event processing loop");
}
