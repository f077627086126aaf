//! In-process event bus
//!
//! Feature modules publish domain events after their changes are durable.
//! Publishing never blocks and never fails the publisher: events are placed
//! on a broadcast channel and delivered to whoever is subscribed at that
//! moment. Slow subscribers lag and lose the oldest events.

use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::prelude::*;

pub const DEFAULT_EVENT_BUFFER: usize = 128;

/// A published domain event
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
	pub id: String,
	pub name: Box<str>,
	pub org_id: OrgId,
	pub actor_id: Box<str>,
	pub payload: Value,
	pub timestamp: Timestamp,
}

impl Event {
	pub fn new(
		name: impl Into<Box<str>>,
		org_id: OrgId,
		actor_id: impl Into<Box<str>>,
		payload: Value,
	) -> Self {
		Self {
			id: uuid::Uuid::new_v4().to_string(),
			name: name.into(),
			org_id,
			actor_id: actor_id.into(),
			payload,
			timestamp: Timestamp::now(),
		}
	}
}

/// Fire-and-forget event publication
pub trait NotificationBus: Send + Sync {
	fn publish(&self, event: Event);
}

/// Configuration
#[derive(Clone, Debug)]
pub struct EventBusConfig {
	/// Maximum number of events buffered per subscriber
	pub buffer_size: usize,
}

impl Default for EventBusConfig {
	fn default() -> Self {
		Self { buffer_size: DEFAULT_EVENT_BUFFER }
	}
}

/// Broadcast-channel backed [`NotificationBus`]
#[derive(Debug)]
pub struct EventBus {
	sender: broadcast::Sender<Event>,
}

impl EventBus {
	pub fn new() -> Self {
		Self::with_config(EventBusConfig::default())
	}

	pub fn with_config(config: EventBusConfig) -> Self {
		let (sender, _) = broadcast::channel(config.buffer_size.max(1));
		Self { sender }
	}

	/// Receive every event published from now on
	pub fn subscribe(&self) -> broadcast::Receiver<Event> {
		self.sender.subscribe()
	}

	pub fn subscriber_count(&self) -> usize {
		self.sender.receiver_count()
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new()
	}
}

impl NotificationBus for EventBus {
	fn publish(&self, event: Event) {
		let name = event.name.clone();
		match self.sender.send(event) {
			Ok(receivers) => debug!(event = %name, receivers, "Event published"),
			Err(_) => debug!(event = %name, "Event dropped, no subscribers"),
		}
	}
}


// vim: ts=4
