//! Event bus listener that logs every published event

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::prelude::*;

pub fn spawn_event_logger(app: &App) -> JoinHandle<()> {
	let mut rx = app.bus.subscribe();
	tokio::spawn(async move {
		loop {
			match rx.recv().await {
				Ok(event) => info!(
					event = %event.name,
					event_id = %event.id,
					org_id = %event.org_id,
					actor = %event.actor_id,
					"Event"
				),
				Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event logger lagging"),
				Err(RecvError::Closed) => break,
			}
		}
		debug!("Event logger stopped");
	})
}

// vim: ts=4
