//! Core infrastructure for Keyshare.
//!
//! Application state shared by the feature crates, the request extractors
//! the HTTP handlers rely on, and the in-process event bus.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod event_bus;
pub mod extract;
pub mod prelude;

pub use app::{App, AppBuilder, AppBuilderOpts, AppState};
pub use event_bus::{Event, EventBus, NotificationBus};
pub use extract::{Auth, OptionalRequestId, RequestId};

// vim: ts=4
