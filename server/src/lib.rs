//! Keyshare server
//!
//! Wires the SQLite meta adapter, the event bus and the metadata settings
//! routes into an axum server.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

use std::sync::Arc;

use keyshare_core::app::AppBuilder;
use keyshare_meta_adapter_sqlite::MetaAdapterSqlite;

pub mod config;
pub mod events;
pub mod middleware;
pub mod prelude;
pub mod routes;

pub use config::Config;

use crate::prelude::*;

/// Open the database and assemble the application state
pub async fn build_app(config: &Config) -> ClResult<App> {
	let meta_adapter = Arc::new(MetaAdapterSqlite::new(&config.db_dir).await?);

	AppBuilder::new().opts(config.app_opts()).meta_adapter(meta_adapter).build()
}

pub async fn run(config: Config) -> ClResult<()> {
	let app = build_app(&config).await?;
	let _event_logger = events::spawn_event_logger(&app);

	let listener = tokio::net::TcpListener::bind(config.listen.as_ref()).await.map_err(|err| {
		error!("Cannot listen on {}: {}", config.listen, err);
		Error::Internal(format!("cannot listen on {}", config.listen))
	})?;
	info!(listen = %config.listen, "Listening");

	axum::serve(listener, routes::init(app))
		.with_graceful_shutdown(shutdown_signal())
		.await
		.map_err(|err| Error::Internal(format!("server error: {}", err)))?;

	info!("Server stopped");
	Ok(())
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		warn!("Cannot listen for shutdown signal: {}", err);
		std::future::pending::<()>().await;
	}
}

// vim: ts=4
