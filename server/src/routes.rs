use axum::{Router, middleware, routing::post};
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id, require_auth};
use crate::prelude::*;
use keyshare_metadata::handler as metadata;

pub fn init(app: App) -> Router {
	let protected_router = Router::new()
		.route("/api/metadata/keys/settings", post(metadata::post_settings))
		.layer(middleware::from_fn(require_auth));

	Router::new()
		.merge(protected_router)
		.layer(middleware::from_fn(request_id))
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4
