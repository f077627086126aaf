//! Custom middlewares
//!
//! Authentication is delegated to the gateway in front of the server, which
//! forwards the verified identity in trusted headers.

use axum::{
	body::Body,
	http::{HeaderMap, Request, response::Response},
	middleware::Next,
};

use crate::prelude::*;
use keyshare_core::extract::{Auth, RequestId};
use keyshare_types::auth::AuthCtx;

pub const ORG_ID_HEADER: &str = "x-org-id";
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLES_HEADER: &str = "x-actor-roles";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
	headers.get(name).and_then(|h| h.to_str().ok()).map(str::trim).filter(|h| !h.is_empty())
}

fn auth_from_headers(headers: &HeaderMap) -> ClResult<AuthCtx> {
	let org_id = header(headers, ORG_ID_HEADER)
		.and_then(|id| id.parse::<u32>().ok())
		.ok_or(Error::Unauthorized)?;
	let user_id = header(headers, ACTOR_ID_HEADER).ok_or(Error::Unauthorized)?;
	let roles = header(headers, ACTOR_ROLES_HEADER)
		.map(|roles| {
			roles.split(',').map(str::trim).filter(|r| !r.is_empty()).map(Into::into).collect()
		})
		.unwrap_or_default();

	Ok(AuthCtx { org_id: OrgId(org_id), user_id: user_id.into(), roles })
}

pub async fn require_auth(mut req: Request<Body>, next: Next) -> ClResult<Response<Body>> {
	let auth = auth_from_headers(req.headers()).inspect_err(|_| {
		debug!("Request without valid identity headers");
	})?;

	req.extensions_mut().insert(Auth(auth));

	Ok(next.run(req).await)
}

/// Tag every request with an id, reusing the caller's when given
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response<Body> {
	let id = header(req.headers(), REQUEST_ID_HEADER)
		.map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

	req.extensions_mut().insert(RequestId(id));

	next.run(req).await
}


// vim: ts=4
