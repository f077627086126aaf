//! Metadata settings handlers

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};

use crate::prelude::*;
use crate::settings::{MetadataKeysSettings, SettingsProposal, SettingsTransitionService};
use keyshare_core::extract::{Auth, OptionalRequestId};
use keyshare_types::types::ApiResponse;

/// POST /api/metadata/keys/settings - Change the organization's metadata keys settings
pub async fn post_settings(
	State(app): State<App>,
	Auth(auth): Auth,
	OptionalRequestId(req_id): OptionalRequestId,
	body: Result<Json<SettingsProposal>, JsonRejection>,
) -> ClResult<(StatusCode, Json<ApiResponse<MetadataKeysSettings>>)> {
	let Json(proposal) = body.map_err(|err| {
		debug!("Rejected settings body: {}", err.body_text());
		Error::Parse
	})?;

	let settings = SettingsTransitionService::from_app(&app)
		.apply_settings(Arc::new(auth), proposal)
		.await?;

	let response = ApiResponse::new(settings).with_req_id(req_id.unwrap_or_default());

	Ok((StatusCode::OK, Json(response)))
}

// vim: ts=4
