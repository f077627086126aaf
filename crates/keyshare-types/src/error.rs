//! Error type shared by every Keyshare crate.
//!
//! All fallible operations return [`ClResult`]. The error maps onto an HTTP
//! response body of the form `{"error": {"code", "message", "details"}}`.

use std::collections::BTreeMap;
use std::fmt;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub type ClResult<T> = std::result::Result<T, Error>;

// FieldErrors //
//*************//
/// Per-field validation errors: `field -> rule -> message`.
///
/// Ordered maps keep the serialized output stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Box<str>, BTreeMap<Box<str>, Box<str>>>);

impl FieldErrors {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record a failed rule for a field
	pub fn add(&mut self, field: &str, rule: &str, message: impl Into<Box<str>>) {
		self.0.entry(field.into()).or_default().insert(rule.into(), message.into());
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn has(&self, field: &str, rule: &str) -> bool {
		self.0.get(field).is_some_and(|rules| rules.contains_key(rule))
	}

	pub fn fields(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(AsRef::as_ref)
	}

	/// Turn the collected errors into a result, failing when any were recorded
	pub fn into_result(self, message: &str) -> ClResult<()> {
		if self.is_empty() {
			Ok(())
		} else {
			Err(Error::ValidationFailed { message: message.into(), errors: self })
		}
	}
}

// Error //
//*******//
#[derive(Debug)]
pub enum Error {
	NotFound,
	/// No authenticated actor on the request
	Unauthorized,
	/// The actor lacks the capability required by the operation
	PermissionDenied,
	/// Payload shape or business-rule violation
	ValidationFailed { message: Box<str>, errors: FieldErrors },
	/// A user-friendly transition needs a server key and none was supplied
	MissingKeyPayload,
	/// Server key provisioning rejected a payload, keyed by payload index
	KeyProvisioningFailed(BTreeMap<usize, FieldErrors>),
	/// Concurrent modification detected, the caller may retry
	Conflict(String),
	/// The backing store failed at the infrastructure level
	DbError,
	Parse,
	Internal(String),
}

pub const MISSING_KEY_PAYLOAD_MSG: &str =
	"The server metadata private key is required to enable these settings.";
pub const KEY_PROVISIONING_FAILED_MSG: &str =
	"The server metadata private keys data are invalid.";

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::ValidationFailed { .. }
			| Error::MissingKeyPayload
			| Error::KeyProvisioningFailed(_)
			| Error::Parse => StatusCode::BAD_REQUEST,
			Error::Conflict(_) => StatusCode::CONFLICT,
			Error::DbError | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn code(&self) -> &'static str {
		match self {
			Error::NotFound => "E-NOT-FOUND",
			Error::Unauthorized => "E-UNAUTHORIZED",
			Error::PermissionDenied => "E-FORBIDDEN",
			Error::ValidationFailed { .. } => "E-VALIDATION",
			Error::MissingKeyPayload => "E-MISSING-KEY-PAYLOAD",
			Error::KeyProvisioningFailed(_) => "E-KEY-PROVISIONING",
			Error::Conflict(_) => "E-CONFLICT",
			Error::DbError => "E-STORE-UNAVAILABLE",
			Error::Parse => "E-PARSE",
			Error::Internal(_) => "E-INTERNAL",
		}
	}

	/// Structured error details for the response body
	fn details(&self) -> Option<serde_json::Value> {
		match self {
			Error::ValidationFailed { errors, .. } => serde_json::to_value(errors).ok(),
			Error::KeyProvisioningFailed(by_index) => {
				serde_json::to_value(by_index).ok().map(|errs| {
					serde_json::json!({ "metadata_private_keys": errs })
				})
			}
			_ => None,
		}
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::NotFound => write!(f, "Not found"),
			Error::Unauthorized => write!(f, "Authentication required"),
			Error::PermissionDenied => write!(f, "Access restricted to administrators"),
			Error::ValidationFailed { message, .. } => write!(f, "{}", message),
			Error::MissingKeyPayload => write!(f, "{}", MISSING_KEY_PAYLOAD_MSG),
			Error::KeyProvisioningFailed(_) => write!(f, "{}", KEY_PROVISIONING_FAILED_MSG),
			Error::Conflict(msg) => write!(f, "Conflict: {}", msg),
			Error::DbError => write!(f, "Storage unavailable"),
			Error::Parse => write!(f, "Parse error"),
			Error::Internal(msg) => write!(f, "Internal error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		tracing::warn!("JSON: {}", err);
		Error::Parse
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!(code = self.code(), "Request failed: {}", self);
		}
		// Internal details are not exposed to clients
		let message = match &self {
			Error::Internal(_) => "Internal error".to_string(),
			err => err.to_string(),
		};
		let mut error = serde_json::json!({
			"code": self.code(),
			"message": message,
		});
		if let Some(details) = self.details() {
			error["details"] = details;
		}
		(status, Json(serde_json::json!({ "error": error }))).into_response()
	}
}


// vim: ts=4
