//! Common types used throughout Keyshare.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::time::SystemTime;

use crate::prelude::*;

// OrgId //
//*******//
/// Organization identifier. Every stored record is scoped by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrgId(pub u32);

impl std::fmt::Display for OrgId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for OrgId {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_u32(self.0)
	}
}

impl<'de> Deserialize<'de> for OrgId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(OrgId(u32::deserialize(deserializer)?))
	}
}

// Timestamp //
//***********//
/// Unix timestamp in seconds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(i64::try_from(res.as_secs()).unwrap_or(i64::MAX))
	}

	/// Parse an RFC 3339 date-time (e.g. `2026-01-01T00:00:00Z`)
	pub fn from_rfc3339(s: &str) -> ClResult<Timestamp> {
		chrono::DateTime::parse_from_rfc3339(s)
			.map(|dt| Timestamp(dt.timestamp()))
			.map_err(|_| Error::Parse)
	}

	pub fn to_iso_string(&self) -> String {
		chrono::DateTime::from_timestamp(self.0, 0)
			.map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
			.unwrap_or_default()
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

/// Serialize a timestamp as an ISO 8601 string
pub fn serialize_timestamp_iso<S>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
where
	S: serde::Serializer,
{
	serializer.serialize_str(&ts.to_iso_string())
}

/// Serialize an optional timestamp as an ISO 8601 string
pub fn serialize_timestamp_iso_opt<S>(
	ts: &Option<Timestamp>,
	serializer: S,
) -> Result<S::Ok, S::Error>
where
	S: serde::Serializer,
{
	match ts {
		Some(ts) => serializer.serialize_str(&ts.to_iso_string()),
		None => serializer.serialize_none(),
	}
}

// EncryptionMode //
//****************//
/// Metadata encryption mode of an organization
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncryptionMode {
	/// Only user-held private keys can decrypt metadata
	ZeroKnowledge,
	/// A server-held metadata private key can decrypt metadata as well
	UserFriendly,
}

impl EncryptionMode {
	pub fn is_user_friendly(self) -> bool {
		self == EncryptionMode::UserFriendly
	}
}

impl std::fmt::Display for EncryptionMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			EncryptionMode::ZeroKnowledge => write!(f, "zero-knowledge"),
			EncryptionMode::UserFriendly => write!(f, "user-friendly"),
		}
	}
}

impl std::str::FromStr for EncryptionMode {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"zero-knowledge" => Ok(EncryptionMode::ZeroKnowledge),
			"user-friendly" => Ok(EncryptionMode::UserFriendly),
			_ => Err(Error::Parse),
		}
	}
}

// ApiResponse //
//*************//
/// Envelope for successful API responses
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub data: T,
	pub time: Timestamp,
	pub req_id: Option<String>,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data, time: Timestamp::now(), req_id: None }
	}

	pub fn with_req_id(mut self, req_id: String) -> Self {
		self.req_id = if req_id.is_empty() { None } else { Some(req_id) };
		self
	}
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
	use super::*;

	#[test]
	fn test_timestamp_rfc3339() {
		let ts = Timestamp::from_rfc3339("2026-01-01T00:00:00Z");
		assert!(matches!(ts, Ok(Timestamp(1_767_225_600))));
		assert!(Timestamp::from_rfc3339("next tuesday").is_err());
	}

	#[test]
	fn test_timestamp_iso_round_trip() {
		let ts = Timestamp(1_767_225_600);
		assert_eq!(ts.to_iso_string(), "2026-01-01T00:00:00Z");
		assert!(matches!(Timestamp::from_rfc3339(&ts.to_iso_string()), Ok(t) if t == ts));
	}

	#[test]
	fn test_encryption_mode_from_str() {
		assert_eq!("zero-knowledge".parse::<EncryptionMode>().ok(), Some(EncryptionMode::ZeroKnowledge));
		assert_eq!("user-friendly".parse::<EncryptionMode>().ok(), Some(EncryptionMode::UserFriendly));
		assert!("zk".parse::<EncryptionMode>().is_err());
	}

	#[test]
	fn test_api_response_skips_empty_req_id() {
		let res = ApiResponse::new(1).with_req_id(String::new());
		let json = serde_json::to_value(&res).unwrap();
		assert!(json.get("reqId").is_none());
		assert_eq!(json["data"], 1);
	}
}

// vim: ts=4
