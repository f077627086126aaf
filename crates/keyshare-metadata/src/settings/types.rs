//! Metadata keys settings: stored form, incoming proposal, validated proposal

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::prelude::*;

// MetadataKeysSettings //
//**********************//
/// Validated metadata keys settings of an organization.
///
/// The encryption mode is exposed as the `zero_knowledge_key_share` boolean
/// only when serialized, everything in between works with [`EncryptionMode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataKeysSettings {
	pub allow_usage_of_personal_keys: bool,
	#[serde(rename = "zero_knowledge_key_share", with = "key_share_flag")]
	pub mode: EncryptionMode,
}

impl MetadataKeysSettings {
	/// Settings of an organization that never stored any
	pub fn default_for(mode: EncryptionMode) -> Self {
		Self { allow_usage_of_personal_keys: true, mode }
	}

	pub fn is_user_friendly(&self) -> bool {
		self.mode.is_user_friendly()
	}

	pub fn to_json(&self) -> ClResult<Value> {
		Ok(serde_json::to_value(self)?)
	}

	pub fn from_json(value: Value) -> ClResult<Self> {
		Ok(serde_json::from_value(value)?)
	}
}

impl Default for MetadataKeysSettings {
	fn default() -> Self {
		Self::default_for(EncryptionMode::ZeroKnowledge)
	}
}

/// `zero_knowledge_key_share: true` is zero-knowledge mode, `false` is user-friendly
mod key_share_flag {
	use serde::{Deserialize, Deserializer, Serializer};

	use keyshare_types::types::EncryptionMode;

	pub fn serialize<S>(mode: &EncryptionMode, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_bool(*mode == EncryptionMode::ZeroKnowledge)
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<EncryptionMode, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(if bool::deserialize(deserializer)? {
			EncryptionMode::ZeroKnowledge
		} else {
			EncryptionMode::UserFriendly
		})
	}
}

// SettingsProposal //
//******************//
/// Settings change as submitted, not validated yet.
///
/// Fields are kept as raw JSON so validation can report type errors per field.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SettingsProposal {
	#[serde(default)]
	pub allow_usage_of_personal_keys: Option<Value>,
	#[serde(default)]
	pub zero_knowledge_key_share: Option<Value>,
	#[serde(default)]
	pub metadata_private_keys: Option<Value>,
}

impl SettingsProposal {
	/// The submitted key share flag, if present and a boolean
	pub fn key_share_flag(&self) -> Option<bool> {
		self.zero_knowledge_key_share.as_ref().and_then(Value::as_bool)
	}

	/// Submitted private key payloads, empty when absent or not a list
	pub fn private_key_payloads(&self) -> Vec<PrivateKeyPayload> {
		match &self.metadata_private_keys {
			Some(Value::Array(items)) => items
				.iter()
				.filter_map(|item| item.as_object().cloned().map(PrivateKeyPayload))
				.collect(),
			_ => Vec::new(),
		}
	}
}

// PrivateKeyPayload //
//*******************//
/// One submitted server private key, shape checked by the provisioner
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PrivateKeyPayload(pub Map<String, Value>);

impl PrivateKeyPayload {
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.0.get(field)
	}

	pub fn get_str(&self, field: &str) -> Option<&str> {
		self.0.get(field).and_then(Value::as_str)
	}

	pub fn metadata_key_id(&self) -> Option<&str> {
		self.get_str("metadata_key_id")
	}
}

impl From<Value> for PrivateKeyPayload {
	fn from(value: Value) -> Self {
		match value {
			Value::Object(map) => PrivateKeyPayload(map),
			_ => PrivateKeyPayload::default(),
		}
	}
}

// ValidatedProposal //
//*******************//
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedProposal {
	pub settings: MetadataKeysSettings,
	pub private_keys: Vec<PrivateKeyPayload>,
}


// vim: ts=4
