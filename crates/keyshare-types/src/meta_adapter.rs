//! Adapter that stores organization settings and metadata key material.
//!
//! Reads that drive a decision and the writes that follow it go through a
//! [`MetaTx`] unit of work: either everything written through it becomes
//! visible on [`MetaTx::commit`], or nothing does. Dropping a transaction
//! without committing rolls it back.

use async_trait::async_trait;
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::{
	prelude::*,
	types::{serialize_timestamp_iso, serialize_timestamp_iso_opt},
};

/// Organization setting key holding the metadata keys settings
pub const METADATA_SETTINGS_KEY: &str = "metadata.keys.settings";

/// A stored organization setting
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingRecord {
	pub name: Box<str>,
	pub value: serde_json::Value,
	/// Incremented on every write, used for compare-and-swap
	pub revision: i64,
	pub modified_by: Option<Box<str>>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub modified_at: Timestamp,
}

/// Organization-wide metadata (public) key
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataKey {
	pub key_id: Box<str>,
	pub fingerprint: Box<str>,
	pub armored_key: Box<str>,
	#[serde(serialize_with = "serialize_timestamp_iso_opt")]
	pub expired: Option<Timestamp>,
	#[serde(serialize_with = "serialize_timestamp_iso_opt")]
	pub deleted: Option<Timestamp>,
	pub created_by: Option<Box<str>>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}

impl MetadataKey {
	pub fn is_deleted(&self) -> bool {
		self.deleted.is_some()
	}

	pub fn is_expired(&self, now: Timestamp) -> bool {
		self.expired.is_some_and(|exp| exp <= now)
	}
}

#[derive(Debug)]
pub struct CreateMetadataKey<'a> {
	pub key_id: &'a str,
	pub fingerprint: &'a str,
	pub armored_key: &'a str,
	pub expired: Option<Timestamp>,
	pub created_by: Option<&'a str>,
}

/// Private half of a metadata key, owned by a user or by the server
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPrivateKey {
	pub private_key_id: Box<str>,
	pub metadata_key_id: Box<str>,
	/// `None` marks a server key
	pub user_id: Option<Box<str>>,
	pub fingerprint: Box<str>,
	pub armored_key: Box<str>,
	#[serde(serialize_with = "serialize_timestamp_iso_opt")]
	pub expired: Option<Timestamp>,
	#[serde(serialize_with = "serialize_timestamp_iso_opt")]
	pub deleted: Option<Timestamp>,
	pub created_by: Box<str>,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}

impl MetadataPrivateKey {
	pub fn is_server_key(&self) -> bool {
		self.user_id.is_none()
	}
}

#[derive(Debug)]
pub struct CreateMetadataPrivateKey<'a> {
	pub metadata_key_id: &'a str,
	/// `None` creates a server key
	pub user_id: Option<&'a str>,
	pub fingerprint: &'a str,
	pub armored_key: &'a str,
	pub expired: Option<Timestamp>,
	pub created_by: &'a str,
}

/// Unit of work over one organization's settings and key material
#[async_trait]
pub trait MetaTx: Send {
	async fn read_setting(&mut self, name: &str) -> ClResult<Option<SettingRecord>>;

	/// Write a setting if its revision still matches `expected_revision`.
	///
	/// `None` expects the setting not to exist yet. A mismatch fails with
	/// `Error::Conflict`.
	async fn write_setting(
		&mut self,
		name: &str,
		value: &serde_json::Value,
		expected_revision: Option<i64>,
		modified_by: &str,
	) -> ClResult<SettingRecord>;

	async fn read_metadata_key(&mut self, key_id: &str) -> ClResult<Option<MetadataKey>>;

	/// Number of metadata keys not marked deleted
	async fn count_metadata_keys(&mut self) -> ClResult<u64>;

	/// Number of non-deleted private keys without an owning user
	async fn count_server_private_keys(&mut self) -> ClResult<u64>;

	/// Number of non-deleted server private keys for one metadata key
	async fn count_server_private_keys_for(&mut self, metadata_key_id: &str) -> ClResult<u64>;

	async fn create_metadata_private_key(
		&mut self,
		key: &CreateMetadataPrivateKey<'_>,
	) -> ClResult<MetadataPrivateKey>;

	async fn commit(self: Box<Self>) -> ClResult<()>;
	async fn rollback(self: Box<Self>) -> ClResult<()>;
}

#[async_trait]
pub trait MetaAdapter: Debug + Send + Sync {
	/// Start a serialized unit of work for an organization
	async fn begin(&self, org_id: OrgId) -> ClResult<Box<dyn MetaTx>>;

	// Settings
	//**********
	async fn read_setting(&self, org_id: OrgId, name: &str) -> ClResult<Option<SettingRecord>>;

	// Metadata keys
	//***************
	async fn create_metadata_key(
		&self,
		org_id: OrgId,
		key: &CreateMetadataKey<'_>,
	) -> ClResult<MetadataKey>;
	async fn read_metadata_key(&self, org_id: OrgId, key_id: &str) -> ClResult<MetadataKey>;
	async fn list_metadata_keys(
		&self,
		org_id: OrgId,
		include_deleted: bool,
	) -> ClResult<Vec<MetadataKey>>;
	/// Soft delete: the row stays, marked with a deletion time
	async fn delete_metadata_key(&self, org_id: OrgId, key_id: &str) -> ClResult<()>;

	// Metadata private keys
	//***********************
	async fn list_metadata_private_keys(
		&self,
		org_id: OrgId,
		metadata_key_id: Option<&str>,
	) -> ClResult<Vec<MetadataPrivateKey>>;
	async fn delete_metadata_private_key(&self, org_id: OrgId, private_key_id: &str)
	-> ClResult<()>;
}

// vim: ts=4
