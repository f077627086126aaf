//! Unit of work over one organization
//!
//! Transactions start with `BEGIN IMMEDIATE`, taking the database write lock
//! up front. Two units of work therefore never interleave their reads and
//! writes: the second waits for the first (up to the busy timeout) and then
//! sees its committed state.

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::utils::map_db_err;
use crate::{metadata_key, private_key, setting};
use keyshare_types::meta_adapter::{
	CreateMetadataPrivateKey, MetaTx, MetadataKey, MetadataPrivateKey, SettingRecord,
};
use keyshare_types::prelude::*;

pub struct SqliteMetaTx {
	org_id: OrgId,
	tx: Transaction<'static, Sqlite>,
}

impl SqliteMetaTx {
	pub(crate) async fn begin(db: &SqlitePool, org_id: OrgId) -> ClResult<Self> {
		let tx = db.begin_with("BEGIN IMMEDIATE").await.map_err(map_db_err)?;
		Ok(Self { org_id, tx })
	}
}

#[async_trait]
impl MetaTx for SqliteMetaTx {
	async fn read_setting(&mut self, name: &str) -> ClResult<Option<SettingRecord>> {
		setting::read(&mut *self.tx, self.org_id, name).await
	}

	async fn write_setting(
		&mut self,
		name: &str,
		value: &serde_json::Value,
		expected_revision: Option<i64>,
		modified_by: &str,
	) -> ClResult<SettingRecord> {
		setting::write(&mut *self.tx, self.org_id, name, value, expected_revision, modified_by).await
	}

	async fn read_metadata_key(&mut self, key_id: &str) -> ClResult<Option<MetadataKey>> {
		metadata_key::read(&mut *self.tx, self.org_id, key_id).await
	}

	async fn count_metadata_keys(&mut self) -> ClResult<u64> {
		metadata_key::count_live(&mut *self.tx, self.org_id).await
	}

	async fn count_server_private_keys(&mut self) -> ClResult<u64> {
		private_key::count_server_keys(&mut *self.tx, self.org_id, None).await
	}

	async fn count_server_private_keys_for(&mut self, metadata_key_id: &str) -> ClResult<u64> {
		private_key::count_server_keys(&mut *self.tx, self.org_id, Some(metadata_key_id)).await
	}

	async fn create_metadata_private_key(
		&mut self,
		key: &CreateMetadataPrivateKey<'_>,
	) -> ClResult<MetadataPrivateKey> {
		private_key::create(&mut *self.tx, self.org_id, key).await
	}

	async fn commit(self: Box<Self>) -> ClResult<()> {
		let SqliteMetaTx { org_id, tx } = *self;
		tx.commit().await.map_err(map_db_err)?;
		debug!(org_id = %org_id, "Transaction committed");
		Ok(())
	}

	async fn rollback(self: Box<Self>) -> ClResult<()> {
		let SqliteMetaTx { org_id, tx } = *self;
		tx.rollback().await.map_err(map_db_err)?;
		debug!(org_id = %org_id, "Transaction rolled back");
		Ok(())
	}
}

// vim: ts=4
