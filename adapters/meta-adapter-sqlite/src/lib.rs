//! SQLite implementation of the Keyshare meta adapter
//!
//! Stores organization settings, metadata keys and metadata private keys in
//! a single `meta.db` file inside the configured directory.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};

use keyshare_types::meta_adapter::{
	CreateMetadataKey, MetaAdapter, MetaTx, MetadataKey, MetadataPrivateKey, SettingRecord,
};
use keyshare_types::prelude::*;

mod metadata_key;
mod private_key;
mod schema;
mod setting;
mod tx;
mod utils;

pub use tx::SqliteMetaTx;

const DB_FILE: &str = "meta.db";
const MAX_CONNECTIONS: u32 = 5;

#[derive(Debug)]
pub struct MetaAdapterSqlite {
	db: SqlitePool,
}

impl MetaAdapterSqlite {
	pub async fn new(dir: impl AsRef<Path>) -> ClResult<Self> {
		let dir = dir.as_ref();
		tokio::fs::create_dir_all(dir).await.map_err(|err| {
			error!("Cannot create database directory {}: {}", dir.display(), err);
			Error::DbError
		})?;

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(dir.join(DB_FILE))
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(MAX_CONNECTIONS)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		info!(path = %dir.join(DB_FILE).display(), "Meta database ready");
		Ok(Self { db })
	}
}

#[async_trait]
impl MetaAdapter for MetaAdapterSqlite {
	async fn begin(&self, org_id: OrgId) -> ClResult<Box<dyn MetaTx>> {
		Ok(Box::new(SqliteMetaTx::begin(&self.db, org_id).await?))
	}

	// Settings
	//**********
	async fn read_setting(&self, org_id: OrgId, name: &str) -> ClResult<Option<SettingRecord>> {
		setting::read(&self.db, org_id, name).await
	}

	// Metadata keys
	//***************
	async fn create_metadata_key(
		&self,
		org_id: OrgId,
		key: &CreateMetadataKey<'_>,
	) -> ClResult<MetadataKey> {
		metadata_key::create(&self.db, org_id, key).await
	}

	async fn read_metadata_key(&self, org_id: OrgId, key_id: &str) -> ClResult<MetadataKey> {
		metadata_key::read(&self.db, org_id, key_id).await?.ok_or(Error::NotFound)
	}

	async fn list_metadata_keys(
		&self,
		org_id: OrgId,
		include_deleted: bool,
	) -> ClResult<Vec<MetadataKey>> {
		metadata_key::list(&self.db, org_id, include_deleted).await
	}

	async fn delete_metadata_key(&self, org_id: OrgId, key_id: &str) -> ClResult<()> {
		metadata_key::delete(&self.db, org_id, key_id).await
	}

	// Metadata private keys
	//***********************
	async fn list_metadata_private_keys(
		&self,
		org_id: OrgId,
		metadata_key_id: Option<&str>,
	) -> ClResult<Vec<MetadataPrivateKey>> {
		private_key::list(&self.db, org_id, metadata_key_id).await
	}

	async fn delete_metadata_private_key(
		&self,
		org_id: OrgId,
		private_key_id: &str,
	) -> ClResult<()> {
		private_key::delete(&self.db, org_id, private_key_id).await
	}
}

// vim: ts=4
