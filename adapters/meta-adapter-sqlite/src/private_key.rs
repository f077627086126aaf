//! Metadata private key management
//!
//! A private key without a user is a server key. The schema allows only one
//! live server key per metadata key.

use sqlx::{Row, SqliteExecutor, SqlitePool, sqlite::SqliteRow};

use crate::utils::{collect_res, map_db_err, to_count};
use keyshare_types::meta_adapter::{CreateMetadataPrivateKey, MetadataPrivateKey};
use keyshare_types::prelude::*;

fn from_row(row: &SqliteRow) -> Result<MetadataPrivateKey, sqlx::Error> {
	Ok(MetadataPrivateKey {
		private_key_id: row.try_get::<String, _>("private_key_id")?.into(),
		metadata_key_id: row.try_get::<String, _>("metadata_key_id")?.into(),
		user_id: row.try_get::<Option<String>, _>("user_id")?.map(Into::into),
		fingerprint: row.try_get::<String, _>("fingerprint")?.into(),
		armored_key: row.try_get::<String, _>("armored_key")?.into(),
		expired: row.try_get::<Option<i64>, _>("expired")?.map(Timestamp),
		deleted: row.try_get::<Option<i64>, _>("deleted")?.map(Timestamp),
		created_by: row.try_get::<String, _>("created_by")?.into(),
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

pub(crate) async fn create<'e>(
	db: impl SqliteExecutor<'e>,
	org_id: OrgId,
	key: &CreateMetadataPrivateKey<'_>,
) -> ClResult<MetadataPrivateKey> {
	let private_key_id = uuid::Uuid::new_v4().to_string();
	let created_at = Timestamp::now();

	sqlx::query(
		"INSERT INTO metadata_private_keys
		(org_id, private_key_id, metadata_key_id, user_id, fingerprint, armored_key, expired,
		created_by, created_at)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
	)
	.bind(org_id.0)
	.bind(&private_key_id)
	.bind(key.metadata_key_id)
	.bind(key.user_id)
	.bind(key.fingerprint)
	.bind(key.armored_key)
	.bind(key.expired.map(|ts| ts.0))
	.bind(key.created_by)
	.bind(created_at.0)
	.execute(db)
	.await
	.map_err(map_db_err)?;

	Ok(MetadataPrivateKey {
		private_key_id: private_key_id.into(),
		metadata_key_id: key.metadata_key_id.into(),
		user_id: key.user_id.map(Into::into),
		fingerprint: key.fingerprint.into(),
		armored_key: key.armored_key.into(),
		expired: key.expired,
		deleted: None,
		created_by: key.created_by.into(),
		created_at,
	})
}

/// Live private keys, optionally restricted to one metadata key
pub(crate) async fn list(
	db: &SqlitePool,
	org_id: OrgId,
	metadata_key_id: Option<&str>,
) -> ClResult<Vec<MetadataPrivateKey>> {
	let rows = sqlx::query(
		"SELECT private_key_id, metadata_key_id, user_id, fingerprint, armored_key, expired,
		deleted, created_by, created_at
		FROM metadata_private_keys
		WHERE org_id = ? AND deleted IS NULL AND (? IS NULL OR metadata_key_id = ?)
		ORDER BY created_at, private_key_id",
	)
	.bind(org_id.0)
	.bind(metadata_key_id)
	.bind(metadata_key_id)
	.fetch_all(db)
	.await
	.map_err(map_db_err)?;

	collect_res(rows.iter().map(from_row))
}

pub(crate) async fn delete(db: &SqlitePool, org_id: OrgId, private_key_id: &str) -> ClResult<()> {
	let res = sqlx::query(
		"UPDATE metadata_private_keys SET deleted = coalesce(deleted, ?)
		WHERE org_id = ? AND private_key_id = ?",
	)
	.bind(Timestamp::now().0)
	.bind(org_id.0)
	.bind(private_key_id)
	.execute(db)
	.await
	.map_err(map_db_err)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

/// Number of live server keys, optionally for one metadata key only
pub(crate) async fn count_server_keys<'e>(
	db: impl SqliteExecutor<'e>,
	org_id: OrgId,
	metadata_key_id: Option<&str>,
) -> ClResult<u64> {
	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM metadata_private_keys
		WHERE org_id = ? AND user_id IS NULL AND deleted IS NULL
		AND (? IS NULL OR metadata_key_id = ?)",
	)
	.bind(org_id.0)
	.bind(metadata_key_id)
	.bind(metadata_key_id)
	.fetch_one(db)
	.await
	.map_err(map_db_err)?;

	Ok(to_count(count))
}

// vim: ts=4
