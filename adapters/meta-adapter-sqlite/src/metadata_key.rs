//! Metadata key management
//!
//! Metadata keys are never removed, deletion only marks them.

use sqlx::{Row, SqliteExecutor, SqlitePool, sqlite::SqliteRow};

use crate::utils::{collect_res, map_db_err, map_res, to_count};
use keyshare_types::meta_adapter::{CreateMetadataKey, MetadataKey};
use keyshare_types::prelude::*;

const COLUMNS: &str = "key_id, fingerprint, armored_key, expired, deleted, created_by, created_at";

fn from_row(row: &SqliteRow) -> Result<MetadataKey, sqlx::Error> {
	Ok(MetadataKey {
		key_id: row.try_get::<String, _>("key_id")?.into(),
		fingerprint: row.try_get::<String, _>("fingerprint")?.into(),
		armored_key: row.try_get::<String, _>("armored_key")?.into(),
		expired: row.try_get::<Option<i64>, _>("expired")?.map(Timestamp),
		deleted: row.try_get::<Option<i64>, _>("deleted")?.map(Timestamp),
		created_by: row.try_get::<Option<String>, _>("created_by")?.map(Into::into),
		created_at: Timestamp(row.try_get("created_at")?),
	})
}

pub(crate) async fn create(
	db: &SqlitePool,
	org_id: OrgId,
	key: &CreateMetadataKey<'_>,
) -> ClResult<MetadataKey> {
	let created_at = Timestamp::now();
	sqlx::query(
		"INSERT INTO metadata_keys
		(org_id, key_id, fingerprint, armored_key, expired, created_by, created_at)
		VALUES (?, ?, ?, ?, ?, ?, ?)",
	)
	.bind(org_id.0)
	.bind(key.key_id)
	.bind(key.fingerprint)
	.bind(key.armored_key)
	.bind(key.expired.map(|ts| ts.0))
	.bind(key.created_by)
	.bind(created_at.0)
	.execute(db)
	.await
	.map_err(map_db_err)?;

	Ok(MetadataKey {
		key_id: key.key_id.into(),
		fingerprint: key.fingerprint.into(),
		armored_key: key.armored_key.into(),
		expired: key.expired,
		deleted: None,
		created_by: key.created_by.map(Into::into),
		created_at,
	})
}

pub(crate) async fn read<'e>(
	db: impl SqliteExecutor<'e>,
	org_id: OrgId,
	key_id: &str,
) -> ClResult<Option<MetadataKey>> {
	let res = sqlx::query(&format!(
		"SELECT {} FROM metadata_keys WHERE org_id = ? AND key_id = ?",
		COLUMNS
	))
	.bind(org_id.0)
	.bind(key_id)
	.fetch_one(db)
	.await;

	match map_res(res, |row| from_row(&row)) {
		Ok(key) => Ok(Some(key)),
		Err(Error::NotFound) => Ok(None),
		Err(err) => Err(err),
	}
}

pub(crate) async fn list(
	db: &SqlitePool,
	org_id: OrgId,
	include_deleted: bool,
) -> ClResult<Vec<MetadataKey>> {
	let filter = if include_deleted { "" } else { " AND deleted IS NULL" };
	let rows = sqlx::query(&format!(
		"SELECT {} FROM metadata_keys WHERE org_id = ?{} ORDER BY created_at, key_id",
		COLUMNS, filter
	))
	.bind(org_id.0)
	.fetch_all(db)
	.await
	.map_err(map_db_err)?;

	collect_res(rows.iter().map(from_row))
}

/// Mark a metadata key deleted, keeping the first deletion time
pub(crate) async fn delete(db: &SqlitePool, org_id: OrgId, key_id: &str) -> ClResult<()> {
	let res = sqlx::query(
		"UPDATE metadata_keys SET deleted = coalesce(deleted, ?) WHERE org_id = ? AND key_id = ?",
	)
	.bind(Timestamp::now().0)
	.bind(org_id.0)
	.bind(key_id)
	.execute(db)
	.await
	.map_err(map_db_err)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

/// Number of metadata keys not marked deleted
pub(crate) async fn count_live<'e>(db: impl SqliteExecutor<'e>, org_id: OrgId) -> ClResult<u64> {
	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM metadata_keys WHERE org_id = ? AND deleted IS NULL",
	)
	.bind(org_id.0)
	.fetch_one(db)
	.await
	.map_err(map_db_err)?;

	Ok(to_count(count))
}

// vim: ts=4
