//! Settings key-value store management
//!
//! Organization settings are stored as JSON values with a revision counter
//! used for compare-and-swap writes.

use sqlx::{Row, SqliteExecutor, sqlite::SqliteRow};

use crate::utils::{map_db_err, map_res};
use keyshare_types::meta_adapter::SettingRecord;
use keyshare_types::prelude::*;

fn from_row(row: SqliteRow) -> Result<SettingRecord, sqlx::Error> {
	let value: String = row.try_get("value")?;
	Ok(SettingRecord {
		name: row.try_get::<String, _>("name")?.into(),
		value: serde_json::from_str(&value).map_err(|err| sqlx::Error::Decode(Box::new(err)))?,
		revision: row.try_get("revision")?,
		modified_by: row.try_get::<Option<String>, _>("modified_by")?.map(Into::into),
		modified_at: Timestamp(row.try_get("modified_at")?),
	})
}

/// Read a single setting by name
pub(crate) async fn read<'e>(
	db: impl SqliteExecutor<'e>,
	org_id: OrgId,
	name: &str,
) -> ClResult<Option<SettingRecord>> {
	let res = sqlx::query(
		"SELECT name, value, revision, modified_by, modified_at
		FROM settings WHERE org_id = ? AND name = ?",
	)
	.bind(org_id.0)
	.bind(name)
	.fetch_one(db)
	.await;

	match map_res(res, from_row) {
		Ok(record) => Ok(Some(record)),
		Err(Error::NotFound) => Ok(None),
		Err(err) => Err(err),
	}
}

/// Write a setting if its stored revision is still `expected_revision`
pub(crate) async fn write<'e>(
	db: impl SqliteExecutor<'e>,
	org_id: OrgId,
	name: &str,
	value: &serde_json::Value,
	expected_revision: Option<i64>,
	modified_by: &str,
) -> ClResult<SettingRecord> {
	let json = serde_json::to_string(value)?;
	let now = Timestamp::now();

	let (res, revision) = match expected_revision {
		None => {
			let res = sqlx::query(
				"INSERT INTO settings (org_id, name, value, revision, modified_by, modified_at)
				VALUES (?, ?, ?, 1, ?, ?)",
			)
			.bind(org_id.0)
			.bind(name)
			.bind(&json)
			.bind(modified_by)
			.bind(now.0)
			.execute(db)
			.await;
			(res, 1)
		}
		Some(expected) => {
			let res = sqlx::query(
				"UPDATE settings SET value = ?, revision = revision + 1, modified_by = ?, modified_at = ?
				WHERE org_id = ? AND name = ? AND revision = ?",
			)
			.bind(&json)
			.bind(modified_by)
			.bind(now.0)
			.bind(org_id.0)
			.bind(name)
			.bind(expected)
			.execute(db)
			.await;
			(res, expected + 1)
		}
	};

	let res = res.map_err(map_db_err)?;
	if res.rows_affected() == 0 {
		warn!(org_id = %org_id, setting = name, ?expected_revision, "Setting modified concurrently");
		return Err(Error::Conflict(format!("setting {} was modified concurrently", name)));
	}

	Ok(SettingRecord {
		name: name.into(),
		value: value.clone(),
		revision,
		modified_by: Some(modified_by.into()),
		modified_at: now,
	})
}

// vim: ts=4
