//! Database schema initialization
//!
//! Creates tables and indexes if they do not exist yet.

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables and indexes
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Settings
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS settings (
		org_id integer NOT NULL,
		name text NOT NULL,
		value text NOT NULL,
		revision integer NOT NULL DEFAULT 1,
		modified_by text,
		modified_at integer NOT NULL,
		PRIMARY KEY(org_id, name)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Metadata keys
	//***************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS metadata_keys (
		org_id integer NOT NULL,
		key_id text NOT NULL,
		fingerprint text NOT NULL,
		armored_key text NOT NULL,
		expired integer,
		deleted integer,
		created_by text,
		created_at integer NOT NULL,
		PRIMARY KEY(org_id, key_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Metadata private keys
	//***********************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS metadata_private_keys (
		org_id integer NOT NULL,
		private_key_id text NOT NULL,
		metadata_key_id text NOT NULL,
		user_id text,
		fingerprint text NOT NULL,
		armored_key text NOT NULL,
		expired integer,
		deleted integer,
		created_by text NOT NULL,
		created_at integer NOT NULL,
		PRIMARY KEY(org_id, private_key_id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_metadata_private_keys_key
		ON metadata_private_keys(org_id, metadata_key_id)",
	)
	.execute(&mut *tx)
	.await?;
	// At most one live server key per metadata key
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_metadata_private_keys_server
		ON metadata_private_keys(org_id, metadata_key_id)
		WHERE user_id IS NULL AND deleted IS NULL",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
