//! Shared utilities for SQLite adapter
//!
//! Error mapping helpers used across all domain modules.

use keyshare_types::prelude::*;
use sqlx::error::DatabaseError;
use sqlx::sqlite::SqliteRow;

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Lock contention, reported with an extended result code
fn is_busy(err: &dyn DatabaseError) -> bool {
	err.code()
		.and_then(|code| code.parse::<i32>().ok())
		.is_some_and(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
}

/// Translate a SQL error, keeping concurrent modifications apart from failures
///
/// A missing row is an expected outcome and is not logged.
pub(crate) fn map_db_err(err: sqlx::Error) -> Error {
	if matches!(err, sqlx::Error::RowNotFound) {
		return Error::NotFound;
	}
	inspect(&err);
	match &err {
		sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
			Error::Conflict(db_err.message().to_string())
		}
		sqlx::Error::Database(db_err) if is_busy(db_err.as_ref()) => {
			Error::Conflict("database is locked".into())
		}
		_ => Error::DbError,
	}
}

/// Map a single-row query result, translating SQL errors to ClResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(err) => Err(map_db_err(err)),
	}
}

/// Collect an iterator of query results, translating errors
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>>,
) -> ClResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}

/// Convert a SQL count, which is never negative
pub(crate) fn to_count(count: i64) -> u64 {
	u64::try_from(count).unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use tracing::Level;
	use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

	#[derive(Clone, Default)]
	struct WarnCounter(Arc<AtomicUsize>);

	impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
		fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
			if *event.metadata().level() == Level::WARN {
				self.0.fetch_add(1, Ordering::SeqCst);
			}
		}
	}

	fn warnings_while(f: impl FnOnce()) -> usize {
		let counter = WarnCounter::default();
		let subscriber = tracing_subscriber::registry().with(counter.clone());
		tracing::subscriber::with_default(subscriber, f);
		counter.0.load(Ordering::SeqCst)
	}

	#[test]
	fn test_missing_row_is_quiet() {
		let warnings = warnings_while(|| {
			assert!(matches!(map_db_err(sqlx::Error::RowNotFound), Error::NotFound));
		});
		assert_eq!(warnings, 0);
	}

	#[test]
	fn test_failures_are_logged() {
		let warnings = warnings_while(|| {
			assert!(matches!(map_db_err(sqlx::Error::PoolTimedOut), Error::DbError));
		});
		assert_eq!(warnings, 1);
	}
}

// vim: ts=4
