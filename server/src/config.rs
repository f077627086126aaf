//! Server configuration from environment variables
//!
//! | Variable                | Default          |
//! |-------------------------|------------------|
//! | `LISTEN`                | `127.0.0.1:8080` |
//! | `DB_DIR`                | `./data`         |
//! | `DEFAULT_SETTINGS_MODE` | `zero-knowledge` |
//! | `EVENT_BUFFER`          | `128`            |

use std::path::PathBuf;

use keyshare_core::app::AppBuilderOpts;

use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct Config {
	pub listen: Box<str>,
	pub db_dir: PathBuf,
	pub default_settings_mode: EncryptionMode,
	pub event_buffer: usize,
}

impl Config {
	pub fn from_env() -> ClResult<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Build the configuration from any variable source
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClResult<Self> {
		let defaults = AppBuilderOpts::default();

		let default_settings_mode = match lookup("DEFAULT_SETTINGS_MODE") {
			Some(mode) => mode.parse().map_err(|_| {
				Error::Internal(format!("DEFAULT_SETTINGS_MODE: unknown mode '{}'", mode))
			})?,
			None => defaults.default_settings_mode,
		};
		let event_buffer = match lookup("EVENT_BUFFER") {
			Some(size) => size
				.parse::<usize>()
				.ok()
				.filter(|size| *size > 0)
				.ok_or_else(|| Error::Internal(format!("EVENT_BUFFER: invalid size '{}'", size)))?,
			None => defaults.event_buffer,
		};

		Ok(Config {
			listen: lookup("LISTEN").map_or(defaults.listen, Into::into),
			db_dir: lookup("DB_DIR").map_or_else(|| defaults.db_dir.into(), PathBuf::from),
			default_settings_mode,
			event_buffer,
		})
	}

	pub fn app_opts(&self) -> AppBuilderOpts {
		AppBuilderOpts {
			listen: self.listen.clone(),
			db_dir: self.db_dir.clone().into(),
			default_settings_mode: self.default_settings_mode,
			event_buffer: self.event_buffer,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> =
			vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
		move |name| vars.get(name).cloned()
	}

	#[test]
	fn test_defaults() {
		let config = Config::from_lookup(lookup(&[]));
		assert!(matches!(
			config,
			Ok(Config { default_settings_mode: EncryptionMode::ZeroKnowledge, event_buffer: 128, .. })
		));
		if let Ok(config) = config {
			assert_eq!(config.listen.as_ref(), "127.0.0.1:8080");
			assert_eq!(config.db_dir, PathBuf::from("./data"));
		}
	}

	#[test]
	fn test_overrides() {
		let config = Config::from_lookup(lookup(&[
			("LISTEN", "0.0.0.0:9000"),
			("DB_DIR", "/var/lib/keyshare"),
			("DEFAULT_SETTINGS_MODE", "user-friendly"),
			("EVENT_BUFFER", "16"),
		]));
		assert!(matches!(
			config,
			Ok(Config { default_settings_mode: EncryptionMode::UserFriendly, event_buffer: 16, .. })
		));
		if let Ok(config) = config {
			assert_eq!(config.listen.as_ref(), "0.0.0.0:9000");
			assert_eq!(config.app_opts().db_dir.as_ref(), std::path::Path::new("/var/lib/keyshare"));
		}
	}

	#[test]
	fn test_invalid_values() {
		assert!(Config::from_lookup(lookup(&[("DEFAULT_SETTINGS_MODE", "paranoid")])).is_err());
		assert!(Config::from_lookup(lookup(&[("EVENT_BUFFER", "0")])).is_err());
		assert!(Config::from_lookup(lookup(&[("EVENT_BUFFER", "lots")])).is_err());
	}
}

// vim: ts=4
