//! App state type

use std::{
	path::{Path, PathBuf},
	sync::Arc,
};

use keyshare_types::meta_adapter::MetaAdapter;

use crate::event_bus::{DEFAULT_EVENT_BUFFER, EventBus, EventBusConfig};
use crate::prelude::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub opts: AppBuilderOpts,
	pub bus: Arc<EventBus>,

	pub meta_adapter: Arc<dyn MetaAdapter>,
}

pub type App = Arc<AppState>;

#[derive(Debug, Clone)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	pub db_dir: Box<Path>,
	/// Mode reported for organizations that never stored their settings
	pub default_settings_mode: EncryptionMode,
	/// Events buffered per event bus subscriber
	pub event_buffer: usize,
}

impl Default for AppBuilderOpts {
	fn default() -> Self {
		Self {
			listen: "127.0.0.1:8080".into(),
			db_dir: PathBuf::from("./data").into(),
			default_settings_mode: EncryptionMode::ZeroKnowledge,
			event_buffer: DEFAULT_EVENT_BUFFER,
		}
	}
}

pub struct AppBuilder {
	opts: AppBuilderOpts,
	meta_adapter: Option<Arc<dyn MetaAdapter>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		AppBuilder { opts: AppBuilderOpts::default(), meta_adapter: None }
	}

	// Opts
	pub fn opts(&mut self, opts: AppBuilderOpts) -> &mut Self {
		self.opts = opts;
		self
	}
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn db_dir(&mut self, db_dir: impl Into<Box<Path>>) -> &mut Self {
		self.opts.db_dir = db_dir.into();
		self
	}
	pub fn default_settings_mode(&mut self, mode: EncryptionMode) -> &mut Self {
		self.opts.default_settings_mode = mode;
		self
	}
	pub fn event_buffer(&mut self, size: usize) -> &mut Self {
		self.opts.event_buffer = size;
		self
	}

	// Adapters
	pub fn meta_adapter(&mut self, meta_adapter: Arc<dyn MetaAdapter>) -> &mut Self {
		self.meta_adapter = Some(meta_adapter);
		self
	}

	pub fn build(&mut self) -> ClResult<App> {
		let Some(meta_adapter) = self.meta_adapter.clone() else {
			error!("FATAL: No meta adapter specified");
			return Err(Error::Internal("no meta adapter specified".into()));
		};
		let bus = Arc::new(EventBus::with_config(EventBusConfig {
			buffer_size: self.opts.event_buffer,
		}));

		info!(
			version = VERSION,
			default_mode = %self.opts.default_settings_mode,
			"Application state ready"
		);
		Ok(Arc::new(AppState { opts: self.opts.clone(), bus, meta_adapter }))
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4
