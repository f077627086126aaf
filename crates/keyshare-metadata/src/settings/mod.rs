//! Metadata keys settings

pub mod decision;
pub mod service;
pub mod types;
pub mod validator;

pub use service::{SETTINGS_SET_EVENT, SettingsTransitionService};
pub use types::{MetadataKeysSettings, PrivateKeyPayload, SettingsProposal, ValidatedProposal};
pub use validator::{DefaultSettingsValidator, SettingsValidator};

// vim: ts=4
