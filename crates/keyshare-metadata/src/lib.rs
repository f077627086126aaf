//! Metadata encryption settings for Keyshare.
//!
//! Organizations run their metadata encryption either in zero-knowledge mode
//! or in user-friendly mode, where a server-held private key can decrypt
//! metadata too. This crate handles switching between the two and
//! provisioning the server keys the switch requires.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod handler;
pub mod prelude;
pub mod provision;
pub mod settings;

pub use provision::{KeyProvisioner, MetadataPrivateKeyProvisioner};
pub use settings::{MetadataKeysSettings, SettingsProposal, SettingsTransitionService};

// vim: ts=4
