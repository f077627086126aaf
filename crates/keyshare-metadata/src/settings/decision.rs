//! Transition decisions
//!
//! Side-effect-free rules deciding whether a settings change turns
//! zero-knowledge mode off and whether that needs a new server key.

use super::types::{MetadataKeysSettings, SettingsProposal, ValidatedProposal};
use crate::prelude::*;

/// Whether the proposal turns zero-knowledge mode off.
///
/// An absent or non-boolean key share flag is left to the validator.
pub fn is_disabling_zero_knowledge(
	proposal: &SettingsProposal,
	current: &MetadataKeysSettings,
) -> bool {
	if current.is_user_friendly() {
		return false;
	}
	match proposal.key_share_flag() {
		Some(key_share) => !key_share,
		None => false,
	}
}

/// Whether committing `validated` needs a server private key to be provisioned.
///
/// Fails with `MissingKeyPayload` when one is needed but the proposal carries
/// no key payload.
pub fn requires_new_server_key(
	validated: &ValidatedProposal,
	is_disabling: bool,
	metadata_key_count: u64,
	server_key_count: u64,
) -> ClResult<bool> {
	if !is_disabling || metadata_key_count == 0 || !validated.settings.is_user_friendly() {
		return Ok(false);
	}
	if server_key_count > 0 {
		return Ok(false);
	}
	if validated.private_keys.is_empty() {
		return Err(Error::MissingKeyPayload);
	}
	Ok(true)
}


// vim: ts=4
