//! Settings validation
//!
//! Validation runs in two phases. The structural phase checks the fields
//! every settings write needs. The transition phase only runs when the
//! change disables zero-knowledge mode and checks what that transition
//! additionally consumes.

use serde_json::Value;

use super::types::{MetadataKeysSettings, SettingsProposal, ValidatedProposal};
use crate::prelude::*;
use keyshare_types::error::FieldErrors;

pub const VALIDATION_FAILED_MSG: &str = "Could not validate the settings data.";

pub trait SettingsValidator: Send + Sync {
	fn validate(&self, proposal: &SettingsProposal, is_disabling: bool)
	-> ClResult<ValidatedProposal>;
}

#[derive(Debug, Default)]
pub struct DefaultSettingsValidator;

fn check_bool(errors: &mut FieldErrors, field: &str, label: &str, value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => {
			errors.add(field, "_required", format!("The {} setting is required.", label));
			false
		}
		Some(Value::Bool(flag)) => *flag,
		Some(_) => {
			errors.add(field, "boolean", format!("The {} setting should be a boolean.", label));
			false
		}
	}
}

impl DefaultSettingsValidator {
	fn structural(proposal: &SettingsProposal, errors: &mut FieldErrors) -> MetadataKeysSettings {
		let allow_personal = check_bool(
			errors,
			"allow_usage_of_personal_keys",
			"allow usage of personal keys",
			proposal.allow_usage_of_personal_keys.as_ref(),
		);
		let key_share = check_bool(
			errors,
			"zero_knowledge_key_share",
			"zero knowledge key share",
			proposal.zero_knowledge_key_share.as_ref(),
		);

		MetadataKeysSettings {
			allow_usage_of_personal_keys: allow_personal,
			mode: if key_share { EncryptionMode::ZeroKnowledge } else { EncryptionMode::UserFriendly },
		}
	}

	fn transition(proposal: &SettingsProposal, errors: &mut FieldErrors) {
		match &proposal.metadata_private_keys {
			None | Some(Value::Null) => {}
			Some(Value::Array(items)) => {
				if !items.iter().all(Value::is_object) {
					errors.add(
						"metadata_private_keys",
						"isArray",
						"Each metadata private key should be an object.",
					);
				}
			}
			Some(_) => {
				errors.add(
					"metadata_private_keys",
					"isArray",
					"The metadata private keys should be an array.",
				);
			}
		}
	}
}

impl SettingsValidator for DefaultSettingsValidator {
	fn validate(
		&self,
		proposal: &SettingsProposal,
		is_disabling: bool,
	) -> ClResult<ValidatedProposal> {
		let mut errors = FieldErrors::new();
		let settings = Self::structural(proposal, &mut errors);
		if is_disabling {
			Self::transition(proposal, &mut errors);
		}
		errors.into_result(VALIDATION_FAILED_MSG)?;

		Ok(ValidatedProposal { settings, private_keys: proposal.private_key_payloads() })
	}
}


// vim: ts=4
