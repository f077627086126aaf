//! Encryption mode transitions
//!
//! [`SettingsTransitionService::apply_settings`] validates a settings change,
//! provisions the server key a user-friendly transition needs and stores the
//! new settings, all inside one [`MetaTx`]. The success event is published
//! once the transaction is committed.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::json;

use super::decision::{is_disabling_zero_knowledge, requires_new_server_key};
use super::types::{MetadataKeysSettings, SettingsProposal, ValidatedProposal};
use super::validator::{DefaultSettingsValidator, SettingsValidator};
use crate::prelude::*;
use crate::provision::{KeyProvisioner, MetadataPrivateKeyProvisioner};
use keyshare_core::event_bus::{Event, NotificationBus};
use keyshare_types::auth::{Actor, assert_admin};
use keyshare_types::meta_adapter::{METADATA_SETTINGS_KEY, MetaAdapter, MetaTx, SettingRecord};

pub const SETTINGS_SET_EVENT: &str = "MetadataSettings.afterSettingSet.success";

#[derive(Clone)]
pub struct SettingsTransitionService {
	meta: Arc<dyn MetaAdapter>,
	validator: Arc<dyn SettingsValidator>,
	provisioner: Arc<dyn KeyProvisioner>,
	bus: Arc<dyn NotificationBus>,
	default_mode: EncryptionMode,
}

impl SettingsTransitionService {
	pub fn new(meta: Arc<dyn MetaAdapter>, bus: Arc<dyn NotificationBus>) -> Self {
		Self {
			meta,
			validator: Arc::new(DefaultSettingsValidator),
			provisioner: Arc::new(MetadataPrivateKeyProvisioner),
			bus,
			default_mode: EncryptionMode::ZeroKnowledge,
		}
	}

	pub fn from_app(app: &App) -> Self {
		Self::new(app.meta_adapter.clone(), app.bus.clone())
			.with_default_mode(app.opts.default_settings_mode)
	}

	pub fn with_validator(mut self, validator: Arc<dyn SettingsValidator>) -> Self {
		self.validator = validator;
		self
	}

	pub fn with_provisioner(mut self, provisioner: Arc<dyn KeyProvisioner>) -> Self {
		self.provisioner = provisioner;
		self
	}

	/// Mode assumed for organizations without stored settings
	pub fn with_default_mode(mut self, mode: EncryptionMode) -> Self {
		self.default_mode = mode;
		self
	}

	fn default_settings(&self) -> MetadataKeysSettings {
		MetadataKeysSettings::default_for(self.default_mode)
	}

	fn decode(record: &SettingRecord) -> ClResult<MetadataKeysSettings> {
		MetadataKeysSettings::from_json(record.value.clone()).map_err(|_| {
			error!(name = %record.name, revision = record.revision, "Stored settings are invalid");
			Error::Internal("stored metadata keys settings are invalid".into())
		})
	}

	/// Current settings of an organization, or the defaults when none are stored
	pub async fn get_settings(&self, org_id: OrgId) -> ClResult<MetadataKeysSettings> {
		match self.meta.read_setting(org_id, METADATA_SETTINGS_KEY).await? {
			Some(record) => Self::decode(&record),
			None => Ok(self.default_settings()),
		}
	}

	/// Validate and store new settings on behalf of an administrator.
	///
	/// The unit of work runs on its own task: dropping the returned future
	/// does not interrupt it, it still commits or rolls back.
	pub async fn apply_settings(
		&self,
		actor: Arc<dyn Actor>,
		proposal: SettingsProposal,
	) -> ClResult<MetadataKeysSettings> {
		assert_admin(actor.as_ref())?;

		let this = self.clone();
		tokio::spawn(async move { this.transition(actor, proposal).await })
			.await
			.map_err(|err| Error::Internal(format!("settings transition task failed: {}", err)))?
	}

	async fn transition(
		&self,
		actor: Arc<dyn Actor>,
		proposal: SettingsProposal,
	) -> ClResult<MetadataKeysSettings> {
		let org_id = actor.org_id();
		let mut tx = self.meta.begin(org_id).await?;

		let stored = tx.read_setting(METADATA_SETTINGS_KEY).await?;
		let (current, revision) = match &stored {
			Some(record) => (Self::decode(record)?, Some(record.revision)),
			None => (self.default_settings(), None),
		};

		let is_disabling = is_disabling_zero_knowledge(&proposal, &current);
		let validated = self.validator.validate(&proposal, is_disabling)?;

		if self.needs_server_key(tx.as_mut(), &validated, is_disabling).await? {
			if let Err(err) = self.provision(tx.as_mut(), actor.as_ref(), &validated).await {
				if let Err(rollback_err) = tx.rollback().await {
					warn!(org_id = %org_id, "Rollback failed: {}", rollback_err);
				}
				return Err(err);
			}
		}

		let value = validated.settings.to_json()?;
		let record =
			tx.write_setting(METADATA_SETTINGS_KEY, &value, revision, actor.actor_id()).await?;
		tx.commit().await?;

		info!(
			org_id = %org_id,
			actor = %actor.actor_id(),
			mode = %validated.settings.mode,
			revision = record.revision,
			"Metadata keys settings updated"
		);

		self.bus.publish(Event::new(
			SETTINGS_SET_EVENT,
			org_id,
			actor.actor_id(),
			json!({
				"settings": validated.settings,
				"updated_record": record,
				"actor": { "id": actor.actor_id(), "org_id": org_id },
			}),
		));

		Ok(validated.settings)
	}

	async fn needs_server_key(
		&self,
		tx: &mut dyn MetaTx,
		validated: &ValidatedProposal,
		is_disabling: bool,
	) -> ClResult<bool> {
		if !is_disabling {
			return requires_new_server_key(validated, false, 0, 0);
		}
		// Counted inside the transaction so a concurrent transition cannot
		// slip a server key in between
		let metadata_keys = tx.count_metadata_keys().await?;
		let server_keys = tx.count_server_private_keys().await?;
		debug!(metadata_keys, server_keys, "Disabling zero-knowledge mode");

		requires_new_server_key(validated, is_disabling, metadata_keys, server_keys)
	}

	/// Create every proposed server key in order, stopping at the first failure
	async fn provision(
		&self,
		tx: &mut dyn MetaTx,
		actor: &dyn Actor,
		validated: &ValidatedProposal,
	) -> ClResult<()> {
		for (idx, payload) in validated.private_keys.iter().enumerate() {
			match self.provisioner.create(tx, actor, payload.metadata_key_id(), payload).await {
				Ok(_) => {}
				Err(Error::ValidationFailed { errors, .. }) => {
					warn!(index = idx, "Server private key rejected");
					return Err(Error::KeyProvisioningFailed(BTreeMap::from([(idx, errors)])));
				}
				Err(err) => return Err(err),
			}
		}
		Ok(())
	}
}

// vim: ts=4
