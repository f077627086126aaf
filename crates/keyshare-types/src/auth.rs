//! Acting identity and capability checks.
//!
//! Operations never inspect roles directly. They ask an [`Actor`] whether it
//! holds a [`Capability`], so alternative actor models (service accounts,
//! delegated administration) can be plugged in without touching callers.

use std::fmt::Debug;

use crate::prelude::*;

/// Role granting organization administration
pub const ADMIN_ROLE: &str = "admin";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
	/// Manage organization-wide settings and key material
	Administer,
}

/// An authenticated identity acting on behalf of an organization
pub trait Actor: Debug + Send + Sync {
	fn org_id(&self) -> OrgId;
	fn actor_id(&self) -> &str;
	fn has_capability(&self, capability: Capability) -> bool;
}

/// Fails with `PermissionDenied` unless the actor may administer its organization
pub fn assert_admin(actor: &dyn Actor) -> ClResult<()> {
	if actor.has_capability(Capability::Administer) {
		Ok(())
	} else {
		warn!(
			actor = %actor.actor_id(),
			org_id = %actor.org_id(),
			"Admin permission denied"
		);
		Err(Error::PermissionDenied)
	}
}

/// Context struct for an authenticated user
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub org_id: OrgId,
	pub user_id: Box<str>,
	pub roles: Box<[Box<str>]>,
}

impl Actor for AuthCtx {
	fn org_id(&self) -> OrgId {
		self.org_id
	}

	fn actor_id(&self) -> &str {
		&self.user_id
	}

	fn has_capability(&self, capability: Capability) -> bool {
		match capability {
			Capability::Administer => self.roles.iter().any(|r| r.as_ref() == ADMIN_ROLE),
		}
	}
}


// vim: ts=4
