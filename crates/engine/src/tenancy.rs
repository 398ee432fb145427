//! Identity-to-tenant resolution.
//!
//! Every read and write in the engine is scoped to a tenant: the owner whose
//! farm the records belong to. An `Owner` principal resolves to itself; a
//! `Member` (a supervisor's account) resolves to the owner that invited it,
//! which requires a profile lookup. Between sign-in and the completed lookup
//! the tenant is unresolved: list reads yield empty results and writes fail
//! with [`EngineError::Unauthenticated`].
//!
//! The resolved state is published on a watch channel. Operations consult
//! the current value per call instead of caching it, so a principal change
//! is picked up by the next operation; external collaborators can
//! [`subscribe`](TenancyResolver::subscribe) to react to it.

use sea_orm::{DatabaseConnection, prelude::*};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{EngineError, ResultEngine, profiles, profiles::Profile};

/// An authenticated identity, as handed over by the external identity
/// provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub email: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Member,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "owner" => Ok(Self::Owner),
            "member" => Ok(Self::Member),
            other => Err(EngineError::Validation(format!("invalid role: {other}"))),
        }
    }
}

/// The tenancy a session operates under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tenant {
    /// The owner id all records are scoped by.
    pub owner_id: String,
    /// The acting principal (equals `owner_id` for owners).
    pub actor_id: String,
    pub role: Role,
}

impl Tenant {
    fn from_profile(profile: &Profile) -> Self {
        let owner_id = match (profile.role, profile.owner_id.as_deref()) {
            // A member with a broken owner link falls back to its own id
            // rather than locking the account out.
            (Role::Member, Some(owner_id)) => owner_id.to_string(),
            _ => profile.id.clone(),
        };
        Self {
            owner_id,
            actor_id: profile.id.clone(),
            role: profile.role,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TenantState {
    SignedOut,
    /// A principal is present but the profile lookup has not completed.
    Resolving { actor_id: String },
    Resolved(Tenant),
}

#[derive(Debug)]
pub struct TenancyResolver {
    database: DatabaseConnection,
    state: watch::Sender<TenantState>,
}

impl TenancyResolver {
    pub(crate) fn new(database: DatabaseConnection) -> Self {
        let (state, _) = watch::channel(TenantState::SignedOut);
        Self { database, state }
    }

    /// Resolve the tenant for `principal` and publish it.
    ///
    /// A missing profile publishes `SignedOut` and fails with
    /// `Unauthenticated`.
    pub async fn sign_in(&self, principal: Principal) -> ResultEngine<Tenant> {
        self.state.send_replace(TenantState::Resolving {
            actor_id: principal.id.clone(),
        });

        let model = profiles::Entity::find_by_id(principal.id.clone())
            .one(&self.database)
            .await;
        let model = match model {
            Ok(model) => model,
            Err(err) => {
                self.state.send_replace(TenantState::SignedOut);
                return Err(err.into());
            }
        };
        let Some(model) = model else {
            self.state.send_replace(TenantState::SignedOut);
            return Err(EngineError::Unauthenticated);
        };

        let profile = Profile::try_from(model)?;
        let tenant = Tenant::from_profile(&profile);
        tracing::debug!(actor = %tenant.actor_id, owner = %tenant.owner_id, "tenant resolved");
        self.state.send_replace(TenantState::Resolved(tenant.clone()));
        Ok(tenant)
    }

    pub fn sign_out(&self) {
        self.state.send_replace(TenantState::SignedOut);
    }

    /// Watch the resolved tenancy; re-published on every sign-in/out.
    pub fn subscribe(&self) -> watch::Receiver<TenantState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> TenantState {
        self.state.borrow().clone()
    }

    /// The resolved tenant, if any. Reads treat `None` as an empty scope.
    pub(crate) fn tenant(&self) -> Option<Tenant> {
        match &*self.state.borrow() {
            TenantState::Resolved(tenant) => Some(tenant.clone()),
            _ => None,
        }
    }

    /// The resolved tenant, required for writes.
    pub(crate) fn require_tenant(&self) -> ResultEngine<Tenant> {
        self.tenant().ok_or(EngineError::Unauthenticated)
    }
}
